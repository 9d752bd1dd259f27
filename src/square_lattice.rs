use crate::error::PercolationError;

/// Geometry of an `l x l` square lattice with sites numbered row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareLattice
{
    side: usize,
}

// True modulo: negative coordinates wrap back into [0, side).
trait LatticeModulo
{
    fn modulo(self, other: Self) -> Self;
}

impl LatticeModulo for i64
{
    #[inline(always)]
    fn modulo(self, other: Self) -> Self
    {
        if (0..other).contains(&self)
        {
            return self;
        }
        self.rem_euclid(other)
    }
}

impl SquareLattice
{
    pub fn new(side: usize) -> Result<Self, PercolationError>
    {
        if side == 0
        {
            return Err(PercolationError::InvalidArgument(String::from("Lattice side length must be positive")));
        }
        let max_sites = isize::MAX as usize / std::mem::size_of::<isize>();
        if side.checked_mul(side).map_or(true, |sites| sites > max_sites) || i64::try_from(side).is_err()
        {
            return Err(PercolationError::InvalidArgument(format!("Lattice side length {side} is too large")));
        }
        Ok(Self { side })
    }
    pub fn side(&self) -> usize
    {
        self.side
    }
    pub fn num_sites(&self) -> usize
    {
        self.side * self.side
    }
    /// Linear index of site `(ix, iy)`; both coordinates wrap around the lattice.
    #[inline(always)]
    pub fn index(&self, ix: i64, iy: i64) -> usize
    {
        let side = self.side as i64;
        let ix   = ix.modulo(side);
        let iy   = iy.modulo(side);
        debug_assert!(ix >= 0, "index: ix in [0,side[");
        debug_assert!(iy >= 0, "index: iy in [0,side[");
        (ix + iy * side) as usize
    }
    /// Number of bonds visited by [`SquareLattice::for_each_bond`].
    pub fn num_bonds(&self) -> usize
    {
        2 * self.side * (self.side - 1)
    }
    /// Calls `bond(a, b)` for each pair of neighbouring sites attempted in one sweep.
    ///
    /// The bulk loop links every site of the first `l-1` rows and columns to its
    /// right and lower neighbour. The last column and the last row are then
    /// linked along their length. The sweep never crosses the lattice edge, so
    /// the bonds are those of the open grid even though [`SquareLattice::index`]
    /// wraps. In particular the last-column and last-row passes, often described
    /// as joining the last row/column to the first, only link sites along that
    /// row or column and never back to row or column zero.
    #[inline(always)]
    pub fn for_each_bond<F>(&self, mut bond: F)
    where
        F: FnMut(usize, usize),
    {
        let last = self.side as i64 - 1;
        for ix in 0..last
        {
            for iy in 0..last
            {
                let site = self.index(ix, iy);
                bond(site, self.index(ix + 1, iy));
                bond(site, self.index(ix, iy + 1));
            }
        }
        for k in 0..last
        {
            bond(self.index(last, k), self.index(last, k + 1));
            bond(self.index(k, last), self.index(k + 1, last));
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn new_rejects_zero_side()
    {
        assert!(matches!(SquareLattice::new(0), Err(PercolationError::InvalidArgument(_))));
    }

    #[test]
    fn new_rejects_unaddressable_side()
    {
        assert!(matches!(SquareLattice::new(1 << 31), Err(PercolationError::InvalidArgument(_))));
        assert!(matches!(SquareLattice::new(usize::MAX), Err(PercolationError::InvalidArgument(_))));
        assert!(SquareLattice::new(1 << 10).is_ok());
    }

    #[test]
    fn index_is_row_major()
    {
        let lattice = SquareLattice::new(4).unwrap();
        assert_eq!(lattice.index(0, 0), 0);
        assert_eq!(lattice.index(3, 0), 3);
        assert_eq!(lattice.index(0, 1), 4);
        assert_eq!(lattice.index(2, 3), 14);
    }

    #[test]
    fn index_wraps_both_directions()
    {
        let lattice = SquareLattice::new(5).unwrap();
        assert_eq!(lattice.index(-1, 0), lattice.index(4, 0));
        assert_eq!(lattice.index(0, -1), lattice.index(0, 4));
        assert_eq!(lattice.index(5, 5), 0);
        assert_eq!(lattice.index(-6, 12), lattice.index(4, 2));
        assert_eq!(lattice.index(-11, -11), lattice.index(4, 4));
    }

    #[test]
    fn index_covers_every_site_once()
    {
        let lattice = SquareLattice::new(6).unwrap();
        let indices: HashSet<usize> = (0..6)
            .flat_map(|iy| (0..6).map(move |ix| (ix, iy)))
            .map(|(ix, iy)| lattice.index(ix, iy))
            .collect();
        assert_eq!(indices.len(), lattice.num_sites());
        assert!(indices.iter().all(|&i| i < lattice.num_sites()));
    }

    #[test]
    fn bonds_are_distinct_neighbour_pairs()
    {
        for side in 1..8
        {
            let lattice   = SquareLattice::new(side).unwrap();
            let mut bonds = Vec::new();
            lattice.for_each_bond(|a, b| bonds.push((a.min(b), a.max(b))));

            assert_eq!(bonds.len(), lattice.num_bonds());
            let unique: HashSet<_> = bonds.iter().copied().collect();
            assert_eq!(unique.len(), bonds.len(), "side {side}: duplicated bond");

            for &(a, b) in &bonds
            {
                let (ax, ay) = (a % side, a / side);
                let (bx, by) = (b % side, b / side);
                let distance = ax.abs_diff(bx) + ay.abs_diff(by);
                assert_eq!(distance, 1, "side {side}: bond {a}-{b} is not nearest neighbour");
            }
        }
    }

    #[test]
    fn single_site_has_no_bonds()
    {
        let lattice   = SquareLattice::new(1).unwrap();
        let mut count = 0;
        lattice.for_each_bond(|_, _| count += 1);
        assert_eq!(count, 0);
        assert_eq!(lattice.num_bonds(), 0);
    }
}
