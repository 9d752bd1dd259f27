use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::disjoint_set::DisjointSet;
use crate::error::PercolationError;
use crate::square_lattice::SquareLattice;

/// Bond percolation on an `l x l` square lattice.
///
/// Each sweep opens every lattice bond independently with probability `p` and
/// merges the sites it joins. The measured quantity is the fraction of sites in
/// the largest cluster.
///
/// ```
/// use percolation::Percolation;
///
/// let mut model = Percolation::with_seed(10, 0.3, 42).unwrap();
/// let samples   = model.monte_carlo(10);
/// assert_eq!(samples.len(), 10);
/// assert!(samples.iter().all(|&x| x > 0.0 && x <= 1.0));
/// ```
#[derive(Debug, Clone)]
pub struct Percolation
{
    lattice: SquareLattice,
    p: f64,
    clusters: DisjointSet,
    rng: SmallRng,
}

impl Percolation
{
    /// Simulator seeded from the operating system.
    pub fn new(l: usize, p: f64) -> Result<Self, PercolationError>
    {
        Self::with_rng(l, p, SmallRng::from_os_rng())
    }
    /// Simulator with a reproducible random stream.
    pub fn with_seed(l: usize, p: f64, seed: u64) -> Result<Self, PercolationError>
    {
        Self::with_rng(l, p, SmallRng::seed_from_u64(seed))
    }
    fn with_rng(l: usize, p: f64, rng: SmallRng) -> Result<Self, PercolationError>
    {
        if !(0.0..=1.0).contains(&p)
        {
            return Err(PercolationError::InvalidArgument(format!("p must be in [0, 1], got {p}")));
        }
        let lattice  = SquareLattice::new(l)?;
        let clusters = DisjointSet::new(lattice.num_sites())?;
        Ok(Self { lattice, p, clusters, rng })
    }
    pub fn side(&self) -> usize
    {
        self.lattice.side()
    }
    pub fn p(&self) -> f64
    {
        self.p
    }
    pub fn lattice(&self) -> &SquareLattice
    {
        &self.lattice
    }
    pub fn disjoint_set(&self) -> &DisjointSet
    {
        &self.clusters
    }
    #[inline(always)]
    pub fn index(&self, ix: i64, iy: i64) -> usize
    {
        self.lattice.index(ix, iy)
    }
    /// Opens the bond between sites `i` and `j` with probability `p`.
    pub fn connect(&mut self, i: usize, j: usize) -> Result<(), PercolationError>
    {
        let num_sites = self.lattice.num_sites();
        if let Some(&index) = [i, j].iter().find(|&&index| index >= num_sites)
        {
            return Err(PercolationError::IndexOutOfRange { index, len: num_sites });
        }
        if self.rng.random::<f64>() < self.p
        {
            self.clusters.union_roots(i, j);
        }
        Ok(())
    }
    /// One sweep over every bond of the lattice.
    pub fn one_step(&mut self)
    {
        let p        = self.p;
        let rng      = &mut self.rng;
        let clusters = &mut self.clusters;
        self.lattice.for_each_bond(|a, b|
        {
            if rng.random::<f64>() < p
            {
                clusters.union_roots(a, b);
            }
        });
        tracing::trace!(side = self.lattice.side(), components = self.clusters.component_count(), "sweep done");
    }
    /// Fraction of sites in the largest cluster.
    ///
    /// With `reset` the partition goes back to singletons and exactly one sweep
    /// is performed first; without it the current partition is measured as is.
    pub fn percolation_probability(&mut self, reset: bool) -> f64
    {
        if reset
        {
            self.clusters.reset();
            self.one_step();
        }
        let max_cluster_size = self.clusters.max_size();
        max_cluster_size as f64 / self.lattice.num_sites() as f64
    }
    pub fn monte_carlo(&mut self, n_step: usize) -> Vec<f64>
    {
        tracing::debug!(side = self.side(), p = self.p, n_step, "monte carlo");
        (0..n_step).map(|_| self.percolation_probability(true)).collect()
    }
    /// Same as [`Percolation::monte_carlo`] with the trials spread over the rayon pool.
    ///
    /// Every trial gets its own seed drawn from this simulator's stream, so a
    /// seeded simulator yields the same samples whatever the number of threads.
    pub fn monte_carlo_parallel(&mut self, n_step: usize) -> Vec<f64>
    {
        tracing::debug!(side = self.side(), p = self.p, n_step, "parallel monte carlo");
        let seeds: Vec<u64> = (0..n_step).map(|_| self.rng.random()).collect();
        let template        = self.fresh_copy();

        seeds
            .into_par_iter()
            .map_init(|| template.clone(), |trial, seed|
            {
                trial.rng = SmallRng::seed_from_u64(seed);
                trial.percolation_probability(true)
            })
            .collect()
    }
    fn fresh_copy(&self) -> Self
    {
        let mut clusters = self.clusters.clone();
        clusters.reset();
        Self { lattice: self.lattice, p: self.p, clusters, rng: self.rng.clone() }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn new_validates_arguments()
    {
        assert!(matches!(Percolation::new(0, 0.5), Err(PercolationError::InvalidArgument(_))));
        assert!(matches!(Percolation::new(4, -0.1), Err(PercolationError::InvalidArgument(_))));
        assert!(matches!(Percolation::new(4, 1.5), Err(PercolationError::InvalidArgument(_))));
        assert!(matches!(Percolation::new(4, f64::NAN), Err(PercolationError::InvalidArgument(_))));
        assert!(matches!(Percolation::new(1 << 31, 0.5), Err(PercolationError::InvalidArgument(_))));
        assert!(Percolation::new(4, 0.0).is_ok());
        assert!(Percolation::new(4, 1.0).is_ok());
    }

    #[test]
    fn single_site_always_percolates()
    {
        for &p in &[0.0, 0.3, 1.0]
        {
            let mut model = Percolation::with_seed(1, p, 7).unwrap();
            assert_eq!(model.percolation_probability(true), 1.0);
            assert_eq!(model.percolation_probability(false), 1.0);
        }
    }

    #[test]
    fn closed_lattice_stays_singletons()
    {
        let mut model = Percolation::with_seed(8, 0.0, 1).unwrap();
        assert_eq!(model.percolation_probability(true), 1.0 / 64.0);
        assert_eq!(model.disjoint_set().component_count(), 64);
    }

    #[test]
    fn open_lattice_is_one_cluster()
    {
        let mut model = Percolation::with_seed(9, 1.0, 1).unwrap();
        assert_eq!(model.percolation_probability(true), 1.0);
        assert_eq!(model.disjoint_set().component_count(), 1);
    }

    #[test]
    fn measuring_without_reset_does_not_sweep()
    {
        let mut model = Percolation::with_seed(5, 1.0, 3).unwrap();
        assert_eq!(model.percolation_probability(false), 1.0 / 25.0);
        model.one_step();
        assert_eq!(model.percolation_probability(false), 1.0);
    }

    #[test]
    fn reset_starts_from_singletons()
    {
        let mut model = Percolation::with_seed(6, 1.0, 3).unwrap();
        model.one_step();
        model.p = 0.0;
        assert_eq!(model.percolation_probability(true), 1.0 / 36.0);
    }

    #[test]
    fn connect_checks_indices()
    {
        let mut model = Percolation::with_seed(3, 1.0, 0).unwrap();
        assert_eq!(model.connect(0, 9), Err(PercolationError::IndexOutOfRange { index: 9, len: 9 }));
        assert_eq!(model.connect(12, 0), Err(PercolationError::IndexOutOfRange { index: 12, len: 9 }));
        let (a, b) = (model.index(0, 0), model.index(-1, -1));
        model.connect(a, b).unwrap();
        assert_eq!(model.percolation_probability(false), 2.0 / 9.0);
    }

    #[test]
    fn monte_carlo_returns_n_step_values()
    {
        let mut model = Percolation::with_seed(10, 0.3, 11).unwrap();
        assert!(model.monte_carlo(0).is_empty());
        let samples = model.monte_carlo(25);
        assert_eq!(samples.len(), 25);
        assert!(samples.iter().all(|&x| x > 0.0 && x <= 1.0));
    }

    #[test]
    fn seeded_runs_are_reproducible()
    {
        let mut first  = Percolation::with_seed(10, 0.3, 2024).unwrap();
        let mut second = Percolation::with_seed(10, 0.3, 2024).unwrap();
        assert_eq!(first.monte_carlo(10), second.monte_carlo(10));

        let mut first  = Percolation::with_seed(10, 0.3, 2024).unwrap();
        let mut second = Percolation::with_seed(10, 0.3, 2024).unwrap();
        assert_eq!(first.monte_carlo_parallel(32), second.monte_carlo_parallel(32));
    }

    #[test]
    fn parallel_trials_are_independent_of_pool_size()
    {
        let run = |threads: usize|
        {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build().unwrap();
            pool.install(||
            {
                let mut model = Percolation::with_seed(12, 0.5, 99).unwrap();
                model.monte_carlo_parallel(40)
            })
        };
        let single = run(1);
        assert_eq!(single.len(), 40);
        assert!(single.iter().all(|&x| x > 0.0 && x <= 1.0));
        assert_eq!(single, run(4));
    }

    #[test]
    fn parallel_edge_cases()
    {
        let mut model = Percolation::with_seed(7, 1.0, 5).unwrap();
        assert!(model.monte_carlo_parallel(0).is_empty());
        assert!(model.monte_carlo_parallel(8).iter().all(|&x| x == 1.0));

        let mut model = Percolation::with_seed(7, 0.0, 5).unwrap();
        assert!(model.monte_carlo_parallel(8).iter().all(|&x| x == 1.0 / 49.0));
    }
}
