use crate::error::PercolationError;

/// Partition of `0..n` into disjoint sets.
///
/// Every element stores a single signed code: a non-negative code is the index
/// of the element's parent, a negative code marks a root and holds `-(set size)`.
#[derive(Debug, Clone)]
pub struct DisjointSet
{
    codes: Vec<isize>,
    n_components: usize,
}

impl DisjointSet
{
    pub fn new(n: usize) -> Result<Self, PercolationError>
    {
        if n == 0
        {
            return Err(PercolationError::InvalidArgument(String::from("DisjointSet needs at least one element")));
        }
        let mut codes = Vec::new();
        codes
            .try_reserve_exact(n)
            .map_err(|err| PercolationError::InvalidArgument(format!("Cannot allocate {n} elements: {err}")))?;
        codes.resize(n, -1_isize);
        let n_components = n;
        Ok(Self { codes, n_components })
    }
    /// Back to `n` singleton sets, reusing the allocation.
    #[inline]
    pub fn reset(&mut self)
    {
        self.codes.fill(-1);
        self.n_components = self.codes.len();
    }
    pub fn len(&self) -> usize
    {
        self.codes.len()
    }
    /// Companion to [`DisjointSet::len`]; always `false` since `new` rejects `n == 0`.
    pub fn is_empty(&self) -> bool
    {
        self.codes.is_empty()
    }
    pub fn component_count(&self) -> usize
    {
        self.n_components
    }
    #[inline(always)]
    fn check_index(&self, i: usize) -> Result<(), PercolationError>
    {
        if i >= self.codes.len()
        {
            return Err(PercolationError::IndexOutOfRange { index: i, len: self.codes.len() });
        }
        Ok(())
    }
    pub fn find(&mut self, i: usize) -> Result<usize, PercolationError>
    {
        self.check_index(i)?;
        Ok(self.find_root(i))
    }
    pub fn union(&mut self, i: usize, j: usize) -> Result<bool, PercolationError>
    {
        self.check_index(i)?;
        self.check_index(j)?;
        Ok(self.union_roots(i, j))
    }
    pub fn same(&mut self, i: usize, j: usize) -> Result<bool, PercolationError>
    {
        Ok(self.find(i)? == self.find(j)?)
    }
    pub fn size(&mut self, i: usize) -> Result<usize, PercolationError>
    {
        let root = self.find(i)?;
        Ok(self.codes[root].unsigned_abs())
    }
    /// Size of the largest set: the most negative code over all elements.
    pub fn max_size(&self) -> usize
    {
        self.codes
            .iter()
            .copied()
            .min()
            .map_or(0, |code| code.unsigned_abs())
    }

    // Two passes: walk up to the root, then point every visited element at it.
    #[inline(always)]
    pub(crate) fn find_root(&mut self, i: usize) -> usize
    {
        let mut root = i;
        while self.codes[root] >= 0
        {
            root = self.codes[root] as usize;
        }

        let mut current = i;
        while current != root
        {
            let next = self.codes[current] as usize;
            self.codes[current] = root as isize;
            current = next;
        }
        root
    }
    // Union by size, on a tie the smaller index stays root.
    #[inline(always)]
    pub(crate) fn union_roots(&mut self, i: usize, j: usize) -> bool
    {
        let root_i = self.find_root(i);
        let root_j = self.find_root(j);
        if root_i == root_j
        {
            return false;
        }
        let (keep, attach) = match self.codes[root_i].cmp(&self.codes[root_j])
        {
            std::cmp::Ordering::Less    => (root_i, root_j),
            std::cmp::Ordering::Greater => (root_j, root_i),
            std::cmp::Ordering::Equal   => (root_i.min(root_j), root_i.max(root_j)),
        };
        self.codes[keep]   += self.codes[attach];
        self.codes[attach]  = keep as isize;
        self.n_components  -= 1;
        true
    }
}
