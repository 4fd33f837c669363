//! Dense distributed vectors (1-D block decomposition)

use rayon::prelude::*;

use super::sparse::DistSpVec;
use super::{block_owner, block_range, ProcessGrid};

/// A dense vector of length `len`, split into one contiguous block per rank.
///
/// Every index is owned by exactly one rank for writes; whole-vector
/// operations (`count`, `assign_from`) are collectives over all partitions.
///
/// # Example
///
/// ```
/// use gridmatch::{DistVec, ProcessGrid};
///
/// let grid = ProcessGrid::new(2, 2).unwrap();
/// let v = DistVec::new(grid, 10, -1i64);
/// assert_eq!(v.len(), 10);
/// assert_eq!(v.count(|x| x == -1), 10);
/// ```
#[derive(Debug, Clone)]
pub struct DistVec<T> {
    grid: ProcessGrid,
    len: i64,
    parts: Vec<Vec<T>>,
}

impl<T: Copy + Send + Sync> DistVec<T> {
    /// Create a vector of `len` copies of `fill`, partitioned over `grid`.
    #[must_use]
    pub fn new(grid: ProcessGrid, len: i64, fill: T) -> Self {
        let ranks = grid.num_ranks();
        let parts = (0..ranks)
            .map(|k| {
                let (start, end) = block_range(len, ranks, k);
                vec![fill; (end - start) as usize]
            })
            .collect();
        Self { grid, len, parts }
    }

    /// Partition an in-memory slice over `grid` (block order, no reshuffling).
    #[must_use]
    pub fn from_slice(grid: ProcessGrid, data: &[T]) -> Self {
        let len = data.len() as i64;
        let ranks = grid.num_ranks();
        let parts = (0..ranks)
            .map(|k| {
                let (start, end) = block_range(len, ranks, k);
                data[start as usize..end as usize].to_vec()
            })
            .collect();
        Self { grid, len, parts }
    }

    /// The grid this vector is partitioned over.
    #[must_use]
    pub const fn grid(&self) -> ProcessGrid {
        self.grid
    }

    /// Global length.
    #[must_use]
    pub const fn len(&self) -> i64 {
        self.len
    }

    /// Whether the vector has length zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read the element at global index `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is outside `0..len`.
    #[must_use]
    pub fn read(&self, i: i64) -> T {
        assert!(i >= 0 && i < self.len, "index {i} out of bounds");
        let ranks = self.grid.num_ranks();
        let owner = block_owner(self.len, ranks, i);
        let (start, _) = block_range(self.len, ranks, owner);
        self.parts[owner][(i - start) as usize]
    }

    /// Global reduction: number of elements satisfying `pred`.
    pub fn count<F>(&self, pred: F) -> i64
    where
        F: Fn(T) -> bool + Sync,
    {
        self.parts
            .par_iter()
            .map(|part| part.iter().filter(|&&x| pred(x)).count() as i64)
            .sum()
    }

    /// Scatter a sparse vector into this one: for every present entry
    /// `(i, v)` set `self[i] = f(&v)`. Untouched elements keep their value.
    ///
    /// # Panics
    ///
    /// Panics if the two vectors differ in grid or length.
    pub fn assign_from<U, F>(&mut self, sv: &DistSpVec<U>, f: F)
    where
        U: Clone + Send + Sync,
        F: Fn(&U) -> T + Sync,
    {
        assert_eq!(self.grid, sv.grid(), "process grid mismatch");
        assert_eq!(self.len, sv.len(), "length mismatch");
        let ranks = self.grid.num_ranks();
        let len = self.len;
        self.parts
            .par_iter_mut()
            .enumerate()
            .for_each(|(k, part)| {
                let (start, _) = block_range(len, ranks, k);
                for (i, v) in sv.part(k) {
                    part[(i - start) as usize] = f(v);
                }
            });
    }

    /// Gather the whole vector into one `Vec` (verification and tests).
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.len as usize);
        for part in &self.parts {
            out.extend_from_slice(part);
        }
        out
    }

    pub(crate) fn part(&self, k: usize) -> &[T] {
        &self.parts[k]
    }

    pub(crate) fn num_parts(&self) -> usize {
        self.parts.len()
    }

    /// Move the partitions out (window creation). The caller must give them
    /// back with [`DistVec::restore_parts`].
    pub(crate) fn take_parts(&mut self) -> Vec<Vec<T>> {
        std::mem::take(&mut self.parts)
    }

    pub(crate) fn restore_parts(&mut self, parts: Vec<Vec<T>>) {
        debug_assert_eq!(parts.len(), self.grid.num_ranks());
        self.parts = parts;
    }
}
