//! Sparse distributed vectors (1-D block decomposition, sorted coordinates)

use std::collections::HashSet;

use rayon::prelude::*;

use super::dense::DistVec;
use super::{block_owner, block_range, ProcessGrid};

/// A sparse vector of logical length `len`: each rank holds its present
/// entries as `(global_index, value)` pairs, sorted by index.
///
/// Frontier vectors are `DistSpVec`s with one-layer lifetimes; they are
/// created fresh by SpMV or by lifting a dense vector and never aliased
/// across layers.
#[derive(Debug, Clone)]
pub struct DistSpVec<T> {
    grid: ProcessGrid,
    len: i64,
    parts: Vec<Vec<(i64, T)>>,
}

impl<T: Clone + Send + Sync> DistSpVec<T> {
    /// An empty sparse vector of logical length `len`.
    #[must_use]
    pub fn empty(grid: ProcessGrid, len: i64) -> Self {
        Self {
            grid,
            len,
            parts: vec![Vec::new(); grid.num_ranks()],
        }
    }

    /// Build from `(index, value)` pairs, routing each entry to its owner.
    ///
    /// # Panics
    ///
    /// Panics if an index is outside `0..len` or duplicated.
    #[must_use]
    pub fn from_pairs(grid: ProcessGrid, len: i64, pairs: Vec<(i64, T)>) -> Self {
        let ranks = grid.num_ranks();
        let mut parts: Vec<Vec<(i64, T)>> = vec![Vec::new(); ranks];
        for (i, v) in pairs {
            assert!(i >= 0 && i < len, "index {i} out of bounds for length {len}");
            parts[block_owner(len, ranks, i)].push((i, v));
        }
        for part in &mut parts {
            part.sort_by_key(|&(i, _)| i);
            for w in part.windows(2) {
                assert_ne!(w[0].0, w[1].0, "duplicate index {}", w[0].0);
            }
        }
        Self { grid, len, parts }
    }

    /// Lift a dense vector: keep indices whose value satisfies `keep`, and
    /// label each survivor from its own global index.
    ///
    /// Used to seed a phase with the unmatched column vertices, each labeled
    /// `root = parent = own id`.
    pub fn from_dense<D, P, F>(dense: &DistVec<D>, keep: P, label: F) -> Self
    where
        D: Copy + Send + Sync,
        P: Fn(D) -> bool + Sync,
        F: Fn(i64) -> T + Sync,
    {
        let grid = dense.grid();
        let len = dense.len();
        let ranks = grid.num_ranks();
        let parts = (0..ranks)
            .into_par_iter()
            .map(|k| {
                let (start, _) = block_range(len, ranks, k);
                dense
                    .part(k)
                    .iter()
                    .enumerate()
                    .filter(|&(_, &v)| keep(v))
                    .map(|(off, _)| {
                        let i = start + off as i64;
                        (i, label(i))
                    })
                    .collect()
            })
            .collect();
        Self { grid, len, parts }
    }

    /// The grid this vector is partitioned over.
    #[must_use]
    pub const fn grid(&self) -> ProcessGrid {
        self.grid
    }

    /// Logical length.
    #[must_use]
    pub const fn len(&self) -> i64 {
        self.len
    }

    /// Whether the logical length is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Global number of present entries.
    #[must_use]
    pub fn nnz(&self) -> i64 {
        self.parts.iter().map(|p| p.len() as i64).sum()
    }

    /// Keep entries whose `(value, aligned dense element)` pair satisfies `keep`.
    ///
    /// # Panics
    ///
    /// Panics if the dense vector differs in grid or length.
    pub fn select_with<D, P>(&self, dense: &DistVec<D>, keep: P) -> Self
    where
        D: Copy + Send + Sync,
        P: Fn(&T, D) -> bool + Sync,
    {
        self.select_map_with(dense, keep, |v, _| v.clone())
    }

    /// Keep entries satisfying `keep` and rewrite the survivors with `f`.
    ///
    /// This is the element-wise merge underlying claiming, leaf detection and
    /// matched-row relabeling: the sparse side supplies the frontier label,
    /// the dense side the per-vertex state it is merged against.
    ///
    /// # Panics
    ///
    /// Panics if the dense vector differs in grid or length.
    pub fn select_map_with<D, U, P, F>(&self, dense: &DistVec<D>, keep: P, f: F) -> DistSpVec<U>
    where
        D: Copy + Send + Sync,
        U: Clone + Send + Sync,
        P: Fn(&T, D) -> bool + Sync,
        F: Fn(&T, D) -> U + Sync,
    {
        assert_eq!(self.grid, dense.grid(), "process grid mismatch");
        assert_eq!(self.len, dense.len(), "length mismatch");
        let ranks = self.grid.num_ranks();
        let len = self.len;
        let parts = self
            .parts
            .par_iter()
            .enumerate()
            .map(|(k, part)| {
                let (start, _) = block_range(len, ranks, k);
                let dpart = dense.part(k);
                part.iter()
                    .filter(|(i, v)| keep(v, dpart[(i - start) as usize]))
                    .map(|(i, v)| (*i, f(v, dpart[(i - start) as usize])))
                    .collect()
            })
            .collect();
        DistSpVec {
            grid: self.grid,
            len,
            parts,
        }
    }

    /// Rewrite every present value with `f`, keeping indices.
    pub fn map<U, F>(&self, f: F) -> DistSpVec<U>
    where
        U: Clone + Send + Sync,
        F: Fn(&T) -> U + Sync,
    {
        let parts = self
            .parts
            .par_iter()
            .map(|part| part.iter().map(|(i, v)| (*i, f(v))).collect())
            .collect();
        DistSpVec {
            grid: self.grid,
            len: self.len,
            parts,
        }
    }

    /// Remove entries whose `proj(value)` occurs as an index of `keys`.
    ///
    /// This is the pruning primitive: `keys` is the set of roots satisfied in
    /// the current layer, and every in-flight fringe entry belonging to such a
    /// tree is discarded.
    pub fn prune_by<U, F>(&mut self, keys: &DistSpVec<U>, proj: F)
    where
        U: Clone + Send + Sync,
        F: Fn(&T) -> i64 + Sync,
    {
        let satisfied: HashSet<i64> = keys
            .parts
            .iter()
            .flat_map(|part| part.iter().map(|&(i, _)| i))
            .collect();
        if satisfied.is_empty() {
            return;
        }
        self.parts.par_iter_mut().for_each(|part| {
            part.retain(|(_, v)| !satisfied.contains(&proj(v)));
        });
    }

    /// Gather all entries as `(index, value)` pairs in index order.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(i64, T)> {
        let mut out = Vec::new();
        for part in &self.parts {
            out.extend(part.iter().cloned());
        }
        out
    }

    pub(crate) fn part(&self, k: usize) -> &[(i64, T)] {
        &self.parts[k]
    }

    pub(crate) fn from_parts(grid: ProcessGrid, len: i64, parts: Vec<Vec<(i64, T)>>) -> Self {
        debug_assert_eq!(parts.len(), grid.num_ranks());
        Self { grid, len, parts }
    }
}

impl DistSpVec<i64> {
    /// Swap index and value: entry `(i, v)` becomes `(v, i)` in a vector of
    /// length `new_len`.
    ///
    /// Values outside `[0, new_len)` are dropped. When several entries share
    /// a value, the smallest index wins, the same total-order tie-break the
    /// select-second-min semiring applies, so the result is deterministic
    /// under any partitioning.
    #[must_use]
    pub fn invert(&self, new_len: i64) -> DistSpVec<i64> {
        let mut swapped: Vec<(i64, i64)> = self
            .parts
            .iter()
            .flat_map(|part| {
                part.iter()
                    .filter(|&&(_, v)| v >= 0 && v < new_len)
                    .map(|&(i, v)| (v, i))
            })
            .collect();
        swapped.sort_unstable();
        swapped.dedup_by_key(|&mut (v, _)| v);

        let ranks = self.grid.num_ranks();
        let mut parts: Vec<Vec<(i64, i64)>> = vec![Vec::new(); ranks];
        for (v, i) in swapped {
            parts[block_owner(new_len, ranks, v)].push((v, i));
        }
        DistSpVec {
            grid: self.grid,
            len: new_len,
            parts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> ProcessGrid {
        ProcessGrid::new(2, 2).unwrap()
    }

    #[test]
    fn test_from_dense_lifts_matching_indices() {
        let mate = DistVec::from_slice(grid(), &[-1i64, 3, -1, 0, -1]);
        let fringe = DistSpVec::from_dense(&mate, |m| m == -1, |i| i * 10);
        assert_eq!(fringe.nnz(), 3);
        assert_eq!(fringe.to_pairs(), vec![(0, 0), (2, 20), (4, 40)]);
    }

    #[test]
    fn test_select_map_with_dense() {
        let dense = DistVec::from_slice(grid(), &[5i64, -1, 7, -1]);
        let sv = DistSpVec::from_pairs(grid(), 4, vec![(0, 100i64), (1, 101), (3, 103)]);
        let kept = sv.select_map_with(&dense, |_, d| d != -1, |v, d| v + d);
        assert_eq!(kept.to_pairs(), vec![(0, 105)]);
    }

    #[test]
    fn test_invert_swaps_and_tie_breaks() {
        let sv = DistSpVec::from_pairs(grid(), 6, vec![(1, 4i64), (2, 4), (5, 0)]);
        let inv = sv.invert(5);
        // Value 4 is claimed by both index 1 and 2; the smaller index wins.
        assert_eq!(inv.to_pairs(), vec![(0, 5), (4, 1)]);
    }

    #[test]
    fn test_invert_drops_out_of_range() {
        let sv = DistSpVec::from_pairs(grid(), 4, vec![(0, -1i64), (1, 9), (2, 1)]);
        let inv = sv.invert(4);
        assert_eq!(inv.to_pairs(), vec![(1, 2)]);
    }

    #[test]
    fn test_prune_by_removes_satisfied_keys() {
        let mut sv = DistSpVec::from_pairs(grid(), 6, vec![(0, 10i64), (1, 11), (2, 10)]);
        let keys = DistSpVec::from_pairs(grid(), 20, vec![(10, 0i64)]);
        sv.prune_by(&keys, |&v| v);
        assert_eq!(sv.to_pairs(), vec![(1, 11)]);
    }
}
