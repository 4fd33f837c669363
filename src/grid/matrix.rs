//! 2-D block-distributed sparse boolean matrices and semiring SpMV
//!
//! Each grid position owns one block of the matrix, stored as compressed
//! sparse columns over local coordinates. The matrix carries only the
//! incidence pattern: the matching engine never needs edge values, and the
//! select-second-min semiring ignores them by construction.

use rayon::prelude::*;

use crate::semiring::Semiring;

use super::sparse::DistSpVec;
use super::{block_owner, block_range, ProcessGrid, ShapeError};

/// One local block: CSC over block-local row/column ids.
#[derive(Debug, Clone)]
struct Block {
    row_off: i64,
    col_off: i64,
    col_ptr: Vec<usize>,
    row_idx: Vec<usize>,
}

impl Block {
    /// Assemble a block from local `(row, col)` coordinates. Duplicates
    /// collapse (boolean pattern); rows are sorted within each column.
    fn from_coords(row_off: i64, col_off: i64, ncols: usize, mut coords: Vec<(usize, usize)>) -> Self {
        coords.sort_unstable_by_key(|&(r, c)| (c, r));
        coords.dedup();

        let mut col_ptr = vec![0usize; ncols + 1];
        for &(_, c) in &coords {
            col_ptr[c + 1] += 1;
        }
        for c in 0..ncols {
            col_ptr[c + 1] += col_ptr[c];
        }
        let row_idx = coords.into_iter().map(|(r, _)| r).collect();
        Self {
            row_off,
            col_off,
            col_ptr,
            row_idx,
        }
    }

    fn column(&self, lc: usize) -> &[usize] {
        &self.row_idx[self.col_ptr[lc]..self.col_ptr[lc + 1]]
    }
}

/// An immutable sparse boolean matrix split into `proc_rows x proc_cols`
/// blocks over a [`ProcessGrid`].
///
/// Rows index one vertex set of the bipartite graph, columns the other. The
/// graph matrix is never mutated by the matching engine; matching-as-matrix
/// incidence matrices are rebuilt from scratch every phase.
///
/// # Example
///
/// ```
/// use gridmatch::{DistMatrix, ProcessGrid};
///
/// let grid = ProcessGrid::new(2, 2).unwrap();
/// let a = DistMatrix::from_edges(grid, 3, 3, &[(0, 1), (1, 0), (2, 2)]).unwrap();
/// assert_eq!(a.nnz(), 3);
/// assert!(a.has_edge(0, 1));
/// assert!(!a.has_edge(0, 0));
/// ```
#[derive(Debug, Clone)]
pub struct DistMatrix {
    grid: ProcessGrid,
    nrows: i64,
    ncols: i64,
    /// Row-major `proc_rows x proc_cols` blocks.
    blocks: Vec<Block>,
}

impl DistMatrix {
    /// Build a matrix from global `(row, col)` edge coordinates.
    ///
    /// Duplicate edges collapse to one. This is the construction API for
    /// callers holding an in-memory edge list; file ingestion is not this
    /// crate's concern.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::IndexOutOfBounds`] if an endpoint lies outside
    /// the declared dimensions.
    pub fn from_edges(
        grid: ProcessGrid,
        nrows: i64,
        ncols: i64,
        edges: &[(i64, i64)],
    ) -> Result<Self, ShapeError> {
        for &(r, c) in edges {
            if r < 0 || r >= nrows {
                return Err(ShapeError::IndexOutOfBounds { index: r, len: nrows });
            }
            if c < 0 || c >= ncols {
                return Err(ShapeError::IndexOutOfBounds { index: c, len: ncols });
            }
        }
        Ok(Self::from_global_coords(
            grid,
            nrows,
            ncols,
            edges.iter().copied(),
        ))
    }

    /// Route pre-validated global coordinates into blocks and assemble.
    /// Shared by [`DistMatrix::from_edges`] and the permutation builder.
    pub(crate) fn from_global_coords<I>(
        grid: ProcessGrid,
        nrows: i64,
        ncols: i64,
        coords: I,
    ) -> Self
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        let pr = grid.proc_rows();
        let pc = grid.proc_cols();
        let mut buckets: Vec<Vec<(usize, usize)>> = vec![Vec::new(); pr * pc];
        for (r, c) in coords {
            let bi = block_owner(nrows, pr, r);
            let bj = block_owner(ncols, pc, c);
            let (r0, _) = block_range(nrows, pr, bi);
            let (c0, _) = block_range(ncols, pc, bj);
            buckets[bi * pc + bj].push(((r - r0) as usize, (c - c0) as usize));
        }

        let blocks = buckets
            .into_par_iter()
            .enumerate()
            .map(|(b, coords)| {
                let (bi, bj) = (b / pc, b % pc);
                let (r0, _) = block_range(nrows, pr, bi);
                let (c0, c1) = block_range(ncols, pc, bj);
                Block::from_coords(r0, c0, (c1 - c0) as usize, coords)
            })
            .collect();

        Self {
            grid,
            nrows,
            ncols,
            blocks,
        }
    }

    /// The grid this matrix is partitioned over.
    #[must_use]
    pub const fn grid(&self) -> ProcessGrid {
        self.grid
    }

    /// Number of rows (row-vertex count).
    #[must_use]
    pub const fn nrows(&self) -> i64 {
        self.nrows
    }

    /// Number of columns (column-vertex count).
    #[must_use]
    pub const fn ncols(&self) -> i64 {
        self.ncols
    }

    /// Global number of stored edges.
    #[must_use]
    pub fn nnz(&self) -> i64 {
        self.blocks.iter().map(|b| b.row_idx.len() as i64).sum()
    }

    /// Whether edge `(r, c)` is present.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint is out of bounds.
    #[must_use]
    pub fn has_edge(&self, r: i64, c: i64) -> bool {
        assert!(r >= 0 && r < self.nrows, "row {r} out of bounds");
        assert!(c >= 0 && c < self.ncols, "col {c} out of bounds");
        let pr = self.grid.proc_rows();
        let pc = self.grid.proc_cols();
        let block = &self.blocks[block_owner(self.nrows, pr, r) * pc + block_owner(self.ncols, pc, c)];
        let lr = (r - block.row_off) as usize;
        let lc = (c - block.col_off) as usize;
        block.column(lc).binary_search(&lr).is_ok()
    }

    /// One frontier step: `y = A (*) x` under semiring `S`.
    ///
    /// The input is indexed by matrix columns, the output by matrix rows.
    /// `S::combine` produces the value carried across each present edge and
    /// `S::reduce` merges concurrent contributions to one row; with
    /// [`SelectSecondMin`](crate::SelectSecondMin) this selects one
    /// deterministic discoverer per row independent of block shape and
    /// thread count.
    ///
    /// This is a collective: it touches every block and blocks until the
    /// whole product is assembled.
    ///
    /// # Panics
    ///
    /// Panics if `x` differs in grid or its length is not `ncols`.
    pub fn spmv<T, S>(&self, x: &DistSpVec<T>) -> DistSpVec<T>
    where
        T: Clone + Send + Sync,
        S: Semiring<T>,
    {
        assert_eq!(self.grid, x.grid(), "process grid mismatch");
        assert_eq!(self.ncols, x.len(), "SpMV dimension mismatch");
        let pr = self.grid.proc_rows();
        let pc = self.grid.proc_cols();
        let ranks = self.grid.num_ranks();

        // Scatter the frontier along the grid columns: every block column
        // sees exactly the entries in its global column range.
        let mut by_block_col: Vec<Vec<(i64, T)>> = vec![Vec::new(); pc];
        for k in 0..ranks {
            for (c, v) in x.part(k) {
                by_block_col[block_owner(self.ncols, pc, *c)].push((*c, v.clone()));
            }
        }

        // Each block row reduces its contributions into a dense scratch
        // (one accumulator per local row), then emits sorted coordinates.
        let row_segments: Vec<Vec<(i64, T)>> = (0..pr)
            .into_par_iter()
            .map(|bi| {
                let (r0, r1) = block_range(self.nrows, pr, bi);
                let mut acc: Vec<Option<T>> = vec![None; (r1 - r0) as usize];
                for (bj, frontier) in by_block_col.iter().enumerate() {
                    let block = &self.blocks[bi * pc + bj];
                    for (c, label) in frontier {
                        let lc = (c - block.col_off) as usize;
                        for &lr in block.column(lc) {
                            let contrib = S::combine(label);
                            acc[lr] = Some(match acc[lr].take() {
                                Some(old) => S::reduce(old, contrib),
                                None => contrib,
                            });
                        }
                    }
                }
                acc.into_iter()
                    .enumerate()
                    .filter_map(|(lr, v)| v.map(|v| (r0 + lr as i64, v)))
                    .collect()
            })
            .collect();

        // Block rows are contiguous and ascending, so appending in order
        // keeps every output partition sorted.
        let mut parts: Vec<Vec<(i64, T)>> = vec![Vec::new(); ranks];
        for segment in row_segments {
            for (i, v) in segment {
                parts[block_owner(self.nrows, ranks, i)].push((i, v));
            }
        }
        DistSpVec::from_parts(self.grid, self.nrows, parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semiring::SelectSecondMin;

    #[test]
    fn test_from_edges_rejects_out_of_bounds() {
        let grid = ProcessGrid::unit();
        assert_eq!(
            DistMatrix::from_edges(grid, 2, 2, &[(2, 0)]).unwrap_err(),
            ShapeError::IndexOutOfBounds { index: 2, len: 2 }
        );
        assert!(DistMatrix::from_edges(grid, 2, 2, &[(0, -1)]).is_err());
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let grid = ProcessGrid::new(2, 2).unwrap();
        let a = DistMatrix::from_edges(grid, 3, 3, &[(0, 1), (0, 1), (2, 2)]).unwrap();
        assert_eq!(a.nnz(), 2);
    }

    #[test]
    fn test_spmv_propagates_min_label() {
        // Rows 0..3, cols 0..3; row 1 is reachable from cols 0 and 2.
        let grid = ProcessGrid::new(2, 2).unwrap();
        let a = DistMatrix::from_edges(grid, 3, 3, &[(1, 0), (1, 2), (0, 2)]).unwrap();
        let x = DistSpVec::from_pairs(grid, 3, vec![(0, 10i64), (2, 7)]);
        let y = a.spmv::<i64, SelectSecondMin>(&x);
        // Row 0 gets 7 from col 2; row 1 gets min(10, 7) = 7.
        assert_eq!(y.to_pairs(), vec![(0, 7), (1, 7)]);
    }

    #[test]
    fn test_spmv_empty_frontier() {
        let grid = ProcessGrid::unit();
        let a = DistMatrix::from_edges(grid, 4, 4, &[(0, 0)]).unwrap();
        let x = DistSpVec::<i64>::empty(grid, 4);
        assert_eq!(a.spmv::<i64, SelectSecondMin>(&x).nnz(), 0);
    }

    #[test]
    fn test_spmv_independent_of_grid_shape() {
        let edges = [(0i64, 2i64), (1, 0), (2, 1), (3, 2), (1, 2), (0, 0)];
        let x_pairs = vec![(0, 5i64), (1, 3), (2, 8)];
        let mut reference: Option<Vec<(i64, i64)>> = None;
        for (gr, gc) in [(1, 1), (2, 2), (1, 4), (3, 2)] {
            let grid = ProcessGrid::new(gr, gc).unwrap();
            let a = DistMatrix::from_edges(grid, 4, 3, &edges).unwrap();
            let x = DistSpVec::from_pairs(grid, 3, x_pairs.clone());
            let y = a.spmv::<i64, SelectSecondMin>(&x).to_pairs();
            match &reference {
                None => reference = Some(y),
                Some(r) => assert_eq!(&y, r, "grid {gr}x{gc} diverged"),
            }
        }
    }
}
