//! Bipartite-Permutation Builder
//!
//! Lifts a distributed vector of partner assignments into a distributed 0/1
//! incidence matrix: `P[i, v(i)] = 1` for every entry whose projected value
//! lands in `[0, ncols)`. The matching-as-matrix `Mbool` is rebuilt through
//! this every phase, turning "hop across the current matching edge" into a
//! one-step SpMV.
//!
//! This is pure data redistribution. Each source partition buckets its local
//! `(global_index, projected_value)` pairs by destination block, the buckets
//! are exchanged, and every block assembles its compressed columns from the
//! coordinates it received. Out-of-range values are silently dropped.

use rayon::prelude::*;

use crate::grid::{DistMatrix, DistSpVec, DistVec, ProcessGrid};

/// Build the incidence matrix of a dense assignment vector.
///
/// The result has `v.len()` rows and `ncols` columns, partitioned over
/// `v`'s grid; row `i` carries a single 1 at column `v[i]` when that value
/// is in range, and is empty otherwise (sentinel entries vanish).
///
/// # Example
///
/// ```
/// use gridmatch::{incidence_from_dense, DistVec, ProcessGrid};
///
/// let grid = ProcessGrid::new(2, 2).unwrap();
/// let mate = DistVec::from_slice(grid, &[2i64, -1, 0]);
/// let p = incidence_from_dense(&mate, 3);
/// assert_eq!(p.nnz(), 2); // the -1 entry is filtered
/// assert!(p.has_edge(0, 2));
/// assert!(p.has_edge(2, 0));
/// ```
#[must_use]
pub fn incidence_from_dense(v: &DistVec<i64>, ncols: i64) -> DistMatrix {
    let grid = v.grid();
    let nrows = v.len();
    let coords = bucket_coords(grid, nrows, ncols, |k, emit| {
        let (start, _) = crate::grid::block_range(nrows, grid.num_ranks(), k);
        for (off, &val) in v.part(k).iter().enumerate() {
            emit(start + off as i64, val);
        }
    });
    DistMatrix::from_global_coords(grid, nrows, ncols, coords)
}

/// Build the incidence matrix of a sparse vector under a projection.
///
/// Present entry `(i, x)` contributes `P[i, proj(&x)] = 1` when the
/// projected value is in range. Used wherever a frontier (rather than a
/// dense assignment) must be lifted into matrix form, e.g. to express
/// pruning of satisfied trees as an SpMV.
#[must_use]
pub fn incidence_from_sparse<T, F>(v: &DistSpVec<T>, ncols: i64, proj: F) -> DistMatrix
where
    T: Clone + Send + Sync,
    F: Fn(&T) -> i64 + Sync,
{
    let grid = v.grid();
    let nrows = v.len();
    let coords = bucket_coords(grid, nrows, ncols, |k, emit| {
        for (i, x) in v.part(k) {
            emit(*i, proj(x));
        }
    });
    DistMatrix::from_global_coords(grid, nrows, ncols, coords)
}

/// The redistribution step shared by both builders: every source partition
/// walks its local entries and buckets surviving `(row, col)` coordinates;
/// the flattened exchange is returned in partition order, which keeps the
/// result deterministic.
fn bucket_coords<F>(grid: ProcessGrid, nrows: i64, ncols: i64, fill: F) -> Vec<(i64, i64)>
where
    F: Fn(usize, &mut dyn FnMut(i64, i64)) + Sync,
{
    let buckets: Vec<Vec<(i64, i64)>> = (0..grid.num_ranks())
        .into_par_iter()
        .map(|k| {
            let mut local = Vec::new();
            fill(k, &mut |row, col| {
                // Sentinels and stale values fall outside the range.
                if row >= 0 && row < nrows && col >= 0 && col < ncols {
                    local.push((row, col));
                }
            });
            local
        })
        .collect();
    buckets.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_builder_is_one_per_matched_entry() {
        let grid = ProcessGrid::new(2, 2).unwrap();
        let mate = DistVec::from_slice(grid, &[3i64, -1, 1, -1, 0]);
        let p = incidence_from_dense(&mate, 4);
        assert_eq!(p.nrows(), 5);
        assert_eq!(p.ncols(), 4);
        assert_eq!(p.nnz(), 3);
        assert!(p.has_edge(0, 3));
        assert!(p.has_edge(2, 1));
        assert!(p.has_edge(4, 0));
    }

    #[test]
    fn test_dense_builder_drops_out_of_range() {
        let grid = ProcessGrid::unit();
        let mate = DistVec::from_slice(grid, &[7i64, 1, -1]);
        // ncols = 3: the value 7 is silently filtered, not an error.
        let p = incidence_from_dense(&mate, 3);
        assert_eq!(p.nnz(), 1);
        assert!(p.has_edge(1, 1));
    }

    #[test]
    fn test_sparse_builder_with_projection() {
        use crate::matching::label::VertexLabel;

        let grid = ProcessGrid::new(2, 2).unwrap();
        let fringe = DistSpVec::from_pairs(
            grid,
            6,
            vec![(1, VertexLabel::new(0, 4)), (3, VertexLabel::new(2, 5))],
        );
        let p = incidence_from_sparse(&fringe, 6, |l| l.root);
        assert_eq!(p.nnz(), 2);
        assert!(p.has_edge(1, 4));
        assert!(p.has_edge(3, 5));
    }

    #[test]
    fn test_builder_matches_across_grid_shapes() {
        let data = vec![2i64, 0, -1, 5, 1, -1, 3, 4];
        let reference = {
            let v = DistVec::from_slice(ProcessGrid::unit(), &data);
            incidence_from_dense(&v, 6)
        };
        for (gr, gc) in [(2, 2), (1, 4), (4, 1)] {
            let grid = ProcessGrid::new(gr, gc).unwrap();
            let v = DistVec::from_slice(grid, &data);
            let p = incidence_from_dense(&v, 6);
            assert_eq!(p.nnz(), reference.nnz());
            for i in 0..8 {
                for j in 0..6 {
                    assert_eq!(p.has_edge(i, j), reference.has_edge(i, j), "({i},{j})");
                }
            }
        }
    }
}
