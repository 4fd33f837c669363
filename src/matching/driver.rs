//! Phase Controller: repeated search-and-flip rounds until no augmenting
//! path remains

use anyhow::{ensure, Result};
use log::debug;

use crate::grid::{DistMatrix, DistVec};

use super::augment::augment;
use super::label::UNMATCHED;
use super::permutation::incidence_from_dense;
use super::search::layered_search;

/// Counters for one `maximum_matching` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchingStats {
    /// Augmenting-path phases performed (including the final empty one).
    pub phases: usize,
    /// Total BFS layers across all phases.
    pub layers: usize,
    /// Matched pairs in the final matching.
    pub matched: i64,
}

/// Compute a maximum-cardinality matching of the bipartite graph `a`.
///
/// `mate_row2col` (length `nrows`) and `mate_col2row` (length `ncols`) are
/// in/out: initialized by the caller, typically to all
/// [`UNMATCHED`](crate::UNMATCHED) or to any valid partial matching such as
/// the one produced by
/// [`greedy_maximal_matching`](crate::greedy_maximal_matching), and mutated
/// in place to hold the maximum matching on return.
///
/// Each phase rebuilds the matching-as-matrix, grows an alternating-path
/// forest from all unmatched columns, and flips every augmenting path found.
/// The loop halts on the first phase that finds none: by the augmenting-path
/// optimality criterion the matching is then maximum. Re-running on a
/// maximum matching performs a single empty phase and changes nothing.
///
/// # Errors
///
/// Returns an error when the three structures disagree on process grid or
/// dimensions. These are fatal configuration errors; nothing is mutated.
///
/// # Example
///
/// ```
/// use gridmatch::{maximum_matching, DistMatrix, DistVec, ProcessGrid, UNMATCHED};
///
/// let grid = ProcessGrid::new(2, 2).unwrap();
/// // A 3-vertex path: col1 - row0 - col0 - row1; plus isolated row 2.
/// let a = DistMatrix::from_edges(grid, 3, 2, &[(0, 0), (0, 1), (1, 0)]).unwrap();
/// let mut r2c = DistVec::new(grid, 3, UNMATCHED);
/// let mut c2r = DistVec::new(grid, 2, UNMATCHED);
///
/// let stats = maximum_matching(&a, &mut r2c, &mut c2r).unwrap();
/// assert_eq!(stats.matched, 2);
/// ```
pub fn maximum_matching(
    a: &DistMatrix,
    mate_row2col: &mut DistVec<i64>,
    mate_col2row: &mut DistVec<i64>,
) -> Result<MatchingStats> {
    validate_shapes(a, mate_row2col, mate_col2row)?;

    let nrows = a.nrows();
    let mut stats = MatchingStats::default();

    loop {
        stats.phases += 1;

        // Matching-as-matrix: one hop across the current matching.
        let mbool = incidence_from_dense(mate_col2row, nrows);

        let out = layered_search(a, &mbool, mate_row2col, mate_col2row);
        stats.layers += out.layers;

        let found = out.leaves.count(|l| l != UNMATCHED);
        debug!(
            "phase {}: unmatched_cols={} layers={} augmenting_paths={}",
            stats.phases, out.unmatched_cols, out.layers, found
        );

        if found == 0 {
            break;
        }
        augment(&out.leaves, &out.parents_row, mate_row2col, mate_col2row);
    }

    stats.matched = mate_col2row.count(|m| m != UNMATCHED);
    debug!(
        "matching complete: phases={} layers={} matched={}",
        stats.phases, stats.layers, stats.matched
    );
    Ok(stats)
}

/// Fatal configuration checks at the engine boundary.
fn validate_shapes(
    a: &DistMatrix,
    mate_row2col: &DistVec<i64>,
    mate_col2row: &DistVec<i64>,
) -> Result<()> {
    ensure!(
        a.grid() == mate_row2col.grid() && a.grid() == mate_col2row.grid(),
        "process grid mismatch: matrix {:?}, mate_row2col {:?}, mate_col2row {:?}",
        a.grid().dims(),
        mate_row2col.grid().dims(),
        mate_col2row.grid().dims()
    );
    ensure!(
        mate_row2col.len() == a.nrows(),
        "mate_row2col length {} does not match nrows {}",
        mate_row2col.len(),
        a.nrows()
    );
    ensure!(
        mate_col2row.len() == a.ncols(),
        "mate_col2row length {} does not match ncols {}",
        mate_col2row.len(),
        a.ncols()
    );
    Ok(())
}
