//! Layered Search: grow one alternating-path forest per phase
//!
//! Each layer crosses the graph once (row step) and the current matching
//! once (column step), both as select-second-min SpMVs. Rows reached for the
//! first time record their discoverer; first-time-reached free rows complete
//! augmenting paths and are recorded as leaves under their tree's root;
//! branches of already-satisfied trees are pruned before they can propagate.

use log::debug;

use crate::grid::{DistMatrix, DistSpVec, DistVec};
use crate::semiring::SelectSecondMin;

use super::label::{VertexLabel, UNMATCHED};

/// Per-phase output of the forest search.
pub(crate) struct SearchOutput {
    /// `parents_row[r]` = column vertex that first discovered row `r`, or -1.
    pub parents_row: DistVec<i64>,
    /// `leaves[root]` = free row that completed `root`'s augmenting path, or -1.
    pub leaves: DistVec<i64>,
    /// Number of BFS layers performed.
    pub layers: usize,
    /// Unmatched columns at phase start (the initial fringe size).
    pub unmatched_cols: i64,
}

/// Run one phase's breadth-first forest expansion to exhaustion.
///
/// `mbool` is the matching-as-matrix for the current matching (ncols(A) rows,
/// nrows(A) columns), rebuilt by the caller each phase.
pub(crate) fn layered_search(
    a: &DistMatrix,
    mbool: &DistMatrix,
    mate_row2col: &DistVec<i64>,
    mate_col2row: &DistVec<i64>,
) -> SearchOutput {
    let grid = a.grid();
    let nrows = a.nrows();
    let ncols = a.ncols();

    let mut parents_row = DistVec::new(grid, nrows, UNMATCHED);
    let mut leaves = DistVec::new(grid, ncols, UNMATCHED);

    // Seed: every unmatched column starts its own tree, root = parent = own id.
    let mut fringe_col =
        DistSpVec::from_dense(mate_col2row, |m| m == UNMATCHED, |c| VertexLabel::new(c, c));
    let unmatched_cols = fringe_col.nnz();

    let mut layers = 0;
    while fringe_col.nnz() > 0 {
        layers += 1;

        // Row step: cross the graph, one deterministic discoverer per row.
        let fringe_row = a.spmv::<VertexLabel, SelectSecondMin>(&fringe_col);

        // Claim: rows discovered in an earlier layer leave the fringe here,
        // so no row is ever written twice.
        let mut fringe_row = fringe_row.select_with(&parents_row, |_, p| p == UNMATCHED);
        parents_row.assign_from(&fringe_row, |l| l.parent);

        // Leaf detection: free rows complete augmenting paths. Inverting the
        // row->root map gives root->leaf-row; a root reached by two free rows
        // in the same layer keeps the smaller one.
        let reached_free =
            fringe_row.select_map_with(mate_row2col, |_, m| m == UNMATCHED, |l, _| l.root);
        let new_leaves = reached_free.invert(ncols);
        if new_leaves.nnz() > 0 {
            leaves.assign_from(&new_leaves, |&r| r);
        }

        // Matched rows hop across their matching edge: the partner column
        // becomes the next parent, the root rides along.
        fringe_row = fringe_row.select_map_with(
            mate_row2col,
            |_, m| m != UNMATCHED,
            |l, m| VertexLabel { parent: m, root: l.root, prob: l.prob },
        );

        // Prune: once a root's path is satisfied, its other in-flight
        // branches must not propagate further.
        if new_leaves.nnz() > 0 {
            fringe_row.prune_by(&new_leaves, |l| l.root);
        }

        debug!(
            "layer {}: fringe_row={} new_leaves={}",
            layers,
            fringe_row.nnz(),
            new_leaves.nnz()
        );

        if fringe_row.nnz() == 0 {
            break;
        }

        // Column step: cross the current matching into the next layer.
        fringe_col = mbool.spmv::<VertexLabel, SelectSecondMin>(&fringe_row);
    }

    SearchOutput {
        parents_row,
        leaves,
        layers,
        unmatched_cols,
    }
}
