//! Greedy maximal-matching initializer
//!
//! An optional pre-pass before [`maximum_matching`](crate::maximum_matching):
//! repeatedly let every unmatched column propose across the graph, give each
//! unmatched row to its minimum proposer, and keep one row per column. The
//! result is maximal (no unmatched column is adjacent to an unmatched row),
//! which typically leaves the augmenting-path engine far fewer phases to run.
//!
//! Expressed through the same SpMV/invert primitives as the engine proper, so
//! it inherits their determinism under arbitrary partitioning.

use anyhow::{ensure, Result};
use log::debug;

use crate::grid::{DistMatrix, DistSpVec, DistVec};
use crate::semiring::SelectSecondMin;

use super::label::{VertexLabel, UNMATCHED};

/// Grow the matching in `mate_row2col`/`mate_col2row` to a maximal one.
///
/// Returns the number of newly matched pairs. The arrays may start all
/// unmatched or hold any consistent partial matching; only unmatched
/// vertices participate.
///
/// # Errors
///
/// Returns an error when the three structures disagree on process grid or
/// dimensions.
pub fn greedy_maximal_matching(
    a: &DistMatrix,
    mate_row2col: &mut DistVec<i64>,
    mate_col2row: &mut DistVec<i64>,
) -> Result<i64> {
    ensure!(
        a.grid() == mate_row2col.grid() && a.grid() == mate_col2row.grid(),
        "process grid mismatch"
    );
    ensure!(
        mate_row2col.len() == a.nrows() && mate_col2row.len() == a.ncols(),
        "mate array lengths do not match matrix dimensions"
    );

    let nrows = a.nrows();
    let ncols = a.ncols();
    let mut added = 0i64;
    let mut rounds = 0usize;

    loop {
        // Every unmatched column proposes along all of its edges.
        let fringe_col =
            DistSpVec::from_dense(mate_col2row, |m| m == UNMATCHED, |c| VertexLabel::new(c, c));
        if fringe_col.nnz() == 0 {
            break;
        }

        // Each unmatched row accepts its minimum proposer...
        let fringe_row = a
            .spmv::<VertexLabel, SelectSecondMin>(&fringe_col)
            .select_with(mate_row2col, |_, m| m == UNMATCHED);

        // ...and each proposer keeps its minimum accepting row. Two inverts
        // turn row->column acceptances into a consistent pairing: the first
        // dedups columns, the second recovers the surviving rows.
        let col_to_row = fringe_row.map(|l| l.parent).invert(ncols);
        if col_to_row.nnz() == 0 {
            break;
        }
        let row_to_col = col_to_row.invert(nrows);

        mate_col2row.assign_from(&col_to_row, |&r| r);
        mate_row2col.assign_from(&row_to_col, |&c| c);

        added += col_to_row.nnz();
        rounds += 1;
        debug!("greedy round {rounds}: matched {} pairs", col_to_row.nnz());
    }

    debug!("greedy init: {added} pairs in {rounds} rounds");
    Ok(added)
}
