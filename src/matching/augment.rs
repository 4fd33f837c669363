//! Augmentation: flip every discovered path via one-sided updates
//!
//! Each leaf starts an independent backward walk: read the row's discoverer,
//! atomically install the row as the discoverer-column's new partner (the
//! swapped-out previous partner is the next row of the walk), record the
//! row's new partner, repeat until the chain origin (-1) is reached. All
//! chains run inside a single open/close epoch pair so the next phase only
//! starts once every matching-state write is visible.

use rayon::prelude::*;

use crate::grid::{DistVec, RemoteWindow};

use super::label::UNMATCHED;

/// Flip all augmenting paths recorded in `leaves`/`parents_row` into the
/// matching arrays. Mutual consistency of the two arrays holds again on
/// return.
pub(crate) fn augment(
    leaves: &DistVec<i64>,
    parents_row: &DistVec<i64>,
    mate_row2col: &mut DistVec<i64>,
    mate_col2row: &mut DistVec<i64>,
) {
    // Gather the local leaf rows of every rank; each one seeds a chain.
    let chains: Vec<i64> = (0..leaves.num_parts())
        .flat_map(|k| leaves.part(k).iter().copied().filter(|&r| r != UNMATCHED))
        .collect();
    if chains.is_empty() {
        return;
    }

    // Entry fence: expose both matching arrays for one-sided access.
    let row2col_win = RemoteWindow::open(mate_row2col);
    let col2row_win = RemoteWindow::open(mate_col2row);

    chains.par_iter().for_each(|&leaf| {
        let mut row = leaf;
        while row != UNMATCHED {
            let col = parents_row.read(row);
            // The swap both installs the new partner and hands this chain
            // the column's previous partner to continue with; two chains
            // meeting at one column serialize here instead of losing a write.
            let nextrow = col2row_win.fetch_replace(col, row);
            row2col_win.put(row, col);
            row = nextrow;
        }
    });

    // Exit fence: windows drop, writes become visible to plain access.
    drop(row2col_win);
    drop(col2row_win);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ProcessGrid;

    #[test]
    fn test_augment_single_edge() {
        // Root col 1 discovered free row 1 directly: leaves[1] = 1,
        // parents_row[1] = 1. One flip: row1 <-> col1.
        let grid = ProcessGrid::unit();
        let leaves = DistVec::from_slice(grid, &[-1i64, 1]);
        let parents = DistVec::from_slice(grid, &[-1i64, 1]);
        let mut r2c = DistVec::from_slice(grid, &[0i64, -1]);
        let mut c2r = DistVec::from_slice(grid, &[0i64, -1]);

        augment(&leaves, &parents, &mut r2c, &mut c2r);

        assert_eq!(r2c.to_vec(), vec![0, 1]);
        assert_eq!(c2r.to_vec(), vec![0, 1]);
    }

    #[test]
    fn test_augment_walks_alternating_chain() {
        // Path (root) col1 -> row0 -> col0 -> row1 with row0<->col0 matched:
        // parents_row = [1, 0], leaves[1] = 1 (leaf row 1 under root 1).
        // Flipping yields row1<->col0, row0<->col1.
        let grid = ProcessGrid::new(2, 2).unwrap();
        let leaves = DistVec::from_slice(grid, &[-1i64, 1]);
        let parents = DistVec::from_slice(grid, &[1i64, 0]);
        let mut r2c = DistVec::from_slice(grid, &[0i64, -1]);
        let mut c2r = DistVec::from_slice(grid, &[0i64, -1]);

        augment(&leaves, &parents, &mut r2c, &mut c2r);

        assert_eq!(r2c.to_vec(), vec![1, 0]);
        assert_eq!(c2r.to_vec(), vec![1, 0]);
    }

    #[test]
    fn test_augment_no_leaves_is_noop() {
        let grid = ProcessGrid::unit();
        let leaves = DistVec::new(grid, 3, UNMATCHED);
        let parents = DistVec::new(grid, 3, UNMATCHED);
        let mut r2c = DistVec::from_slice(grid, &[2i64, -1, -1]);
        let mut c2r = DistVec::from_slice(grid, &[-1i64, -1, 0]);

        augment(&leaves, &parents, &mut r2c, &mut c2r);

        assert_eq!(r2c.to_vec(), vec![2, -1, -1]);
        assert_eq!(c2r.to_vec(), vec![-1, -1, 0]);
    }
}
