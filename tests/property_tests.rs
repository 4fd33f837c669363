//! Property-based tests for gridmatch
//!
//! Random bipartite graphs are checked against a straightforward serial
//! augmenting-path solver, and the distributed engine is required to produce
//! bit-identical results for every grid shape and thread count.

use proptest::prelude::*;
use serial_test::serial;

use gridmatch::{
    maximum_matching, verify_matching, DistMatrix, DistVec, ProcessGrid, UNMATCHED,
};

/// Serial maximum matching by Kuhn's algorithm, the reference cardinality.
fn reference_matching_size(nrows: usize, ncols: usize, edges: &[(i64, i64)]) -> i64 {
    let mut adj = vec![Vec::new(); ncols];
    for &(r, c) in edges {
        adj[c as usize].push(r as usize);
    }
    for neighbors in &mut adj {
        neighbors.sort_unstable();
        neighbors.dedup();
    }

    fn try_augment(
        col: usize,
        adj: &[Vec<usize>],
        row_mate: &mut [i64],
        visited: &mut [bool],
    ) -> bool {
        for &row in &adj[col] {
            if visited[row] {
                continue;
            }
            visited[row] = true;
            if row_mate[row] == -1
                || try_augment(row_mate[row] as usize, adj, row_mate, visited)
            {
                row_mate[row] = col as i64;
                return true;
            }
        }
        false
    }

    let mut row_mate = vec![-1i64; nrows];
    let mut size = 0i64;
    for col in 0..ncols {
        let mut visited = vec![false; nrows];
        if try_augment(col, &adj, &mut row_mate, &mut visited) {
            size += 1;
        }
    }
    size
}

fn solve(
    grid: ProcessGrid,
    nrows: i64,
    ncols: i64,
    edges: &[(i64, i64)],
) -> (i64, Vec<i64>, Vec<i64>) {
    let a = DistMatrix::from_edges(grid, nrows, ncols, edges).unwrap();
    let mut r2c = DistVec::new(grid, nrows, UNMATCHED);
    let mut c2r = DistVec::new(grid, ncols, UNMATCHED);
    let stats = maximum_matching(&a, &mut r2c, &mut c2r).unwrap();
    let checked = verify_matching(&a, &r2c, &c2r).unwrap();
    assert_eq!(checked, stats.matched);
    (stats.matched, r2c.to_vec(), c2r.to_vec())
}

/// Random bipartite instances: dimensions plus an edge list over them.
fn prop_bipartite() -> impl Strategy<Value = (i64, i64, Vec<(i64, i64)>)> {
    (1i64..40, 1i64..40).prop_flat_map(|(nrows, ncols)| {
        let edges = prop::collection::vec((0..nrows, 0..ncols), 0..150);
        (Just(nrows), Just(ncols), edges)
    })
}

proptest! {
    // Property: the engine's cardinality equals the serial solver's on
    // arbitrary graphs, and the result always passes verification.
    #[test]
    fn prop_cardinality_matches_serial_reference(
        (nrows, ncols, edges) in prop_bipartite()
    ) {
        let expected = reference_matching_size(nrows as usize, ncols as usize, &edges);

        let grid = ProcessGrid::new(2, 2).unwrap();
        let (matched, _, _) = solve(grid, nrows, ncols, &edges);
        prop_assert_eq!(matched, expected);
    }
}

proptest! {
    // Property: the full result, not just its size, is independent of the
    // process-grid shape.
    #[test]
    fn prop_result_independent_of_grid_shape(
        (nrows, ncols, edges) in prop_bipartite()
    ) {
        let baseline = solve(ProcessGrid::unit(), nrows, ncols, &edges);

        for (pr, pc) in [(2usize, 2usize), (1, 4), (3, 2)] {
            let grid = ProcessGrid::new(pr, pc).unwrap();
            let other = solve(grid, nrows, ncols, &edges);
            prop_assert_eq!(&other, &baseline, "grid {}x{} diverged", pr, pc);
        }
    }
}

proptest! {
    // Property: matching arrays stay mutually consistent; every matched
    // column's row points straight back.
    #[test]
    fn prop_mate_arrays_mutually_consistent(
        (nrows, ncols, edges) in prop_bipartite()
    ) {
        let grid = ProcessGrid::new(2, 2).unwrap();
        let (_, r2c, c2r) = solve(grid, nrows, ncols, &edges);

        for (c, &r) in c2r.iter().enumerate() {
            if r != UNMATCHED {
                prop_assert_eq!(r2c[r as usize], c as i64);
            }
        }
        for (r, &c) in r2c.iter().enumerate() {
            if c != UNMATCHED {
                prop_assert_eq!(c2r[c as usize], r as i64);
            }
        }
    }
}

#[test]
#[serial]
fn test_result_independent_of_thread_count() {
    // Pseudo-random but fixed graph, solved under differently sized rayon
    // pools; the select-second-min tie-break must hide the schedule.
    let nrows = 60i64;
    let ncols = 50i64;
    let mut state = 0x2545_f491_4f6c_dd1du64;
    let mut edges = Vec::new();
    for _ in 0..400 {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let r = ((state >> 33) % nrows as u64) as i64;
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let c = ((state >> 33) % ncols as u64) as i64;
        edges.push((r, c));
    }

    let mut results = Vec::new();
    for threads in [1usize, 2, 8] {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();
        let grid = ProcessGrid::new(2, 2).unwrap();
        let result = pool.install(|| solve(grid, nrows, ncols, &edges));
        results.push(result);
    }

    assert_eq!(results[1], results[0]);
    assert_eq!(results[2], results[0]);
}
