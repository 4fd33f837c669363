//! gridmatch: distributed-memory bipartite maximum-cardinality matching
//!
//! # Overview
//!
//! Computes a maximum matching of a bipartite graph whose vertex sets and
//! adjacency matrix are partitioned across a 2-D process grid, by repeated
//! augmenting-path phases expressed entirely as sparse matrix/vector
//! operations: frontier propagation is semiring SpMV with a deterministic
//! tie-break, the current matching is lifted into an incidence matrix each
//! phase, and discovered paths are flipped through one-sided remote updates
//! inside bracketed synchronization epochs.
//!
//! # Quick Start
//!
//! ```
//! use gridmatch::{maximum_matching, DistMatrix, DistVec, ProcessGrid, UNMATCHED};
//!
//! let grid = ProcessGrid::new(2, 2).unwrap();
//! // 4 row vertices, 4 column vertices.
//! let a = DistMatrix::from_edges(
//!     grid,
//!     4,
//!     4,
//!     &[(0, 0), (0, 1), (1, 0), (2, 2), (3, 2), (3, 3)],
//! )
//! .unwrap();
//!
//! let mut mate_row2col = DistVec::new(grid, 4, UNMATCHED);
//! let mut mate_col2row = DistVec::new(grid, 4, UNMATCHED);
//!
//! let stats = maximum_matching(&a, &mut mate_row2col, &mut mate_col2row).unwrap();
//! assert_eq!(stats.matched, 4);
//! ```
//!
//! # Architecture
//!
//! - **Substrate** (`grid`): process grid, 1-D block vectors, 2-D block CSC
//!   matrices, semiring SpMV, one-sided access windows. Executes the
//!   partitioned model in a single address space; intra-rank work is
//!   threaded with rayon, and results are identical for every grid shape
//!   and thread count.
//! - **Engine** (`matching`): phase controller, layered forest search with
//!   inline pruning, one-sided augmentation, bipartite-permutation builder,
//!   plus a greedy maximal-matching initializer and a verification helper.
//!
//! The graph matrix is immutable; the only state mutated across phases is
//! the pair of matching arrays, and only inside augmentation's epoch.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
// Vertex ids are i64 end to end; conversions into local block offsets are
// guarded by the ownership math.
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

pub mod grid;
pub mod matching;
pub mod semiring;

// Re-export core types
pub use grid::{DistMatrix, DistSpVec, DistVec, ProcessGrid, RemoteWindow, ShapeError};
pub use matching::{
    greedy_maximal_matching, incidence_from_dense, incidence_from_sparse, maximum_matching,
    verify_matching, MatchingStats, VertexId, VertexLabel, UNMATCHED,
};
pub use semiring::{SelectSecondMin, Semiring};

// Error type
pub use anyhow::{Error, Result};
