//! The matching engine: phase controller, layered search, augmentation,
//! and the permutation builder it rebuilds the matching matrix with.

mod augment;
mod search;

pub mod driver;
pub mod greedy;
pub mod label;
pub mod permutation;
pub mod verify;

pub use driver::{maximum_matching, MatchingStats};
pub use greedy::greedy_maximal_matching;
pub use label::{VertexId, VertexLabel, UNMATCHED};
pub use permutation::{incidence_from_dense, incidence_from_sparse};
pub use verify::verify_matching;
