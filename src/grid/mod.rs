//! Distributed substrate: process grid, partitioned vectors and matrices
//!
//! Every distributed structure is decomposed over a fixed 2-D grid of ranks:
//! matrices in 2-D blocks (one per grid position), vectors in 1-D blocks over
//! all ranks. The substrate executes in a single address space, with per-rank
//! partitions living side by side and collectives as whole-grid operations,
//! but all ownership math, bucketed exchanges and one-sided epochs follow the
//! partitioned model, so results are identical for every grid shape.

pub mod dense;
pub mod matrix;
pub mod sparse;
pub mod window;

pub use dense::DistVec;
pub use matrix::DistMatrix;
pub use sparse::DistSpVec;
pub use window::RemoteWindow;

use thiserror::Error;

/// Configuration errors detected at the substrate boundary.
///
/// These are fatal: the matching engine never recovers from incompatible
/// partition shapes, it reports and stops.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    /// A process grid must have at least one rank in each dimension.
    #[error("process grid dimensions must be non-zero, got {rows}x{cols}")]
    EmptyGrid {
        /// Requested grid rows.
        rows: usize,
        /// Requested grid columns.
        cols: usize,
    },

    /// Two distributed structures live on different grids.
    #[error("process grid mismatch: {left:?} vs {right:?}")]
    GridMismatch {
        /// Grid of the first operand.
        left: (usize, usize),
        /// Grid of the second operand.
        right: (usize, usize),
    },

    /// A vector length does not match the matrix dimension it is paired with.
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Required length.
        expected: i64,
        /// Provided length.
        actual: i64,
    },

    /// An edge endpoint lies outside the declared matrix dimensions.
    #[error("index {index} out of bounds for dimension {len}")]
    IndexOutOfBounds {
        /// Offending index.
        index: i64,
        /// Dimension it was checked against.
        len: i64,
    },
}

/// A fixed 2-D grid of cooperating ranks.
///
/// Matrices are split into `proc_rows x proc_cols` blocks; vectors are split
/// into `proc_rows * proc_cols` consecutive 1-D blocks. Two structures can
/// only be combined when they share a grid.
///
/// # Example
///
/// ```
/// use gridmatch::ProcessGrid;
///
/// let grid = ProcessGrid::new(2, 2).unwrap();
/// assert_eq!(grid.num_ranks(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessGrid {
    proc_rows: usize,
    proc_cols: usize,
}

impl ProcessGrid {
    /// Create a grid with the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::EmptyGrid`] if either dimension is zero.
    pub fn new(proc_rows: usize, proc_cols: usize) -> Result<Self, ShapeError> {
        if proc_rows == 0 || proc_cols == 0 {
            return Err(ShapeError::EmptyGrid {
                rows: proc_rows,
                cols: proc_cols,
            });
        }
        Ok(Self {
            proc_rows,
            proc_cols,
        })
    }

    /// The trivial 1x1 grid (single rank).
    #[must_use]
    pub const fn unit() -> Self {
        Self {
            proc_rows: 1,
            proc_cols: 1,
        }
    }

    /// Number of rank rows in the grid.
    #[must_use]
    pub const fn proc_rows(&self) -> usize {
        self.proc_rows
    }

    /// Number of rank columns in the grid.
    #[must_use]
    pub const fn proc_cols(&self) -> usize {
        self.proc_cols
    }

    /// Total number of ranks.
    #[must_use]
    pub const fn num_ranks(&self) -> usize {
        self.proc_rows * self.proc_cols
    }

    /// Grid dimensions as a pair, for error reporting.
    #[must_use]
    pub const fn dims(&self) -> (usize, usize) {
        (self.proc_rows, self.proc_cols)
    }
}

/// Owner of global index `i` in a 1-D block decomposition of `n` elements
/// over `parts` partitions. Each partition holds `n / parts` elements; the
/// last one also takes the remainder.
#[inline]
pub(crate) fn block_owner(n: i64, parts: usize, i: i64) -> usize {
    debug_assert!(i >= 0 && i < n, "index {i} out of range 0..{n}");
    let per = n / parts as i64;
    if per == 0 {
        parts - 1
    } else {
        usize::min((i / per) as usize, parts - 1)
    }
}

/// Half-open global range `[start, end)` held by partition `k`.
#[inline]
pub(crate) fn block_range(n: i64, parts: usize, k: usize) -> (i64, i64) {
    debug_assert!(k < parts);
    let per = n / parts as i64;
    let start = per * k as i64;
    let end = if k + 1 == parts { n } else { per * (k as i64 + 1) };
    (start, end)
}
