//! One-sided remote access epochs over dense `i64` vectors
//!
//! Augmentation chases parent pointers across partitions owned by other
//! ranks. Those accesses happen inside an *epoch*: opening the window is the
//! entry fence, dropping it is the exit fence after which all writes are
//! visible and the vector is plain data again. Between the fences any chain
//! may `get`/`put`/`fetch_replace` any element regardless of ownership.

use std::sync::atomic::{AtomicI64, Ordering};

use super::dense::DistVec;
use super::{block_owner, block_range, ProcessGrid};

/// An open one-sided access window over a [`DistVec<i64>`].
///
/// Opening moves the vector's partitions into atomic cells;
/// [`fetch_replace`](RemoteWindow::fetch_replace) is then a true atomic swap,
/// the single point of cross-chain mutual exclusion the algorithm needs.
/// Dropping the window writes the partitions back (the closing fence); this
/// happens on every exit path, including panics.
#[derive(Debug)]
pub struct RemoteWindow<'a> {
    vec: &'a mut DistVec<i64>,
    grid: ProcessGrid,
    len: i64,
    parts: Vec<Vec<AtomicI64>>,
}

impl<'a> RemoteWindow<'a> {
    /// Open an access epoch on `vec` (the entry fence).
    pub fn open(vec: &'a mut DistVec<i64>) -> Self {
        let grid = vec.grid();
        let len = vec.len();
        let parts = vec
            .take_parts()
            .into_iter()
            .map(|part| part.into_iter().map(AtomicI64::new).collect())
            .collect();
        Self {
            vec,
            grid,
            len,
            parts,
        }
    }

    #[inline]
    fn cell(&self, i: i64) -> &AtomicI64 {
        debug_assert!(i >= 0 && i < self.len, "index {i} out of bounds");
        let ranks = self.grid.num_ranks();
        let owner = block_owner(self.len, ranks, i);
        let (start, _) = block_range(self.len, ranks, owner);
        &self.parts[owner][(i - start) as usize]
    }

    /// One-sided read of element `i`.
    #[must_use]
    pub fn get(&self, i: i64) -> i64 {
        self.cell(i).load(Ordering::SeqCst)
    }

    /// One-sided write of element `i`.
    pub fn put(&self, i: i64, value: i64) {
        self.cell(i).store(value, Ordering::SeqCst);
    }

    /// Atomically install `value` at element `i` and return the previous
    /// value. Concurrent chains touching the same element serialize here;
    /// no update is lost.
    pub fn fetch_replace(&self, i: i64, value: i64) -> i64 {
        self.cell(i).swap(value, Ordering::SeqCst)
    }
}

impl Drop for RemoteWindow<'_> {
    fn drop(&mut self) {
        let parts = std::mem::take(&mut self.parts)
            .into_iter()
            .map(|part| part.into_iter().map(AtomicI64::into_inner).collect())
            .collect();
        self.vec.restore_parts(parts);
    }
}
