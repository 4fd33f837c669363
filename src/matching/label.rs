//! Vertex labels carried through the frontier

use std::cmp::Ordering;

/// Global vertex identifier. Rows and columns are numbered independently
/// from zero.
pub type VertexId = i64;

/// Sentinel for "no partner" / "not discovered".
pub const UNMATCHED: VertexId = -1;

/// The label propagated through alternating-path forests.
///
/// `root` is the unmatched column vertex that originated the tree, `parent`
/// the immediate predecessor on the alternating path, and `prob` a tie-break
/// priority carried for extensibility (always zero in the deterministic
/// engine, but it compares first so a weighted variant can bias discoverer
/// selection without touching the semiring).
///
/// The total order (`prob` first, then `parent`) is what the
/// select-second-min reduction minimizes over; `root` never participates in
/// comparison.
#[derive(Debug, Clone, Copy)]
pub struct VertexLabel {
    /// Immediate predecessor (a column vertex) on the alternating path.
    pub parent: VertexId,
    /// The unmatched column vertex this tree grows from.
    pub root: VertexId,
    /// Tie-break priority; compared before `parent`.
    pub prob: i16,
}

impl VertexLabel {
    /// Label with the given parent and root, priority zero.
    #[must_use]
    pub const fn new(parent: VertexId, root: VertexId) -> Self {
        Self {
            parent,
            root,
            prob: 0,
        }
    }
}

impl PartialEq for VertexLabel {
    fn eq(&self, other: &Self) -> bool {
        self.prob == other.prob && self.parent == other.parent
    }
}

impl Eq for VertexLabel {}

impl PartialOrd for VertexLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VertexLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.prob, self.parent).cmp(&(other.prob, other.parent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_prob_then_parent() {
        let a = VertexLabel { parent: 9, root: 0, prob: 0 };
        let b = VertexLabel { parent: 2, root: 1, prob: 1 };
        assert!(a < b, "lower prob wins regardless of parent");

        let c = VertexLabel::new(3, 7);
        let d = VertexLabel::new(5, 1);
        assert!(c < d, "equal prob falls back to parent");
    }

    #[test]
    fn test_root_does_not_participate() {
        let a = VertexLabel::new(3, 100);
        let b = VertexLabel::new(3, 200);
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }
}
