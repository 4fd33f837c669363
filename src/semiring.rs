//! Pluggable semirings for frontier propagation
//!
//! Sparse matrix-vector multiplication over a boolean incidence pattern only
//! needs two operations: `combine` produces the value carried across a present
//! edge, and `reduce` merges concurrent contributions to the same output
//! vertex. Both are associated functions so the hot loop stays branch-free
//! (static dispatch, no per-element virtual calls).

/// A combine/reduce pair plugged into [`DistMatrix::spmv`](crate::DistMatrix::spmv).
///
/// `reduce` must be associative and commutative; the result of an SpMV is then
/// independent of block shape, message order and thread count.
pub trait Semiring<T> {
    /// Value carried across a present edge (the "multiply" of the semiring).
    fn combine(label: &T) -> T;

    /// Merge two contributions to the same output vertex (the "add").
    fn reduce(a: T, b: T) -> T;
}

/// Select-second-min: forward the incoming label unchanged, keep the minimum
/// when several frontier vertices reach the same output vertex.
///
/// The minimum is taken under `T`'s total order, which is what makes the
/// choice of discoverer deterministic regardless of partitioning. This is the
/// only semiring the matching engine uses.
#[derive(Debug, Clone, Copy)]
pub struct SelectSecondMin;

impl<T: Ord + Clone> Semiring<T> for SelectSecondMin {
    #[inline]
    fn combine(label: &T) -> T {
        label.clone()
    }

    #[inline]
    fn reduce(a: T, b: T) -> T {
        if b < a {
            b
        } else {
            a
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_keeps_minimum() {
        assert_eq!(<SelectSecondMin as Semiring<i64>>::reduce(3, 7), 3);
        assert_eq!(<SelectSecondMin as Semiring<i64>>::reduce(7, 3), 3);
    }

    #[test]
    fn test_reduce_is_first_biased_on_ties() {
        // Equal contributions collapse to one value either way; the guard
        // `b < a` keeps the left argument, so reduce(a, a) == a.
        assert_eq!(<SelectSecondMin as Semiring<i64>>::reduce(5, 5), 5);
    }

    #[test]
    fn test_combine_forwards_label() {
        assert_eq!(<SelectSecondMin as Semiring<i64>>::combine(&42), 42);
    }
}
