//! The comparator capability records are ordered by.

use std::cmp::Ordering;

/// A total order over the record domain. Must be pure (no side effects,
/// no dependence on anything but `a` and `b`).
pub trait RecordComparator {
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering;
}

/// Adapts any `Fn(&[u8], &[u8]) -> Ordering` closure into a `RecordComparator`.
pub struct FnComparator<F>(pub F)
where
    F: Fn(&[u8], &[u8]) -> Ordering;

impl<F> RecordComparator for FnComparator<F>
where
    F: Fn(&[u8], &[u8]) -> Ordering,
{
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        (self.0)(a, b)
    }
}
