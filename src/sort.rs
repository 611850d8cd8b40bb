//! In-memory sort adapter: reorders a contiguous region of records.
//!
//! The engine treats this as a black box total-order sort over a
//! contiguous byte region; it does not care which algorithm is used, only
//! that it is `O(n log n)` in comparisons and that comparator/copy counts
//! are observable through [`crate::metrics::Metrics`].

use crate::comparator::RecordComparator;
use crate::metrics::Metrics;

/// Sorts the first `n` records of size `record_size` in `region` into
/// non-decreasing order according to `cmp`. Stability is not guaranteed.
///
/// # Panics
///
/// Panics if `region` is shorter than `n * record_size`.
pub fn sort_records(
    region: &mut [u8],
    n: usize,
    record_size: usize,
    cmp: &dyn RecordComparator,
    metrics: &mut Metrics,
) {
    assert!(region.len() >= n * record_size);
    if n < 2 {
        return;
    }

    let chunk_at = |buf: &[u8], i: usize| &buf[i * record_size..(i + 1) * record_size];

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_unstable_by(|&i, &j| {
        metrics.comparisons += 1;
        cmp.compare(chunk_at(region, i), chunk_at(region, j))
    });

    let mut reordered = vec![0u8; n * record_size];
    for (dest_idx, &src_idx) in order.iter().enumerate() {
        let src = chunk_at(region, src_idx);
        reordered[dest_idx * record_size..(dest_idx + 1) * record_size].copy_from_slice(src);
        metrics.record_copies += 1;
    }
    region[..n * record_size].copy_from_slice(&reordered);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::FnComparator;

    fn key_of(record: &[u8]) -> i32 {
        i32::from_le_bytes(record[..4].try_into().unwrap())
    }

    fn record(key: i32) -> [u8; 4] {
        key.to_le_bytes()
    }

    #[test]
    fn sorts_reverse_sequence() {
        let n = 100;
        let mut region = vec![0u8; n * 4];
        for i in 0..n {
            region[i * 4..i * 4 + 4].copy_from_slice(&record((n - i) as i32));
        }
        let cmp = FnComparator(|a: &[u8], b: &[u8]| key_of(a).cmp(&key_of(b)));
        let mut metrics = Metrics::new();
        sort_records(&mut region, n, 4, &cmp, &mut metrics);

        for i in 0..n {
            assert_eq!(key_of(&region[i * 4..i * 4 + 4]), (i + 1) as i32);
        }
        assert_eq!(metrics.record_copies as usize, n);
        assert!(metrics.comparisons > 0);
    }

    #[test]
    fn zero_and_one_record_are_no_ops() {
        let cmp = FnComparator(|a: &[u8], b: &[u8]| key_of(a).cmp(&key_of(b)));
        let mut metrics = Metrics::new();

        let mut empty: Vec<u8> = vec![];
        sort_records(&mut empty, 0, 4, &cmp, &mut metrics);
        assert_eq!(metrics.comparisons, 0);

        let mut single = record(42).to_vec();
        sort_records(&mut single, 1, 4, &cmp, &mut metrics);
        assert_eq!(key_of(&single), 42);
    }
}
