//! I/O and work metrics for the sort engine.

/// Counters incremented, without gating, over the course of a sort call.
///
/// The engine owns none of this; callers pass in a `&mut Metrics` that
/// outlives the call and may snapshot or log it afterward.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Metrics {
    pub page_reads: u64,
    pub page_writes: u64,
    pub comparisons: u64,
    pub record_copies: u64,
}

impl Metrics {
    pub fn new() -> Metrics {
        Metrics::default()
    }

    pub fn total_io(&self) -> u64 {
        self.page_reads + self.page_writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_io_sums_reads_and_writes() {
        let m = Metrics {
            page_reads: 3,
            page_writes: 5,
            comparisons: 0,
            record_copies: 0,
        };
        assert_eq!(m.total_io(), 8);
    }
}
