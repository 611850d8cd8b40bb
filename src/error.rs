//! Error type for the external merge sort engine.

use std::io;

/// Errors the engine can return. All are fatal to the current sort; none
/// is retried internally.
#[derive(Debug, thiserror::Error)]
pub enum SortError {
    /// Allocation failure for per-pass bookkeeping (`run_offset`, `run_count`, `pos`).
    #[error("allocation failure preparing merge pass state")]
    Alloc,

    /// A page write to the scratch file failed.
    #[error("failed writing page to scratch file: {0}")]
    WriteFailed(#[source] io::Error),

    /// A page read from the scratch file failed.
    #[error("failed reading page from scratch file: {0}")]
    ReadFailed(#[source] io::Error),

    /// The supplied working buffer or configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl SortError {
    /// Numeric return code matching the reference engine's wire-level contract:
    /// 0 success, 8 allocation failure, 9 write failure, 10 read failure.
    ///
    /// `InvalidConfig` has no reference-engine counterpart; it is caught before
    /// the sort begins and is reported as 8, the closest analog (a precondition
    /// the reference engine would have undefined behavior on).
    pub fn code(&self) -> u8 {
        match self {
            SortError::Alloc => 8,
            SortError::InvalidConfig(_) => 8,
            SortError::WriteFailed(_) => 9,
            SortError::ReadFailed(_) => 10,
        }
    }
}
