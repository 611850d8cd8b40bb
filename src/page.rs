//! The fixed-size page header every page-framed run is built from.
//!
//! Each page is `page_size` bytes: a 6-byte header followed by a dense
//! packing of fixed-size records.
//!
//! ```text
//!  0                 4     6                                   page_size
//!  +-----------------+-----+------------------------------------------+
//!  |  block_index u32 | count u16 | record 0 | record 1 | ... | record T-1 |
//!  +-----------------+-----+------------------------------------------+
//! ```
//!
//! `block_index` is the page's position within its run (0-based); `count`
//! is the number of live records the page holds (less than `T` only on a
//! run's last page). Both fields are little-endian.

/// Header size in bytes: a `u32` block index plus a `u16` record count.
pub const HEADER_SIZE: usize = 6;

const BLOCK_INDEX_RANGE: std::ops::Range<usize> = 0..4;
const RECORD_COUNT_RANGE: std::ops::Range<usize> = 4..HEADER_SIZE;

/// Writes a page header into the first `HEADER_SIZE` bytes of `page`.
///
/// # Panics
///
/// Panics if `page` is shorter than `HEADER_SIZE`.
pub fn write_page_header(page: &mut [u8], block_index: u32, record_count: u16) {
    page[BLOCK_INDEX_RANGE].copy_from_slice(&block_index.to_le_bytes());
    page[RECORD_COUNT_RANGE].copy_from_slice(&record_count.to_le_bytes());
}

/// Reads the block index from the first `HEADER_SIZE` bytes of `page`.
///
/// # Panics
///
/// Panics if `page` is shorter than `HEADER_SIZE`.
pub fn read_block_index(page: &[u8]) -> u32 {
    u32::from_le_bytes(page[BLOCK_INDEX_RANGE].try_into().unwrap())
}

/// Reads the live record count from the first `HEADER_SIZE` bytes of `page`.
///
/// # Panics
///
/// Panics if `page` is shorter than `HEADER_SIZE`.
pub fn read_record_count(page: &[u8]) -> u16 {
    u16::from_le_bytes(page[RECORD_COUNT_RANGE].try_into().unwrap())
}
