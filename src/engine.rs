//! Top-level entry point: run generation followed by however many merge
//! passes it takes to collapse the runs into one.

use std::io::{Read, Seek, Write};

use crate::comparator::RecordComparator;
use crate::config::SortConfig;
use crate::error::SortError;
use crate::iterator::RecordSource;
use crate::metrics::Metrics;
use crate::pass::run_merge_passes;
use crate::run_generator::generate_runs;

/// Sorts every record `iter` yields, according to `cmp`, using `scratch`
/// as working storage and `buffer` (`config.buffer_len()` bytes) as the
/// in-memory working set.
///
/// Returns the byte offset in `scratch` the sorted run begins at. An
/// empty input yields `0` with nothing written. A single generated run
/// also yields `0` without a merge phase, since run generation always
/// starts writing at offset 0.
pub fn external_merge_sort<S, I, C>(
    iter: &mut I,
    scratch: &mut S,
    buffer: &mut [u8],
    config: &SortConfig,
    cmp: &C,
    metrics: &mut Metrics,
) -> Result<u64, SortError>
where
    S: Read + Write + Seek,
    I: RecordSource,
    C: RecordComparator,
{
    if buffer.len() < config.buffer_len() {
        return Err(SortError::InvalidConfig(
            "buffer shorter than config.buffer_len()",
        ));
    }

    let (num_runs, write_cursor) =
        generate_runs(iter, scratch, buffer, config, cmp, metrics)?;

    if num_runs <= 1 {
        log::debug!("sort needs no merge phase ({} run)", num_runs);
        return Ok(0);
    }

    let offset = run_merge_passes(scratch, buffer, config, cmp, num_runs, write_cursor, metrics)?;
    log::debug!("sort complete, output run at offset {}", offset);
    Ok(offset)
}
