//! C5: drives repeated merge passes over the scratch file in place, until
//! one sorted run remains.
//!
//! The scratch file is never grown beyond the space the initial runs
//! already occupy: each pass's output is written starting at the current
//! write cursor, which trails behind the not-yet-consumed input runs by
//! construction, and is reset to offset 0 every third pass (by which
//! point the original runs at the front of the file have always been
//! fully consumed). `first_partition_size` remembers how many pages the
//! first output run of a pass occupied, so the next pass that needs to
//! skip past it (because a later input run picked up mid-pass is really
//! that first output run) knows how far to jump.

use std::io::{Read, Seek, Write};

use crate::comparator::RecordComparator;
use crate::config::SortConfig;
use crate::error::SortError;
use crate::merge::{merge_runs, read_page};
use crate::metrics::Metrics;
use crate::page;

/// Repeatedly merges runs until one remains, starting from the
/// `num_runs` runs [`crate::run_generator::generate_runs`] left packed
/// into `[0, write_cursor)` of `scratch`.
///
/// Returns the file offset the single surviving run begins at. Callers
/// with `num_runs <= 1` should not call this; [`crate::engine`] handles
/// those cases directly (an empty or single-run input never merges).
pub fn run_merge_passes<S, C>(
    scratch: &mut S,
    buffer: &mut [u8],
    config: &SortConfig,
    cmp: &C,
    mut num_runs: u64,
    write_cursor_after_gen: u64,
    metrics: &mut Metrics,
) -> Result<u64, SortError>
where
    S: Read + Write + Seek,
    C: RecordComparator,
{
    let page_size = config.page_size() as i64;
    let max_runs_per_pass = config.max_runs_per_pass();

    let mut write_cursor: i64 = write_cursor_after_gen as i64;
    let mut first_run_ptr: i64 = 0;
    let mut last_block_ptr: i64 = write_cursor - page_size;
    let mut next_first_ptr: i64 = write_cursor;
    let mut pass_number: u32 = 1;
    // Overwritten with pass 1's real first-output-run page count as soon as
    // that run is produced (see `new_pass` below); never consulted before then.
    let mut first_partition_size: u64 = max_runs_per_pass as u64;

    let mut run_offset_i64 = vec![0i64; max_runs_per_pass];
    let mut run_count = vec![0u64; max_runs_per_pass];
    let mut probe = vec![0u8; config.page_size()];

    // Mirrors the reference controller's `newPass`, initialized true so the
    // very first output run produced (pass 1's first `merge_runs` call)
    // always gets to set `first_partition_size` from its real page count,
    // not just later pass-boundary crossings. Persists across outer
    // iterations: a pass whose input runs span more than one `merge_runs`
    // call (`num_runs > max_runs_per_pass`) must not re-arm this for its
    // second-and-later calls, only for the one where a boundary was
    // actually crossed (or, for pass 1, implicitly at the start).
    let mut new_pass = true;

    while num_runs > 1 {
        let mut i = 0usize;
        while i < max_runs_per_pass && (i as u64) < num_runs {
            if last_block_ptr < first_run_ptr {
                new_pass = true;
                if i > 0 && i < max_runs_per_pass - 1 {
                    first_run_ptr = next_first_ptr + first_partition_size as i64 * page_size;
                } else {
                    first_run_ptr = next_first_ptr;
                }
                last_block_ptr = write_cursor - page_size;
                pass_number += 1;
                if pass_number % 3 == 0 {
                    log::trace!("pass {}: wrapping write cursor to 0", pass_number);
                    write_cursor = 0;
                }
                next_first_ptr = write_cursor;
            }

            read_page(scratch, last_block_ptr as u64, &mut probe)?;
            metrics.page_reads += 1;
            let block_index = page::read_block_index(&probe) as i64;
            run_count[i] = (block_index + 1) as u64;
            run_offset_i64[i] = last_block_ptr - block_index * page_size;
            last_block_ptr = run_offset_i64[i] - page_size;

            i += 1;
        }
        let k = i;

        let mut run_offset: Vec<u64> = run_offset_i64[..k].iter().map(|&o| o as u64).collect();
        let output_offset = write_cursor as u64;
        let pages_written = merge_runs(
            scratch,
            buffer,
            config,
            cmp,
            &mut run_offset,
            &mut run_count[..k],
            output_offset,
            metrics,
        )?;

        if new_pass {
            first_partition_size = pages_written;
            new_pass = false;
        }

        write_cursor += pages_written as i64 * page_size;
        num_runs = num_runs - k as u64 + 1;
    }

    Ok(next_first_ptr as u64)
}
