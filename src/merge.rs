//! C4: merges up to `B - 1` sorted runs into one larger sorted run using
//! one input page per run plus one shared output page.

use std::cmp::Ordering;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::comparator::RecordComparator;
use crate::config::SortConfig;
use crate::error::SortError;
use crate::metrics::Metrics;
use crate::page;

pub(crate) fn read_page<S: Read + Seek>(scratch: &mut S, offset: u64, page: &mut [u8]) -> Result<(), SortError> {
    scratch.seek(SeekFrom::Start(offset)).map_err(SortError::ReadFailed)?;
    scratch.read_exact(page).map_err(SortError::ReadFailed)
}

pub(crate) fn write_page<S: Write + Seek>(scratch: &mut S, offset: u64, page: &[u8]) -> Result<(), SortError> {
    scratch.seek(SeekFrom::Start(offset)).map_err(SortError::WriteFailed)?;
    scratch.write_all(page).map_err(SortError::WriteFailed)
}

/// Merges the `k = run_offset.len()` source runs described by
/// `run_offset`/`run_count` (page-0 offset and page count of each run)
/// into one output run written to `scratch` starting at `output_offset`.
///
/// `buffer` must hold at least `config.buffer_pages()` pages; pages
/// `0..k` stage one input page per source run and the last page
/// (`config.buffer_pages() - 1`) stages the output. Ties are broken in
/// favor of the earlier-indexed (lower `j`) run: a candidate only
/// replaces the current best on a strict `Greater` comparison of
/// `(best, candidate)`, matching the reference engine's `compareFn`
/// usage exactly.
///
/// Returns the number of pages written to the output run.
pub fn merge_runs<S, C>(
    scratch: &mut S,
    buffer: &mut [u8],
    config: &SortConfig,
    cmp: &C,
    run_offset: &mut [u64],
    run_count: &mut [u64],
    output_offset: u64,
    metrics: &mut Metrics,
) -> Result<u64, SortError>
where
    S: Read + Write + Seek,
    C: RecordComparator,
{
    let k = run_offset.len();
    assert_eq!(run_count.len(), k);
    assert!(k > 0 && k <= config.max_runs_per_pass());

    let page_size = config.page_size();
    let header_size = config.header_size();
    let record_size = config.record_size();
    let output_page_index = config.buffer_pages() - 1;

    let mut pos = vec![0usize; k];

    for j in 0..k {
        let (start, end) = (j * page_size, (j + 1) * page_size);
        read_page(scratch, run_offset[j], &mut buffer[start..end])?;
        metrics.page_reads += 1;
    }

    let mut out_pos = header_size;
    let mut out_block_index: u32 = 0;
    let mut write_cursor = output_offset;

    let record_offset = |j: usize, slot: usize| j * page_size + header_size + slot * record_size;

    loop {
        let mut best: Option<usize> = None;
        for j in 0..k {
            if run_count[j] == 0 {
                continue;
            }
            match best {
                None => best = Some(j),
                Some(b) => {
                    metrics.comparisons += 1;
                    let best_rec = &buffer[record_offset(b, pos[b])..record_offset(b, pos[b]) + record_size];
                    let cand_rec = &buffer[record_offset(j, pos[j])..record_offset(j, pos[j]) + record_size];
                    if cmp.compare(best_rec, cand_rec) == Ordering::Greater {
                        best = Some(j);
                    }
                }
            }
        }
        let best = match best {
            Some(b) => b,
            None => break,
        };

        let src = record_offset(best, pos[best]);
        let dst = output_page_index * page_size + out_pos;
        buffer.copy_within(src..src + record_size, dst);
        metrics.record_copies += 1;
        out_pos += record_size;

        if out_pos > page_size - record_size {
            let out_start = output_page_index * page_size;
            let count = ((out_pos - header_size) / record_size) as u16;
            page::write_page_header(&mut buffer[out_start..out_start + header_size], out_block_index, count);
            write_page(scratch, write_cursor, &buffer[out_start..out_start + page_size])?;
            metrics.page_writes += 1;
            write_cursor += page_size as u64;
            out_block_index += 1;
            out_pos = header_size;
        }

        pos[best] += 1;
        let page_start = best * page_size;
        let loaded_count = page::read_record_count(&buffer[page_start..page_start + header_size]) as usize;
        if pos[best] >= loaded_count {
            run_offset[best] += page_size as u64;
            run_count[best] -= 1;
            pos[best] = 0;
            if run_count[best] > 0 {
                let (start, end) = (page_start, page_start + page_size);
                read_page(scratch, run_offset[best], &mut buffer[start..end])?;
                metrics.page_reads += 1;
            }
        }
    }

    if out_pos > header_size {
        let out_start = output_page_index * page_size;
        let count = ((out_pos - header_size) / record_size) as u16;
        page::write_page_header(&mut buffer[out_start..out_start + header_size], out_block_index, count);
        write_page(scratch, write_cursor, &buffer[out_start..out_start + page_size])?;
        metrics.page_writes += 1;
        out_block_index += 1;
    }

    Ok(out_block_index as u64)
}
