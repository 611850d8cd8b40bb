//! C3: drains the input iterator in buffer-sized chunks, sorts each chunk
//! in memory, and appends one page-framed sorted run per chunk to the
//! scratch file.

use std::io::{Seek, SeekFrom, Write};

use crate::comparator::RecordComparator;
use crate::config::SortConfig;
use crate::error::SortError;
use crate::iterator::RecordSource;
use crate::metrics::Metrics;
use crate::page;
use crate::sort::sort_records;

/// Fills `buffer` from `iter` one working-buffer's worth at a time, sorts
/// each chunk, and appends it to `scratch` as a page-framed run.
///
/// Each chunk is filled densely into a flat, header-free prefix of
/// `buffer` (so [`crate::sort::sort_records`] can operate on a genuinely
/// contiguous region, as its contract requires), sorted there, and only
/// then relocated — record by record, via [`slice::copy_within`], which
/// is safe under self-overlap regardless of direction — into its final
/// paged position, where each page reserves its header bytes before any
/// record is written into it. This sidesteps the header/data collision
/// the naive "pack densely, then stamp headers over the first bytes of
/// each page" approach suffers: no record is ever written to a byte
/// range a still-unread record occupies.
///
/// Returns `(num_runs, write_cursor)`, where `write_cursor` is the file
/// offset one past the last byte written — the scratch file's live
/// region is `[0, write_cursor)`.
pub fn generate_runs<S, I, C>(
    iter: &mut I,
    scratch: &mut S,
    buffer: &mut [u8],
    config: &SortConfig,
    cmp: &C,
    metrics: &mut Metrics,
) -> Result<(u64, u64), SortError>
where
    S: std::io::Read + Write + Seek,
    I: RecordSource,
    C: RecordComparator,
{
    let record_size = config.record_size();
    let page_size = config.page_size();
    let header_size = config.header_size();
    let tuples_per_page = config.tuples_per_page();
    let max_records = config.buffer_pages() * tuples_per_page;

    let mut num_runs: u64 = 0;
    let mut write_cursor: u64 = 0;

    loop {
        let mut n = 0usize;
        for i in 0..max_records {
            let dest = &mut buffer[i * record_size..(i + 1) * record_size];
            let has_more = iter
                .next(dest)
                .map_err(SortError::ReadFailed)?;
            if !has_more {
                break;
            }
            n = i + 1;
        }

        if n == 0 {
            break;
        }

        let num_pages = (n + tuples_per_page - 1) / tuples_per_page;
        metrics.page_reads += num_pages as u64;

        sort_records(
            &mut buffer[..n * record_size],
            n,
            record_size,
            cmp,
            metrics,
        );

        // Relocate each sorted record from its flat position to its final
        // paged slot, reserving header bytes at the start of every page.
        for k in (0..n).rev() {
            let page_idx = k / tuples_per_page;
            let slot = k % tuples_per_page;
            let flat_offset = k * record_size;
            let final_offset = page_idx * page_size + header_size + slot * record_size;
            buffer.copy_within(flat_offset..flat_offset + record_size, final_offset);
        }

        for page_idx in 0..num_pages {
            let count = if page_idx + 1 == num_pages {
                n - page_idx * tuples_per_page
            } else {
                tuples_per_page
            };
            let page_start = page_idx * page_size;
            page::write_page_header(
                &mut buffer[page_start..page_start + header_size],
                page_idx as u32,
                count as u16,
            );
        }

        let run_bytes = num_pages * page_size;
        scratch
            .seek(SeekFrom::Start(write_cursor))
            .map_err(SortError::WriteFailed)?;
        scratch
            .write_all(&buffer[..run_bytes])
            .map_err(SortError::WriteFailed)?;
        metrics.page_writes += num_pages as u64;

        write_cursor += run_bytes as u64;
        num_runs += 1;
        log::trace!("wrote run {} ({} pages, {} records)", num_runs - 1, num_pages, n);
    }

    log::debug!("generated {} runs, {} bytes", num_runs, write_cursor);
    Ok((num_runs, write_cursor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::FnComparator;
    use crate::iterator::SliceRecordSource;
    use std::io::Cursor;

    fn cfg() -> SortConfig {
        SortConfig::new(512, 16, 6, 3).unwrap()
    }

    fn key_cmp() -> FnComparator<fn(&[u8], &[u8]) -> std::cmp::Ordering> {
        fn compare(a: &[u8], b: &[u8]) -> std::cmp::Ordering {
            let ka = i32::from_le_bytes(a[..4].try_into().unwrap());
            let kb = i32::from_le_bytes(b[..4].try_into().unwrap());
            ka.cmp(&kb)
        }
        FnComparator(compare as fn(&[u8], &[u8]) -> std::cmp::Ordering)
    }

    fn make_record(key: i32, record_size: usize) -> Vec<u8> {
        let mut rec = vec![0u8; record_size];
        rec[..4].copy_from_slice(&key.to_le_bytes());
        rec
    }

    #[test]
    fn empty_iterator_yields_zero_runs() {
        let config = cfg();
        let mut buffer = vec![0u8; config.buffer_len()];
        let mut scratch = Cursor::new(Vec::new());
        let data: [u8; 0] = [];
        let mut src = SliceRecordSource::new(&data, config.record_size());
        let mut metrics = Metrics::new();
        let cmp = key_cmp();

        let (num_runs, end) =
            generate_runs(&mut src, &mut scratch, &mut buffer, &config, &cmp, &mut metrics)
                .unwrap();
        assert_eq!(num_runs, 0);
        assert_eq!(end, 0);
        assert_eq!(metrics.page_reads, 0);
        assert_eq!(metrics.page_writes, 0);
    }

    #[test]
    fn single_page_run_is_sorted_and_framed() {
        let config = cfg();
        let record_size = config.record_size();
        let tuples_per_page = config.tuples_per_page();

        let mut data = Vec::new();
        for key in (1..=tuples_per_page as i32).rev() {
            data.extend(make_record(key, record_size));
        }

        let mut buffer = vec![0u8; config.buffer_len()];
        let mut scratch = Cursor::new(Vec::new());
        let mut src = SliceRecordSource::new(&data, record_size);
        let mut metrics = Metrics::new();
        let cmp = key_cmp();

        let (num_runs, end) =
            generate_runs(&mut src, &mut scratch, &mut buffer, &config, &cmp, &mut metrics)
                .unwrap();

        assert_eq!(num_runs, 1);
        assert_eq!(end, config.page_size() as u64);

        let out = scratch.into_inner();
        assert_eq!(page::read_block_index(&out), 0);
        assert_eq!(page::read_record_count(&out) as usize, tuples_per_page);
        for i in 0..tuples_per_page {
            let rec_start = config.header_size() + i * record_size;
            let key = i32::from_le_bytes(out[rec_start..rec_start + 4].try_into().unwrap());
            assert_eq!(key, i as i32 + 1);
        }
    }

    #[test]
    fn multiple_chunks_produce_multiple_runs() {
        let config = cfg();
        let record_size = config.record_size();
        let tuples_per_page = config.tuples_per_page();
        let max_records = config.buffer_pages() * tuples_per_page;

        // Two full working-buffer's worth of records -> 2 runs.
        let total = max_records * 2;
        let mut data = Vec::new();
        for key in (1..=total as i32).rev() {
            data.extend(make_record(key, record_size));
        }

        let mut buffer = vec![0u8; config.buffer_len()];
        let mut scratch = Cursor::new(Vec::new());
        let mut src = SliceRecordSource::new(&data, record_size);
        let mut metrics = Metrics::new();
        let cmp = key_cmp();

        let (num_runs, _end) =
            generate_runs(&mut src, &mut scratch, &mut buffer, &config, &cmp, &mut metrics)
                .unwrap();
        assert_eq!(num_runs, 2);
    }
}
