//! A disk-backed scratch file.
//!
//! The engine itself is generic over any `Read + Write + Seek`, so
//! `ScratchFile` is a convenience, not a requirement: a `File` opened the
//! ordinary way, or a `Cursor<Vec<u8>>` for an in-memory sort, works
//! equally well as the `scratch` argument to [`crate::engine::external_merge_sort`].
//!
//! The reference engine's test harness opens its scratch file with
//! `O_DIRECT`, and the teacher's `PagedFile` does too — but both pair it
//! with an aligned, fixed-size buffer type on every read/write
//! (`aligned::Buffer`, `#[repr(align(4096))]`). This engine's working
//! buffer is a plain caller-owned `&mut [u8]` of a caller-chosen
//! `page_size`, with no alignment guarantee, so opening with `O_DIRECT`
//! here would fail on the first `read`/`write` on any filesystem that
//! actually enforces it. `ScratchFile` only opens the ordinary,
//! page-cache-backed way until the working buffer itself carries an
//! alignment guarantee sized to `config.page_size()`.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// A scratch file backed by ordinary buffered file I/O, truncated fresh
/// on open.
#[derive(Debug)]
pub struct ScratchFile {
    file: File,
}

impl ScratchFile {
    /// Opens `path`, creating it if needed and truncating any existing
    /// contents: a scratch file never carries over state from a
    /// previous sort.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<ScratchFile> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(ScratchFile { file })
    }
}

impl Read for ScratchFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for ScratchFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Seek for ScratchFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read as _, Seek as _, Write as _};

    #[test]
    fn scratch_file_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scratch.dat");

        let mut scratch = ScratchFile::create(&path).unwrap();
        scratch.write_all(b"hello scratch").unwrap();
        scratch.seek(SeekFrom::Start(0)).unwrap();

        let mut buf = [0u8; 13];
        scratch.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"hello scratch");
    }

    #[test]
    fn create_truncates_existing_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scratch.dat");

        {
            let mut scratch = ScratchFile::create(&path).unwrap();
            scratch.write_all(b"stale data from a prior sort").unwrap();
        }
        let mut scratch = ScratchFile::create(&path).unwrap();
        let mut buf = Vec::new();
        scratch.read_to_end(&mut buf).unwrap();
        assert!(buf.is_empty());
    }
}
