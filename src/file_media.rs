//! LocalFileMedia - random-access byte source for ZIP reading.

use crate::error::{Result, ZipError};
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Interval for reading a byte range (inclusive on both ends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadInterval {
    pub start: u64,
    pub end: u64,
}

impl ReadInterval {
    /// Interval covering `len` bytes starting at `start`.
    ///
    /// The end saturates at `u64::MAX`; such an interval lies past the end
    /// of any file and `read_range` rejects it.
    pub fn at(start: u64, len: u64) -> Self {
        Self {
            start,
            end: start.saturating_add(len.max(1) - 1),
        }
    }

    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Local file opened for random access.
///
/// Each handle owns its own file descriptor and seek position, so it must not
/// be shared between threads that read concurrently.
#[derive(Debug)]
pub struct LocalFileMedia {
    file: File,
    path: PathBuf,
    length: u64,
}

impl LocalFileMedia {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let length = file.metadata()?.len();
        Ok(Self { file, path, length })
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read an entire interval into a new buffer.
    pub fn read_range(&mut self, interval: ReadInterval) -> Result<Vec<u8>> {
        if interval.end >= self.length {
            return Err(ZipError::InvalidOffset {
                offset: interval.end,
                length: self.length,
            });
        }
        self.file.seek(SeekFrom::Start(interval.start))?;
        let mut buffer = vec![0u8; interval.len() as usize];
        self.file.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Stream `len` bytes starting at `start`.
    ///
    /// I/O failures from the returned reader carry a tunnelled
    /// [`ZipError::Io`] so they are never mistaken for corrupt data.
    pub fn stream(&mut self, start: u64, len: u64) -> Result<RawReader<'_>> {
        if start.checked_add(len).is_none_or(|end| end > self.length) {
            return Err(ZipError::InvalidOffset {
                offset: start.saturating_add(len),
                length: self.length,
            });
        }
        self.file.seek(SeekFrom::Start(start))?;
        Ok(RawReader {
            inner: (&mut self.file).take(len),
        })
    }
}

/// Bounded reader over raw (still encrypted, still compressed) member bytes.
pub struct RawReader<'a> {
    inner: io::Take<&'a mut File>,
}

impl Read for RawReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner
            .read(buf)
            .map_err(|e| ZipError::Io(e).into_io())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_interval_len() {
        let interval = ReadInterval::at(10, 4);
        assert_eq!(interval.start, 10);
        assert_eq!(interval.end, 13);
        assert_eq!(interval.len(), 4);
    }

    #[test]
    fn test_read_range_and_stream() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"0123456789").unwrap();

        let mut media = LocalFileMedia::open(tmp.path()).unwrap();
        assert_eq!(media.length(), 10);
        assert_eq!(media.read_range(ReadInterval::at(2, 3)).unwrap(), b"234");

        let mut out = Vec::new();
        media.stream(6, 4).unwrap().read_to_end(&mut out).unwrap();
        assert_eq!(out, b"6789");
    }

    #[test]
    fn test_out_of_bounds() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"abc").unwrap();

        let mut media = LocalFileMedia::open(tmp.path()).unwrap();
        assert!(matches!(
            media.read_range(ReadInterval::at(2, 5)),
            Err(ZipError::InvalidOffset { .. })
        ));
        assert!(matches!(media.stream(1, 3), Err(ZipError::InvalidOffset { .. })));
    }

    #[test]
    fn test_interval_near_u64_max() {
        let interval = ReadInterval::at(u64::MAX - 10, 56);
        assert_eq!(interval.end, u64::MAX);

        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"abc").unwrap();
        let mut media = LocalFileMedia::open(tmp.path()).unwrap();
        assert!(matches!(
            media.read_range(interval),
            Err(ZipError::InvalidOffset { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            LocalFileMedia::open("/definitely/not/here.zip"),
            Err(ZipError::Io(_))
        ));
    }
}
