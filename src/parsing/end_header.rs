//! End of central directory parsers.
//!
//! The end of central directory (EOCD) record sits at the very end of a ZIP
//! file, optionally followed by a comment of up to 65535 bytes. Archives with
//! more than 65535 members or offsets past 4 GiB also carry a ZIP64 EOCD
//! record and a locator that points at it.

use super::LeReader;
use crate::error::{Result, ZipError};

/// EOCD signature (`PK\x05\x06`).
pub const END_HEADER_SIGNATURE: u32 = 0x06054b50;
/// ZIP64 EOCD locator signature (`PK\x06\x07`).
pub const ZIP64_LOCATOR_SIGNATURE: u32 = 0x07064b50;
/// ZIP64 EOCD record signature (`PK\x06\x06`).
pub const ZIP64_END_HEADER_SIGNATURE: u32 = 0x06064b50;

/// Largest possible comment after the EOCD record.
pub const MAX_COMMENT_SIZE: usize = 0xFFFF;

/// Parsed end of central directory record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndHeader {
    pub disk_number: u16,
    pub central_directory_disk: u16,
    pub entries_on_disk: u16,
    pub total_entries: u16,
    pub central_directory_size: u32,
    pub central_directory_offset: u32,
    pub comment_size: u16,
}

impl EndHeader {
    /// Whether any field holds a ZIP64 sentinel.
    pub fn needs_zip64(&self) -> bool {
        self.total_entries == 0xFFFF
            || self.entries_on_disk == 0xFFFF
            || self.central_directory_size == 0xFFFFFFFF
            || self.central_directory_offset == 0xFFFFFFFF
    }
}

pub struct EndHeaderParser;

impl EndHeaderParser {
    pub const HEADER_SIZE: usize = 22;

    pub fn parse(buffer: &[u8]) -> Result<EndHeader> {
        if buffer.len() < Self::HEADER_SIZE {
            return Err(ZipError::BufferTooSmall {
                needed: Self::HEADER_SIZE,
                have: buffer.len(),
            });
        }

        let mut reader = LeReader::new(buffer);
        if reader.read_u32() != Some(END_HEADER_SIGNATURE) {
            return Err(ZipError::InvalidSignature(END_HEADER_SIGNATURE));
        }

        Ok(EndHeader {
            disk_number: reader.read_u16().ok_or(ZipError::InvalidHeader)?,
            central_directory_disk: reader.read_u16().ok_or(ZipError::InvalidHeader)?,
            entries_on_disk: reader.read_u16().ok_or(ZipError::InvalidHeader)?,
            total_entries: reader.read_u16().ok_or(ZipError::InvalidHeader)?,
            central_directory_size: reader.read_u32().ok_or(ZipError::InvalidHeader)?,
            central_directory_offset: reader.read_u32().ok_or(ZipError::InvalidHeader)?,
            comment_size: reader.read_u16().ok_or(ZipError::InvalidHeader)?,
        })
    }

    /// Find the EOCD record in the tail of a file.
    ///
    /// `tail` holds the last bytes of the file. Returns the position of the
    /// record within `tail`. The search runs backwards so a comment that
    /// happens to contain the signature does not shadow the real record.
    ///
    /// A record whose comment ends exactly at end of file wins. Failing that,
    /// the last record whose comment fits is taken, which tolerates bytes
    /// appended after the archive.
    pub fn find(tail: &[u8]) -> Result<usize> {
        if tail.len() < Self::HEADER_SIZE {
            return Err(ZipError::EndOfCentralDirectoryNotFound);
        }

        let signature = END_HEADER_SIGNATURE.to_le_bytes();
        let last = tail.len() - Self::HEADER_SIZE;
        let record_end = |pos: usize| {
            let comment_size = u16::from_le_bytes([tail[pos + 20], tail[pos + 21]]) as usize;
            pos + Self::HEADER_SIZE + comment_size
        };
        let positions: Vec<usize> = (0..=last)
            .rev()
            .filter(|&pos| tail[pos..pos + 4] == signature)
            .collect();

        positions
            .iter()
            .find(|&&pos| record_end(pos) == tail.len())
            .or_else(|| positions.iter().find(|&&pos| record_end(pos) <= tail.len()))
            .copied()
            .ok_or(ZipError::EndOfCentralDirectoryNotFound)
    }
}

/// Parsed ZIP64 end of central directory locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zip64Locator {
    pub end_header_disk: u32,
    pub end_header_offset: u64,
    pub total_disks: u32,
}

pub struct Zip64LocatorParser;

impl Zip64LocatorParser {
    pub const HEADER_SIZE: usize = 20;

    /// Returns `Ok(None)` when the buffer holds no locator.
    pub fn parse(buffer: &[u8]) -> Result<Option<Zip64Locator>> {
        if buffer.len() < Self::HEADER_SIZE {
            return Err(ZipError::BufferTooSmall {
                needed: Self::HEADER_SIZE,
                have: buffer.len(),
            });
        }

        let mut reader = LeReader::new(buffer);
        if reader.read_u32() != Some(ZIP64_LOCATOR_SIGNATURE) {
            return Ok(None);
        }

        Ok(Some(Zip64Locator {
            end_header_disk: reader.read_u32().ok_or(ZipError::InvalidHeader)?,
            end_header_offset: reader.read_u64().ok_or(ZipError::InvalidHeader)?,
            total_disks: reader.read_u32().ok_or(ZipError::InvalidHeader)?,
        }))
    }
}

/// Parsed ZIP64 end of central directory record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zip64EndHeader {
    pub disk_number: u32,
    pub central_directory_disk: u32,
    pub entries_on_disk: u64,
    pub total_entries: u64,
    pub central_directory_size: u64,
    pub central_directory_offset: u64,
}

pub struct Zip64EndHeaderParser;

impl Zip64EndHeaderParser {
    pub const HEADER_SIZE: usize = 56;

    pub fn parse(buffer: &[u8]) -> Result<Zip64EndHeader> {
        if buffer.len() < Self::HEADER_SIZE {
            return Err(ZipError::BufferTooSmall {
                needed: Self::HEADER_SIZE,
                have: buffer.len(),
            });
        }

        let mut reader = LeReader::new(buffer);
        if reader.read_u32() != Some(ZIP64_END_HEADER_SIGNATURE) {
            return Err(ZipError::InvalidSignature(ZIP64_END_HEADER_SIGNATURE));
        }
        // record size (8), version made by (2), version needed (2)
        reader.skip(12).ok_or(ZipError::InvalidHeader)?;

        Ok(Zip64EndHeader {
            disk_number: reader.read_u32().ok_or(ZipError::InvalidHeader)?,
            central_directory_disk: reader.read_u32().ok_or(ZipError::InvalidHeader)?,
            entries_on_disk: reader.read_u64().ok_or(ZipError::InvalidHeader)?,
            total_entries: reader.read_u64().ok_or(ZipError::InvalidHeader)?,
            central_directory_size: reader.read_u64().ok_or(ZipError::InvalidHeader)?,
            central_directory_offset: reader.read_u64().ok_or(ZipError::InvalidHeader)?,
        })
    }
}
