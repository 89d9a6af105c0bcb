//! Local file header parser.
//!
//! Each member's data is preceded by a local header. Only its variable-length
//! tail matters here: the name and extra lengths locate the start of the data.

use super::LeReader;
use crate::error::{Result, ZipError};

/// Local file header signature (`PK\x03\x04`).
pub const LOCAL_HEADER_SIGNATURE: u32 = 0x04034b50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalHeader {
    pub version_needed: u16,
    pub flags: u16,
    pub method: u16,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub name_size: u16,
    pub extra_size: u16,
}

impl LocalHeader {
    /// Bytes between the start of this header and the member data.
    pub fn data_offset(&self) -> u64 {
        LocalHeaderParser::HEADER_SIZE as u64 + self.name_size as u64 + self.extra_size as u64
    }
}

pub struct LocalHeaderParser;

impl LocalHeaderParser {
    pub const HEADER_SIZE: usize = 30;

    pub fn parse(buffer: &[u8]) -> Result<LocalHeader> {
        if buffer.len() < Self::HEADER_SIZE {
            return Err(ZipError::BufferTooSmall {
                needed: Self::HEADER_SIZE,
                have: buffer.len(),
            });
        }

        let mut reader = LeReader::new(buffer);
        if reader.read_u32() != Some(LOCAL_HEADER_SIGNATURE) {
            return Err(ZipError::InvalidSignature(LOCAL_HEADER_SIGNATURE));
        }

        Ok(LocalHeader {
            version_needed: reader.read_u16().ok_or(ZipError::InvalidHeader)?,
            flags: reader.read_u16().ok_or(ZipError::InvalidHeader)?,
            method: reader.read_u16().ok_or(ZipError::InvalidHeader)?,
            last_mod_time: reader.read_u16().ok_or(ZipError::InvalidHeader)?,
            last_mod_date: reader.read_u16().ok_or(ZipError::InvalidHeader)?,
            crc32: reader.read_u32().ok_or(ZipError::InvalidHeader)?,
            compressed_size: reader.read_u32().ok_or(ZipError::InvalidHeader)?,
            uncompressed_size: reader.read_u32().ok_or(ZipError::InvalidHeader)?,
            name_size: reader.read_u16().ok_or(ZipError::InvalidHeader)?,
            extra_size: reader.read_u16().ok_or(ZipError::InvalidHeader)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_header() {
        // First 30 bytes of an InfoZip archive holding "one.txt".
        let buffer = [
            0x50, 0x4b, 0x03, 0x04, 0x0a, 0x00, 0x09, 0x00, 0x00, 0x00, 0x83, 0x36, 0x53, 0x5d,
            0x20, 0x30, 0x3a, 0x36, 0x12, 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, 0x07, 0x00,
            0x00, 0x00,
        ];
        let header = LocalHeaderParser::parse(&buffer).unwrap();
        assert_eq!(header.flags, 0x0009);
        assert_eq!(header.method, 0);
        assert_eq!(header.last_mod_time, 0x3683);
        assert_eq!(header.crc32, 0x363a3020);
        assert_eq!(header.compressed_size, 18);
        assert_eq!(header.name_size, 7);
        assert_eq!(header.data_offset(), 37);
    }

    #[test]
    fn test_buffer_too_small() {
        let buffer = [0x50, 0x4b, 0x03];
        assert!(matches!(
            LocalHeaderParser::parse(&buffer),
            Err(ZipError::BufferTooSmall { .. })
        ));
    }

    #[test]
    fn test_invalid_signature() {
        assert!(matches!(
            LocalHeaderParser::parse(&[0u8; 30]),
            Err(ZipError::InvalidSignature(LOCAL_HEADER_SIGNATURE))
        ));
    }
}
