//! Central directory header parser.
//!
//! Every member of a ZIP archive has one central directory header. It is the
//! authoritative source for the member's sizes and CRC-32: when general
//! purpose bit 3 is set the local header carries zeros instead.

use super::LeReader;
use crate::error::{Result, ZipError};

/// Central directory header signature (`PK\x01\x02`).
pub const CENTRAL_HEADER_SIGNATURE: u32 = 0x02014b50;

/// Extra field id of the ZIP64 extended information block.
pub const ZIP64_EXTRA_ID: u16 = 0x0001;

/// General purpose flag: member is encrypted.
pub const FLAG_ENCRYPTED: u16 = 0x0001;
/// General purpose flag: sizes and CRC follow the data in a data descriptor.
pub const FLAG_DATA_DESCRIPTOR: u16 = 0x0008;
/// General purpose flag: PKWARE strong encryption.
pub const FLAG_STRONG_ENCRYPTION: u16 = 0x0040;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CentralHeader {
    pub version_made_by: u16,
    pub version_needed: u16,
    pub flags: u16,
    pub method: u16,
    pub last_mod_time: u16,
    pub last_mod_date: u16,
    pub crc32: u32,
    pub compressed_size: u64,
    pub uncompressed_size: u64,
    pub disk_number_start: u32,
    pub internal_attributes: u16,
    pub external_attributes: u32,
    pub local_header_offset: u64,
    pub name: String,
    // Parsed flags
    pub is_encrypted: bool,
    pub has_data_descriptor: bool,
    pub has_strong_encryption: bool,
}

pub struct CentralHeaderParser;

impl CentralHeaderParser {
    /// Fixed header size before the variable-length fields.
    pub const HEADER_SIZE: usize = 46;

    /// Parse one header. Returns the header and the number of bytes it spans.
    pub fn parse(buffer: &[u8]) -> Result<(CentralHeader, usize)> {
        if buffer.len() < Self::HEADER_SIZE {
            return Err(ZipError::BufferTooSmall {
                needed: Self::HEADER_SIZE,
                have: buffer.len(),
            });
        }

        let mut reader = LeReader::new(buffer);
        if reader.read_u32() != Some(CENTRAL_HEADER_SIGNATURE) {
            return Err(ZipError::InvalidSignature(CENTRAL_HEADER_SIGNATURE));
        }

        let version_made_by = reader.read_u16().ok_or(ZipError::InvalidHeader)?;
        let version_needed = reader.read_u16().ok_or(ZipError::InvalidHeader)?;
        let flags = reader.read_u16().ok_or(ZipError::InvalidHeader)?;
        let method = reader.read_u16().ok_or(ZipError::InvalidHeader)?;
        let last_mod_time = reader.read_u16().ok_or(ZipError::InvalidHeader)?;
        let last_mod_date = reader.read_u16().ok_or(ZipError::InvalidHeader)?;
        let crc32 = reader.read_u32().ok_or(ZipError::InvalidHeader)?;
        let compressed_size = reader.read_u32().ok_or(ZipError::InvalidHeader)?;
        let uncompressed_size = reader.read_u32().ok_or(ZipError::InvalidHeader)?;
        let name_size = reader.read_u16().ok_or(ZipError::InvalidHeader)? as usize;
        let extra_size = reader.read_u16().ok_or(ZipError::InvalidHeader)? as usize;
        let comment_size = reader.read_u16().ok_or(ZipError::InvalidHeader)? as usize;
        let disk_number_start = reader.read_u16().ok_or(ZipError::InvalidHeader)?;
        let internal_attributes = reader.read_u16().ok_or(ZipError::InvalidHeader)?;
        let external_attributes = reader.read_u32().ok_or(ZipError::InvalidHeader)?;
        let local_header_offset = reader.read_u32().ok_or(ZipError::InvalidHeader)?;

        let total = Self::HEADER_SIZE + name_size + extra_size + comment_size;
        if buffer.len() < total {
            return Err(ZipError::BufferTooSmall {
                needed: total,
                have: buffer.len(),
            });
        }

        let name_bytes = reader.read_bytes(name_size).ok_or(ZipError::InvalidHeader)?;
        let name = String::from_utf8_lossy(name_bytes).to_string();
        let extra = reader.read_bytes(extra_size).ok_or(ZipError::InvalidHeader)?;

        let mut header = CentralHeader {
            version_made_by,
            version_needed,
            flags,
            method,
            last_mod_time,
            last_mod_date,
            crc32,
            compressed_size: compressed_size as u64,
            uncompressed_size: uncompressed_size as u64,
            disk_number_start: disk_number_start as u32,
            internal_attributes,
            external_attributes,
            local_header_offset: local_header_offset as u64,
            name,
            is_encrypted: flags & FLAG_ENCRYPTED != 0,
            has_data_descriptor: flags & FLAG_DATA_DESCRIPTOR != 0,
            has_strong_encryption: flags & FLAG_STRONG_ENCRYPTION != 0,
        };
        Self::apply_zip64_extra(&mut header, extra)?;

        Ok((header, total))
    }

    /// Replace 32-bit sentinels with values from the ZIP64 extra block.
    ///
    /// The block only holds the fields whose 32-bit slot is saturated, in the
    /// fixed order: uncompressed size, compressed size, offset, disk.
    fn apply_zip64_extra(header: &mut CentralHeader, extra: &[u8]) -> Result<()> {
        let mut fields = LeReader::new(extra);
        while fields.remaining() >= 4 {
            let id = fields.read_u16().ok_or(ZipError::InvalidHeader)?;
            let size = fields.read_u16().ok_or(ZipError::InvalidHeader)? as usize;
            let data = fields.read_bytes(size).ok_or(ZipError::InvalidHeader)?;
            if id != ZIP64_EXTRA_ID {
                continue;
            }

            let mut block = LeReader::new(data);
            if header.uncompressed_size == 0xFFFFFFFF {
                header.uncompressed_size = block.read_u64().ok_or(ZipError::InvalidHeader)?;
            }
            if header.compressed_size == 0xFFFFFFFF {
                header.compressed_size = block.read_u64().ok_or(ZipError::InvalidHeader)?;
            }
            if header.local_header_offset == 0xFFFFFFFF {
                header.local_header_offset = block.read_u64().ok_or(ZipError::InvalidHeader)?;
            }
            if header.disk_number_start == 0xFFFF {
                header.disk_number_start = block.read_u32().ok_or(ZipError::InvalidHeader)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn central_header(flags: u16, method: u16, name: &[u8], extra: &[u8]) -> Vec<u8> {
        let mut buf = vec![0u8; CentralHeaderParser::HEADER_SIZE];
        buf[0..4].copy_from_slice(&CENTRAL_HEADER_SIGNATURE.to_le_bytes());
        buf[8..10].copy_from_slice(&flags.to_le_bytes());
        buf[10..12].copy_from_slice(&method.to_le_bytes());
        buf[12..14].copy_from_slice(&0x3683u16.to_le_bytes()); // time
        buf[16..20].copy_from_slice(&0x363a3020u32.to_le_bytes()); // crc
        buf[20..24].copy_from_slice(&18u32.to_le_bytes()); // compressed
        buf[24..28].copy_from_slice(&6u32.to_le_bytes()); // uncompressed
        buf[28..30].copy_from_slice(&(name.len() as u16).to_le_bytes());
        buf[30..32].copy_from_slice(&(extra.len() as u16).to_le_bytes());
        buf.extend_from_slice(name);
        buf.extend_from_slice(extra);
        buf
    }

    #[test]
    fn test_parse_central_header() {
        let buf = central_header(0x0009, 0, b"one.txt", &[]);
        let (header, consumed) = CentralHeaderParser::parse(&buf).unwrap();
        assert_eq!(consumed, 46 + 7);
        assert_eq!(header.name, "one.txt");
        assert_eq!(header.method, 0);
        assert_eq!(header.crc32, 0x363a3020);
        assert_eq!(header.compressed_size, 18);
        assert_eq!(header.uncompressed_size, 6);
        assert_eq!(header.last_mod_time, 0x3683);
        assert!(header.is_encrypted);
        assert!(header.has_data_descriptor);
        assert!(!header.has_strong_encryption);
    }

    #[test]
    fn test_zip64_extra_overrides_sentinels() {
        let mut extra = Vec::new();
        extra.extend_from_slice(&0x5455u16.to_le_bytes()); // unrelated timestamp block
        extra.extend_from_slice(&1u16.to_le_bytes());
        extra.push(0);
        extra.extend_from_slice(&ZIP64_EXTRA_ID.to_le_bytes());
        extra.extend_from_slice(&8u16.to_le_bytes());
        extra.extend_from_slice(&0x1_2345_6789u64.to_le_bytes());

        let mut buf = central_header(0, 8, b"big.bin", &extra);
        buf[24..28].copy_from_slice(&0xFFFFFFFFu32.to_le_bytes());

        let (header, _) = CentralHeaderParser::parse(&buf).unwrap();
        assert_eq!(header.uncompressed_size, 0x1_2345_6789);
        assert_eq!(header.compressed_size, 18);
    }

    #[test]
    fn test_truncated_name() {
        let mut buf = central_header(0, 0, b"name", &[]);
        buf.truncate(48);
        assert!(matches!(
            CentralHeaderParser::parse(&buf),
            Err(ZipError::BufferTooSmall { needed: 50, have: 48 })
        ));
    }

    #[test]
    fn test_invalid_signature() {
        let buf = [0u8; 46];
        assert!(matches!(
            CentralHeaderParser::parse(&buf),
            Err(ZipError::InvalidSignature(CENTRAL_HEADER_SIGNATURE))
        ));
    }
}
