//! ZipArchive - random-access handle over a single-disk ZIP file.

use std::path::Path;

use crate::crypto::{EncryptionMethod, ZipCryptoReader, ENCRYPTION_HEADER_SIZE};
use crate::decompress::CompressionMethod;
use crate::error::{Result, ZipError};
use crate::file_media::{LocalFileMedia, ReadInterval};
use crate::member_reader::{MemberReader, MemberSource};
use crate::parsing::{
    end_header::MAX_COMMENT_SIZE, CentralHeader, CentralHeaderParser, EndHeaderParser,
    LocalHeaderParser, Zip64EndHeaderParser, Zip64LocatorParser,
};

/// One entry of the central directory, plus the password bound to it.
#[derive(Debug, Clone)]
pub struct Member {
    header: CentralHeader,
    password: Option<Vec<u8>>,
    /// Absolute offset of the member data, resolved on first open.
    data_offset: Option<u64>,
}

impl Member {
    fn new(header: CentralHeader) -> Self {
        Self {
            header,
            password: None,
            data_offset: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.header.name
    }

    pub fn is_encrypted(&self) -> bool {
        self.header.is_encrypted
    }

    pub fn header(&self) -> &CentralHeader {
        &self.header
    }

    pub fn compressed_size(&self) -> u64 {
        self.header.compressed_size
    }

    pub fn uncompressed_size(&self) -> u64 {
        self.header.uncompressed_size
    }

    pub fn encryption(&self) -> EncryptionMethod {
        EncryptionMethod::detect(&self.header)
    }

    /// Compression method, or an error if this reader cannot decode it.
    pub fn compression(&self) -> Result<CompressionMethod> {
        if !self.encryption().is_supported() {
            return Err(ZipError::UnsupportedEncryption);
        }
        CompressionMethod::from_u16(self.header.method)
            .ok_or(ZipError::UnsupportedCompression(self.header.method))
    }

    /// Expected last byte of the decrypted encryption header.
    pub fn check_byte(&self) -> u8 {
        if self.header.has_data_descriptor {
            (self.header.last_mod_time >> 8) as u8
        } else {
            (self.header.crc32 >> 24) as u8
        }
    }
}

/// Read-only ZIP archive.
///
/// The handle owns its file descriptor. Streaming a member moves the shared
/// seek position, so one handle serves one reader at a time.
#[derive(Debug)]
pub struct ZipArchive {
    media: LocalFileMedia,
    members: Vec<Member>,
}

/// Location of the central directory.
struct Directory {
    entries: u64,
    offset: u64,
    size: u64,
}

impl ZipArchive {
    /// Open a file and parse its central directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut media = LocalFileMedia::open(path)?;
        let directory = Self::locate_directory(&mut media)?;
        let members = Self::read_directory(&mut media, &directory)?;
        Ok(Self { media, members })
    }

    fn locate_directory(media: &mut LocalFileMedia) -> Result<Directory> {
        let length = media.length();
        let end_size = EndHeaderParser::HEADER_SIZE as u64;
        if length < end_size {
            return Err(ZipError::EndOfCentralDirectoryNotFound);
        }

        let tail_len = length.min(end_size + MAX_COMMENT_SIZE as u64);
        let tail_start = length - tail_len;
        let tail = media.read_range(ReadInterval::at(tail_start, tail_len))?;
        let pos = EndHeaderParser::find(&tail)?;
        let end = EndHeaderParser::parse(&tail[pos..])?;
        let end_offset = tail_start + pos as u64;

        let locator_size = Zip64LocatorParser::HEADER_SIZE as u64;
        let locator = if end_offset >= locator_size {
            let buf = media.read_range(ReadInterval::at(end_offset - locator_size, locator_size))?;
            Zip64LocatorParser::parse(&buf)?
        } else {
            None
        };

        let directory = match locator {
            Some(locator) => {
                if locator.end_header_disk != 0 || locator.total_disks > 1 {
                    return Err(ZipError::InvalidHeader);
                }
                // The ZIP64 record must sit wholly before the locator.
                let end64_size = Zip64EndHeaderParser::HEADER_SIZE as u64;
                if locator
                    .end_header_offset
                    .checked_add(end64_size)
                    .is_none_or(|end64_end| end64_end > end_offset - locator_size)
                {
                    return Err(ZipError::InvalidOffset {
                        offset: locator.end_header_offset,
                        length,
                    });
                }
                let buf = media.read_range(ReadInterval::at(locator.end_header_offset, end64_size))?;
                let end64 = Zip64EndHeaderParser::parse(&buf)?;
                if end64.disk_number != 0 || end64.central_directory_disk != 0 {
                    return Err(ZipError::InvalidHeader);
                }
                Directory {
                    entries: end64.total_entries,
                    offset: end64.central_directory_offset,
                    size: end64.central_directory_size,
                }
            }
            None if end.needs_zip64() => return Err(ZipError::InvalidHeader),
            None => {
                if end.disk_number != 0
                    || end.central_directory_disk != 0
                    || end.entries_on_disk != end.total_entries
                {
                    return Err(ZipError::InvalidHeader);
                }
                Directory {
                    entries: end.total_entries as u64,
                    offset: end.central_directory_offset as u64,
                    size: end.central_directory_size as u64,
                }
            }
        };

        if directory
            .offset
            .checked_add(directory.size)
            .is_none_or(|dir_end| dir_end > end_offset)
        {
            return Err(ZipError::InvalidOffset {
                offset: directory.offset,
                length,
            });
        }
        Ok(directory)
    }

    fn read_directory(media: &mut LocalFileMedia, directory: &Directory) -> Result<Vec<Member>> {
        if directory.entries == 0 {
            return Ok(Vec::new());
        }
        // Every entry takes at least the fixed header.
        if directory.size < directory.entries.saturating_mul(CentralHeaderParser::HEADER_SIZE as u64) {
            return Err(ZipError::InvalidHeader);
        }

        let buffer = media.read_range(ReadInterval::at(directory.offset, directory.size))?;
        let mut members = Vec::new();
        let mut pos = 0usize;
        for _ in 0..directory.entries {
            let (header, consumed) = CentralHeaderParser::parse(&buffer[pos..])?;
            pos += consumed;
            Self::validate_entry(&header, directory.offset)?;
            members.push(Member::new(header));
        }
        Ok(members)
    }

    fn validate_entry(header: &CentralHeader, directory_offset: u64) -> Result<()> {
        if header.disk_number_start != 0 {
            return Err(ZipError::InvalidHeader);
        }
        let local_end = header
            .local_header_offset
            .checked_add(LocalHeaderParser::HEADER_SIZE as u64)
            .ok_or(ZipError::InvalidHeader)?;
        if local_end > directory_offset {
            return Err(ZipError::InvalidOffset {
                offset: header.local_header_offset,
                length: directory_offset,
            });
        }
        if EncryptionMethod::detect(header) == EncryptionMethod::ZipCrypto
            && header.compressed_size < ENCRYPTION_HEADER_SIZE as u64
        {
            return Err(ZipError::InvalidHeader);
        }
        Ok(())
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn path(&self) -> &Path {
        self.media.path()
    }

    /// Bind a candidate password to one member.
    pub fn set_password(&mut self, index: usize, password: &[u8]) -> Result<()> {
        let member = self
            .members
            .get_mut(index)
            .ok_or(ZipError::NoSuchMember(index))?;
        match &mut member.password {
            Some(existing) => {
                existing.clear();
                existing.extend_from_slice(password);
            }
            slot => *slot = Some(password.to_vec()),
        }
        Ok(())
    }

    /// Open a streaming plaintext reader on one member.
    ///
    /// For encrypted members the encryption header is checked here, so a
    /// wrong password usually fails before any data is read.
    pub fn open_member(&mut self, index: usize) -> Result<MemberReader<'_>> {
        let member = self.members.get(index).ok_or(ZipError::NoSuchMember(index))?;
        let method = member.compression()?;
        if member.is_encrypted() && member.password.is_none() {
            return Err(ZipError::PasswordRequired);
        }

        let data_offset = self.data_offset(index)?;
        let member = &self.members[index];
        let header = &member.header;
        let raw = self.media.stream(data_offset, header.compressed_size)?;

        let source = match member.password.as_deref() {
            Some(password) if member.is_encrypted() => MemberSource::Encrypted(
                ZipCryptoReader::new(raw, password, member.check_byte())?,
            ),
            _ => MemberSource::Plain(raw),
        };
        Ok(MemberReader::new(
            source,
            method,
            header.crc32,
            header.uncompressed_size,
        ))
    }

    /// Resolve the data offset from the member's local header.
    fn data_offset(&mut self, index: usize) -> Result<u64> {
        let member = &mut self.members[index];
        if let Some(offset) = member.data_offset {
            return Ok(offset);
        }

        let local_offset = member.header.local_header_offset;
        let buf = self.media.read_range(ReadInterval::at(
            local_offset,
            LocalHeaderParser::HEADER_SIZE as u64,
        ))?;
        let local = LocalHeaderParser::parse(&buf)?;
        let offset = local_offset + local.data_offset();
        member.data_offset = Some(offset);
        Ok(offset)
    }
}
