//! MemberReader - streaming plaintext reader for one ZIP member.

use std::io::{self, Read};

use crate::crypto::ZipCryptoReader;
use crate::decompress::{CompressionMethod, MemberDecoder, VerifyingReader};
use crate::error::Result;
use crate::file_media::RawReader;

/// Raw member bytes, decrypted when the member is encrypted.
pub(crate) enum MemberSource<'a> {
    Plain(RawReader<'a>),
    Encrypted(ZipCryptoReader<RawReader<'a>>),
}

impl Read for MemberSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Plain(inner) => inner.read(buf),
            Self::Encrypted(inner) => inner.read(buf),
        }
    }
}

/// Streaming reader over a member's plaintext.
///
/// The last `read` fails if the output does not match the CRC-32 or size
/// recorded in the central directory. Errors surfaced through [`Read`] convert
/// back into [`ZipError`](crate::ZipError) with `From<io::Error>`.
pub struct MemberReader<'a> {
    inner: VerifyingReader<MemberDecoder<MemberSource<'a>>>,
}

impl<'a> MemberReader<'a> {
    pub(crate) fn new(
        source: MemberSource<'a>,
        method: CompressionMethod,
        crc32: u32,
        uncompressed_size: u64,
    ) -> Self {
        Self {
            inner: VerifyingReader::new(MemberDecoder::new(source, method), crc32, uncompressed_size),
        }
    }

    /// Read the member to the end, discarding the output.
    ///
    /// Returns the number of plaintext bytes produced.
    pub fn drain(&mut self) -> Result<u64> {
        Ok(io::copy(self, &mut io::sink())?)
    }
}

impl Read for MemberReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}
