//! ZIP member decompression.
//!
//! ## Compression Methods
//!
//! ZIP identifies the compression method with a 16-bit id:
//!
//! | Value | Name | Support |
//! |-------|------|---------|
//! | `0` | Store | Data is stored as-is |
//! | `8` | Deflate | Inflated with `flate2` |
//! | `99` | AE-x | Encryption marker, rejected |
//! | other | — | Rejected with [`ZipError::UnsupportedCompression`] |
//!
//! ## Architecture
//!
//! ```text
//! Raw member bytes
//!       ↓
//! ┌─────────────────┐
//! │ ZipCryptoReader │ ← Strip 12-byte header, decrypt (encrypted members only)
//! └─────────────────┘
//!       ↓
//! ┌─────────────────┐
//! │ MemberDecoder   │ ← Stored pass-through or raw deflate
//! └─────────────────┘
//!       ↓
//! ┌─────────────────┐
//! │ VerifyingReader │ ← CRC-32 and size check at end of stream
//! └─────────────────┘
//!       ↓
//! Plaintext
//! ```

use std::io::{self, Read};

use flate2::read::DeflateDecoder;

use crate::crc32::Crc32;
use crate::error::ZipError;

/// Compression methods supported by the member reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum CompressionMethod {
    /// Store (no compression)
    Store = 0,
    /// Raw deflate
    Deflate = 8,
}

impl CompressionMethod {
    pub fn from_u16(v: u16) -> Option<Self> {
        match v {
            0 => Some(Self::Store),
            8 => Some(Self::Deflate),
            _ => None,
        }
    }
}

/// Decompressing reader for one member.
pub enum MemberDecoder<R: Read> {
    Stored(R),
    Deflated(DeflateDecoder<R>),
}

impl<R: Read> MemberDecoder<R> {
    pub fn new(inner: R, method: CompressionMethod) -> Self {
        match method {
            CompressionMethod::Store => Self::Stored(inner),
            CompressionMethod::Deflate => Self::Deflated(DeflateDecoder::new(inner)),
        }
    }
}

impl<R: Read> Read for MemberDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Stored(inner) => inner.read(buf),
            Self::Deflated(inner) => inner.read(buf),
        }
    }
}

/// Reader that checks the output length and CRC-32 of a member.
///
/// Producing more bytes than expected fails immediately, so a wrong password
/// that inflates into an endless stream is cut off early.
pub struct VerifyingReader<R> {
    inner: R,
    hasher: Crc32,
    produced: u64,
    expected_crc: u32,
    expected_size: u64,
    verified: bool,
}

impl<R: Read> VerifyingReader<R> {
    pub fn new(inner: R, expected_crc: u32, expected_size: u64) -> Self {
        Self {
            inner,
            hasher: Crc32::new(),
            produced: 0,
            expected_crc,
            expected_size,
            verified: false,
        }
    }

    fn check_end(&mut self) -> Result<(), ZipError> {
        if self.produced != self.expected_size {
            return Err(ZipError::SizeMismatch {
                expected: self.expected_size,
                actual: self.produced,
            });
        }
        let actual = self.hasher.finalize();
        if actual != self.expected_crc {
            return Err(ZipError::ChecksumMismatch {
                expected: self.expected_crc,
                actual,
            });
        }
        Ok(())
    }
}

impl<R: Read> Read for VerifyingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() || self.verified {
            return Ok(0);
        }

        let n = self.inner.read(buf)?;
        if n == 0 {
            self.check_end().map_err(ZipError::into_io)?;
            self.verified = true;
            return Ok(0);
        }

        self.produced += n as u64;
        if self.produced > self.expected_size {
            return Err(ZipError::SizeMismatch {
                expected: self.expected_size,
                actual: self.produced,
            }
            .into_io());
        }
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}
