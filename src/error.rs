//! Error types for ZIP parsing, decryption and decompression.
//!
//! This module provides the [`ZipError`] type which covers everything that can
//! go wrong while opening a ZIP archive or streaming one of its members.
//!
//! ## Error Categories
//!
//! | Category | Errors | Description |
//! |----------|--------|-------------|
//! | Format | [`InvalidSignature`], [`InvalidHeader`], [`EndOfCentralDirectoryNotFound`] | File is not a usable ZIP archive |
//! | Password | [`WrongPassword`], [`ChecksumMismatch`], [`SizeMismatch`], [`DecompressionFailed`] | The bound password does not decrypt the member |
//! | Support | [`UnsupportedCompression`], [`UnsupportedEncryption`] | Member uses a method this reader does not implement |
//! | I/O | [`Io`], [`BufferTooSmall`], [`InvalidOffset`] | Read errors and truncated data |
//!
//! Only the password category is candidate-dependent; see
//! [`ZipError::is_password_failure`].
//!
//! [`InvalidSignature`]: ZipError::InvalidSignature
//! [`InvalidHeader`]: ZipError::InvalidHeader
//! [`EndOfCentralDirectoryNotFound`]: ZipError::EndOfCentralDirectoryNotFound
//! [`WrongPassword`]: ZipError::WrongPassword
//! [`ChecksumMismatch`]: ZipError::ChecksumMismatch
//! [`SizeMismatch`]: ZipError::SizeMismatch
//! [`DecompressionFailed`]: ZipError::DecompressionFailed
//! [`UnsupportedCompression`]: ZipError::UnsupportedCompression
//! [`UnsupportedEncryption`]: ZipError::UnsupportedEncryption
//! [`Io`]: ZipError::Io
//! [`BufferTooSmall`]: ZipError::BufferTooSmall
//! [`InvalidOffset`]: ZipError::InvalidOffset

use std::fmt;
use std::io;

/// Error type for ZIP operations.
///
/// # Example
///
/// ```rust,ignore
/// use zipbrute::{ZipArchive, ZipError};
///
/// match archive.open_member(0) {
///     Ok(reader) => { /* drain it */ }
///     Err(err) if err.is_password_failure() => { /* try the next candidate */ }
///     Err(err) => return Err(err),
/// }
/// ```
#[derive(Debug)]
pub enum ZipError {
    /// A record does not start with the expected `PK` signature.
    ///
    /// The `u32` is the signature that was expected:
    /// - `0x04034b50`: local file header
    /// - `0x02014b50`: central directory header
    /// - `0x06054b50`: end of central directory
    /// - `0x06064b50`: ZIP64 end of central directory
    InvalidSignature(u32),

    /// A header in the archive is malformed, inconsistent or describes a
    /// layout this reader does not handle (multi-disk archives).
    InvalidHeader,

    /// No end of central directory record was found near the end of the file.
    ///
    /// The file is either not a ZIP archive or is truncated.
    EndOfCentralDirectoryNotFound,

    /// The member's compression method is not supported.
    ///
    /// Only `0` (stored) and `8` (deflate) are implemented.
    UnsupportedCompression(u16),

    /// The member uses strong encryption or WinZip AE-x encryption.
    UnsupportedEncryption,

    /// The member is encrypted but no password has been bound to it.
    PasswordRequired,

    /// The decrypted 12-byte encryption header failed its check byte.
    WrongPassword,

    /// The decompressed data does not match the stored CRC-32.
    ChecksumMismatch {
        /// CRC-32 recorded in the central directory.
        expected: u32,
        /// CRC-32 of the bytes actually produced.
        actual: u32,
    },

    /// The decompressed data does not have the stored length.
    SizeMismatch {
        /// Uncompressed size recorded in the central directory.
        expected: u64,
        /// Number of bytes produced (so far).
        actual: u64,
    },

    /// The deflate stream is corrupt.
    DecompressionFailed(String),

    /// The provided buffer is too small.
    BufferTooSmall {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        have: usize,
    },

    /// A record points outside the file.
    InvalidOffset {
        /// The requested offset.
        offset: u64,
        /// The actual file length.
        length: u64,
    },

    /// No member exists at this index.
    NoSuchMember(usize),

    /// An I/O error occurred.
    Io(io::Error),
}

impl ZipError {
    /// Whether this error means "the bound password is wrong".
    ///
    /// These are the only errors that depend on the candidate password. All
    /// other errors would repeat for every candidate and are reported as
    /// codec errors instead.
    pub fn is_password_failure(&self) -> bool {
        matches!(
            self,
            Self::WrongPassword
                | Self::ChecksumMismatch { .. }
                | Self::SizeMismatch { .. }
                | Self::DecompressionFailed(_)
        )
    }

    /// Wrap this error so it can travel through [`std::io::Read`].
    ///
    /// [`From<io::Error>`] recovers the original value on the other side.
    pub(crate) fn into_io(self) -> io::Error {
        let kind = match &self {
            Self::Io(e) => e.kind(),
            _ => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, self)
    }
}

impl fmt::Display for ZipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSignature(sig) => write!(f, "Invalid record signature (expected 0x{:08x})", sig),
            Self::InvalidHeader => write!(f, "Invalid or malformed header"),
            Self::EndOfCentralDirectoryNotFound => {
                write!(f, "End of central directory record not found")
            }
            Self::UnsupportedCompression(m) => {
                write!(f, "Compression method not supported (method: {})", m)
            }
            Self::UnsupportedEncryption => {
                write!(f, "Strong or AE-x encryption is not supported")
            }
            Self::PasswordRequired => write!(f, "Password required for encrypted member"),
            Self::WrongPassword => write!(f, "Wrong password"),
            Self::ChecksumMismatch { expected, actual } => write!(
                f,
                "CRC-32 mismatch: expected 0x{:08x}, got 0x{:08x}",
                expected, actual
            ),
            Self::SizeMismatch { expected, actual } => write!(
                f,
                "Size mismatch: expected {} bytes, got {}",
                expected, actual
            ),
            Self::DecompressionFailed(msg) => write!(f, "Decompression failed: {}", msg),
            Self::BufferTooSmall { needed, have } => {
                write!(f, "Buffer too small: need {} bytes, have {}", needed, have)
            }
            Self::InvalidOffset { offset, length } => {
                write!(f, "Invalid offset: {} (file length: {})", offset, length)
            }
            Self::NoSuchMember(index) => write!(f, "No member at index {}", index),
            Self::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ZipError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ZipError {
    fn from(e: io::Error) -> Self {
        let tunnelled = e.get_ref().is_some_and(|inner| inner.is::<ZipError>());
        if !tunnelled {
            // Errors raised by the inflate layer itself.
            return match e.kind() {
                io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData => {
                    Self::DecompressionFailed(e.to_string())
                }
                _ => Self::Io(e),
            };
        }

        match e.into_inner().map(|inner| inner.downcast::<ZipError>()) {
            Some(Ok(zip)) => *zip,
            Some(Err(other)) => Self::DecompressionFailed(other.to_string()),
            None => Self::InvalidHeader,
        }
    }
}

pub type Result<T> = std::result::Result<T, ZipError>;
