//! Cryptographic support for encrypted ZIP members.
//!
//! Only the classic PKWARE stream cipher ("ZipCrypto") is implemented.
//! Strong encryption and WinZip AE-x are detected so callers can reject them.

mod zip_crypto;

pub use zip_crypto::{ZipCrypto, ZipCryptoReader, ENCRYPTION_HEADER_SIZE};

use crate::parsing::CentralHeader;

/// Compression method id used by WinZip AE-x members.
pub const AES_METHOD: u16 = 99;

/// Encryption method used by a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionMethod {
    /// Not encrypted
    None,
    /// Classic PKWARE encryption (12-byte header, CRC-32 based keys)
    ZipCrypto,
    /// PKWARE strong encryption (general purpose bit 6)
    Strong,
    /// WinZip AE-1 / AE-2 (method 99)
    WinZipAes,
}

impl EncryptionMethod {
    pub fn detect(header: &CentralHeader) -> Self {
        if !header.is_encrypted {
            Self::None
        } else if header.method == AES_METHOD {
            Self::WinZipAes
        } else if header.has_strong_encryption {
            Self::Strong
        } else {
            Self::ZipCrypto
        }
    }

    /// Whether the member can be decrypted by this crate.
    pub fn is_supported(self) -> bool {
        matches!(self, Self::None | Self::ZipCrypto)
    }
}
