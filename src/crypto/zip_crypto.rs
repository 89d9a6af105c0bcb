//! Classic PKWARE ("ZipCrypto") stream cipher.
//!
//! ZipCrypto uses:
//! - Three 32-bit keys seeded with fixed constants and the password bytes
//! - The CRC-32 table step for key0/key2 updates
//! - A 12-byte encryption header whose last byte is a password check
//! - No authentication (wrong password produces garbage after the header)

use std::io::{self, Read};

use crate::crc32::crc32_update;
use crate::error::{Result, ZipError};

/// Size of the encryption header in bytes.
pub const ENCRYPTION_HEADER_SIZE: usize = 12;

const INITIAL_KEYS: [u32; 3] = [0x12345678, 0x23456789, 0x34567890];

/// ZipCrypto key state.
#[derive(Debug, Clone)]
pub struct ZipCrypto {
    keys: [u32; 3],
}

impl ZipCrypto {
    /// Initialize the keys from a password.
    pub fn new(password: &[u8]) -> Self {
        let mut cipher = Self { keys: INITIAL_KEYS };
        for &byte in password {
            cipher.update_keys(byte);
        }
        cipher
    }

    #[inline]
    fn update_keys(&mut self, byte: u8) {
        let [k0, k1, k2] = &mut self.keys;
        *k0 = crc32_update(*k0, byte);
        *k1 = k1
            .wrapping_add(*k0 & 0xFF)
            .wrapping_mul(134775813)
            .wrapping_add(1);
        *k2 = crc32_update(*k2, (*k1 >> 24) as u8);
    }

    #[inline]
    fn stream_byte(&self) -> u8 {
        let temp = (self.keys[2] | 2) as u16;
        (temp.wrapping_mul(temp ^ 1) >> 8) as u8
    }

    #[inline]
    pub fn decrypt_byte(&mut self, byte: u8) -> u8 {
        let plain = byte ^ self.stream_byte();
        self.update_keys(plain);
        plain
    }

    #[cfg(test)]
    fn encrypt_byte(&mut self, byte: u8) -> u8 {
        let cipher = byte ^ self.stream_byte();
        self.update_keys(byte);
        cipher
    }

    /// Decrypt data in place.
    pub fn decrypt(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            *byte = self.decrypt_byte(*byte);
        }
    }

    /// Encrypt data in place. Builds test ciphertext.
    #[cfg(test)]
    pub(crate) fn encrypt(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            *byte = self.encrypt_byte(*byte);
        }
    }

    /// Decrypt the 12-byte header and compare its last byte with `check`.
    ///
    /// `check` is the high byte of the member CRC-32, or of the DOS
    /// modification time when the member uses a data descriptor.
    pub fn verify_header(&mut self, header: &mut [u8; ENCRYPTION_HEADER_SIZE], check: u8) -> Result<()> {
        self.decrypt(header);
        if header[ENCRYPTION_HEADER_SIZE - 1] != check {
            return Err(ZipError::WrongPassword);
        }
        Ok(())
    }
}

/// Reader that strips and checks the encryption header, then decrypts.
pub struct ZipCryptoReader<R> {
    inner: R,
    cipher: ZipCrypto,
}

impl<R: Read> ZipCryptoReader<R> {
    /// Consume the encryption header from `inner`.
    ///
    /// Fails with [`ZipError::WrongPassword`] when the check byte does not
    /// match; roughly one wrong password in 256 gets past this point.
    pub fn new(mut inner: R, password: &[u8], check: u8) -> Result<Self> {
        let mut header = [0u8; ENCRYPTION_HEADER_SIZE];
        inner.read_exact(&mut header).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => ZipError::InvalidHeader,
            _ => ZipError::from(e),
        })?;

        let mut cipher = ZipCrypto::new(password);
        cipher.verify_header(&mut header, check)?;
        Ok(Self { inner, cipher })
    }
}

impl<R: Read> Read for ZipCryptoReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.cipher.decrypt(&mut buf[..n]);
        Ok(n)
    }
}
