#![no_main]
use std::io::{self, Read};

use libfuzzer_sys::fuzz_target;
use zipbrute::crypto::ZipCryptoReader;
use zipbrute::decompress::{CompressionMethod, MemberDecoder, VerifyingReader};

// Layout: [flags][check][crc32 x4][size x2][payload...]
fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }
    let method = if data[0] & 1 == 0 {
        CompressionMethod::Store
    } else {
        CompressionMethod::Deflate
    };
    let crc = u32::from_le_bytes([data[2], data[3], data[4], data[5]]);
    // Cap the declared size to keep runs short.
    let size = u16::from_le_bytes([data[6], data[7]]) as u64;
    let payload = &data[8..];

    if data[0] & 2 == 0 {
        let reader = VerifyingReader::new(MemberDecoder::new(payload, method), crc, size);
        let _ = io::copy(&mut reader.take(1 << 20), &mut io::sink());
    } else if let Ok(decrypted) = ZipCryptoReader::new(payload, b"AB", data[1]) {
        let reader = VerifyingReader::new(MemberDecoder::new(decrypted, method), crc, size);
        let _ = io::copy(&mut reader.take(1 << 20), &mut io::sink());
    }
});
