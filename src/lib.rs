//! Resumable brute-force password recovery for classic-encrypted ZIP archives.
//!
//! The crate has two halves:
//!
//! - A small read-only ZIP reader ([`ZipArchive`]) that streams members
//!   through ZipCrypto decryption, inflate and CRC-32 verification.
//! - The [`search`] engine: candidate enumeration, the leading-digit filter,
//!   a persistent negative cache, two-stage verification and the worker pool.
//!
//! ## Features
//! - `cli` (default) - the `zipbrute` binary
//! - `lowercase` - append `a`-`z` to the default alphabet

mod crc32;
pub mod crypto;
pub mod decompress;
pub mod error;
mod file_media;
mod member_reader;
pub mod parsing;
pub mod search;
mod zip_archive;

pub use error::ZipError;
pub use file_media::{LocalFileMedia, ReadInterval};
pub use member_reader::MemberReader;
pub use zip_archive::{Member, ZipArchive};

pub use decompress::CompressionMethod;
pub use search::{
    Alphabet, Candidates, Config, Filter, FullCheck, NegativeCache, NoProgress, Progress, Search,
    SearchError, SearchReport, Verdict, Verifier,
};
