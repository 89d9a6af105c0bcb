//! Errors raised by the search engine.

use std::io;
use std::path::PathBuf;

use crate::error::ZipError;

/// Invalid run configuration, detected before any work starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("input file is empty")]
    EmptyInput,

    #[error("length must be a positive integer (got {0})")]
    InvalidLength(i64),

    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("queue capacity must be at least 1")]
    ZeroQueueCapacity,

    #[error("search space {size}^{length} does not fit in 64 bits")]
    SearchSpaceOverflow { size: usize, length: usize },

    #[error("alphabet needs at least 2 characters (got {0})")]
    AlphabetTooSmall(usize),

    #[error("alphabet character {0:?} is not ASCII")]
    NonAsciiAlphabet(char),

    #[error("alphabet character {0:?} appears twice")]
    DuplicateAlphabetChar(char),
}

/// Failure of the persistent negative cache. Always run-fatal.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cannot create cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cache database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("cache transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("cache table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("cache storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("cache commit error: {0}")]
    Commit(#[from] redb::CommitError),
}

/// Run-fatal search error.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{}: {source}", .path.display())]
    Archive {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("{}: archive has no members", .0.display())]
    NoMembers(PathBuf),

    #[error("{}: archive has no encrypted members", .0.display())]
    NotEncrypted(PathBuf),

    #[error("cannot spawn worker thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("worker thread panicked")]
    WorkerPanicked,
}

impl SearchError {
    /// Whether the run was rejected before any work started.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
