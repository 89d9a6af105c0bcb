//! Run configuration.

use std::path::PathBuf;

use super::alphabet::Alphabet;
use super::error::ConfigError;
use super::verifier::FullCheck;

pub const DEFAULT_LENGTH: usize = 1;
pub const DEFAULT_WORKERS: usize = 8;
pub const DEFAULT_DB_PATH: &str = "./zipbrute-data";
/// Bound on queued candidates between the feeder and the workers.
pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;

/// Immutable settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Archive to attack.
    pub input: PathBuf,
    /// Exact candidate length.
    pub length: usize,
    /// Number of worker threads.
    pub workers: usize,
    /// Directory holding the negative cache.
    pub db_path: PathBuf,
    pub alphabet: Alphabet,
    pub queue_capacity: usize,
    pub full_check: FullCheck,
}

impl Config {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            length: DEFAULT_LENGTH,
            workers: DEFAULT_WORKERS,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            alphabet: Alphabet::default(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            full_check: FullCheck::default(),
        }
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_db_path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.db_path = db_path.into();
        self
    }

    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_full_check(mut self, full_check: FullCheck) -> Self {
        self.full_check = full_check;
        self
    }

    /// Check the settings and return the size of the search space.
    pub fn validate(&self) -> Result<u64, ConfigError> {
        if self.input.as_os_str().is_empty() {
            return Err(ConfigError::EmptyInput);
        }
        if self.length == 0 {
            return Err(ConfigError::InvalidLength(0));
        }
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }
        self.alphabet
            .search_space(self.length)
            .ok_or(ConfigError::SearchSpaceOverflow {
                size: self.alphabet.len(),
                length: self.length,
            })
    }
}
