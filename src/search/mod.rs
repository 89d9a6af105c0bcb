//! Parallel candidate search.
//!
//! [`Search`] enumerates every candidate of a fixed length over an
//! [`Alphabet`], drops the ones the [`Filter`] rejects or the
//! [`NegativeCache`] already holds, and verifies the rest on a pool of
//! threads until one passes the [`Verifier`].

mod alphabet;
mod cache;
mod candidates;
mod config;
mod coordinator;
mod error;
mod filter;
mod progress;
mod verifier;

pub use alphabet::Alphabet;
pub use cache::{NegativeCache, CACHE_FILE};
pub use candidates::Candidates;
pub use config::{
    Config, DEFAULT_DB_PATH, DEFAULT_LENGTH, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS,
};
pub use coordinator::{Search, SearchReport};
pub use error::{CacheError, ConfigError, SearchError};
pub use filter::{Filter, Rule};
pub use progress::{progress_bar, NoProgress, Progress};
pub use verifier::{FullCheck, Probe, Stage, Verdict, Verifier};
