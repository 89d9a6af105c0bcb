//! Persistent set of candidates known not to be the password.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use redb::{Database, Durability, ReadableTableMetadata, TableDefinition};
use tracing::debug;

use super::error::CacheError;

/// File name of the store inside the cache directory.
pub const CACHE_FILE: &str = "candidates.redb";

/// Candidate bytes mapped to an empty value.
const FAILED: TableDefinition<&[u8], &[u8]> = TableDefinition::new("failed_candidates");

const EMPTY: &[u8] = &[];

/// Negative cache backed by a redb file.
///
/// `insert` is durable when it returns. All methods take `&self` and are safe
/// to call from several threads; redb serializes write transactions.
pub struct NegativeCache {
    db: Database,
    path: PathBuf,
}

impl fmt::Debug for NegativeCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NegativeCache").field("path", &self.path).finish_non_exhaustive()
    }
}

impl NegativeCache {
    /// Open or create the store inside `dir`, creating the directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| CacheError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = dir.join(CACHE_FILE);
        let db = Database::create(&path)?;

        // Make sure the table exists so read transactions can open it.
        let tx = db.begin_write()?;
        tx.open_table(FAILED)?;
        tx.commit()?;

        debug!(path = %path.display(), "opened negative cache");
        Ok(Self { db, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, candidate: &str) -> Result<bool, CacheError> {
        let tx = self.db.begin_read()?;
        let table = tx.open_table(FAILED)?;
        Ok(table.get(candidate.as_bytes())?.is_some())
    }

    /// Record a failed candidate. Synced to disk before returning.
    pub fn insert(&self, candidate: &str) -> Result<(), CacheError> {
        let mut tx = self.db.begin_write()?;
        tx.set_durability(Durability::Immediate);
        {
            let mut table = tx.open_table(FAILED)?;
            table.insert(candidate.as_bytes(), EMPTY)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Number of recorded candidates.
    pub fn len(&self) -> Result<u64, CacheError> {
        let tx = self.db.begin_read()?;
        let table = tx.open_table(FAILED)?;
        Ok(table.len()?)
    }

    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }
}
