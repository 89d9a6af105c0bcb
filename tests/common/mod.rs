//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use zipbrute::search::Progress;

/// Path of a ZIP fixture.
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("__fixtures__/zip")
        .join(name)
}

/// Progress sink that remembers what it was told.
#[derive(Debug, Default)]
pub struct CountingProgress {
    pub count: AtomicU64,
    pub finished: AtomicBool,
}

impl CountingProgress {
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

impl Progress for CountingProgress {
    fn inc(&self, n: u64) {
        self.count.fetch_add(n, Ordering::SeqCst);
    }

    fn finish(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }
}
