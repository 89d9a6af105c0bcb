//! Search coordinator: feeds candidates to a pool of verifier threads.
//!
//! ```text
//! Candidates ──► bounded queue ──► worker × N
//!  (feeder)       (crossbeam)       filter → cache lookup → verify
//!                                     ├─ invalid: cache insert
//!                                     ├─ valid: record, cancel
//!                                     └─ codec/cache error: record, cancel
//! ```
//!
//! Cancellation is a single flag checked by the feeder before every send and
//! by workers before and after every receive, so no candidate is counted once
//! the flag is up. A verification already in flight runs to completion.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::OnceLock;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{debug, error, info};

use super::cache::NegativeCache;
use super::candidates::Candidates;
use super::config::Config;
use super::error::SearchError;
use super::filter::Filter;
use super::progress::Progress;
use super::verifier::{Probe, Stage, Verdict, Verifier};

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchReport {
    /// The recovered password, if any candidate passed full verification.
    pub password: Option<String>,
    /// Size of the search space.
    pub total: u64,
    /// Candidates taken from the queue and counted toward progress.
    pub processed: u64,
    /// Candidates rejected by the filter.
    pub filtered: u64,
    /// Candidates skipped because the cache already held them.
    pub cached: u64,
    /// Candidates handed to the verifier.
    pub verified: u64,
    /// Candidates that got past the first-member probe.
    pub probe_passed: u64,
}

#[derive(Debug, Default)]
struct Counters {
    processed: AtomicU64,
    filtered: AtomicU64,
    cached: AtomicU64,
    verified: AtomicU64,
    probe_passed: AtomicU64,
}

/// State shared between the feeder and the workers of one run.
#[derive(Debug, Default)]
struct Shared {
    cancel: AtomicBool,
    found: OnceLock<String>,
    failure: OnceLock<SearchError>,
    counters: Counters,
}

impl Shared {
    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    /// Keep the first fatal error and stop the run.
    fn fail(&self, err: SearchError) {
        error!(error = %err, "aborting search");
        let _ = self.failure.set(err);
        self.cancel();
    }
}

/// A configured search, ready to run.
#[derive(Debug)]
pub struct Search {
    config: Config,
    filter: Filter,
    verifier: Verifier,
    cache: NegativeCache,
    total: u64,
    cached: u64,
}

impl Search {
    /// Validate the configuration, inspect the archive, then open the cache.
    ///
    /// The cache is opened last, so a run that cannot start leaves no store
    /// behind.
    pub fn open(config: Config) -> Result<Self, SearchError> {
        let total = config.validate()?;
        let verifier = Verifier::inspect(&config.input, config.full_check)?;
        let cache = NegativeCache::open(&config.db_path)?;
        let cached = cache.len()?;

        Ok(Self {
            config,
            filter: Filter::default(),
            verifier,
            cache,
            total,
            cached,
        })
    }

    /// Replace the default filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Cache population when the search was opened.
    pub fn cached(&self) -> u64 {
        self.cached
    }

    /// Size of the search space.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &NegativeCache {
        &self.cache
    }

    /// Run until the password is found or the space is exhausted.
    ///
    /// Returns `Ok` with `password: None` on exhaustion. A codec or cache
    /// failure in any worker aborts the run, unless a password was already
    /// found.
    pub fn run<P: Progress + ?Sized>(&self, progress: &P) -> Result<SearchReport, SearchError> {
        info!(
            input = %self.config.input.display(),
            length = self.config.length,
            workers = self.config.workers,
            total = self.total,
            cached = self.cached,
            "starting search"
        );

        let shared = Shared::default();
        let (tx, rx) = bounded::<String>(self.config.queue_capacity);

        let panicked = thread::scope(|s| {
            let mut handles = Vec::with_capacity(self.config.workers);
            for id in 0..self.config.workers {
                let rx = rx.clone();
                let shared = &shared;
                let spawned = thread::Builder::new()
                    .name(format!("zipbrute-worker-{id}"))
                    .spawn_scoped(s, move || self.worker(id, rx, shared, progress));
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        shared.fail(SearchError::Spawn(e));
                        break;
                    }
                }
            }
            // Sends fail once every worker has gone.
            drop(rx);
            self.feed(tx, &shared);

            handles
                .into_iter()
                .map(|handle| handle.join().is_err())
                .fold(false, |any, panicked| any || panicked)
        });

        progress.finish();

        let Shared {
            found,
            failure,
            counters,
            ..
        } = shared;
        let password = found.into_inner();
        if password.is_none() {
            if let Some(err) = failure.into_inner() {
                return Err(err);
            }
            if panicked {
                return Err(SearchError::WorkerPanicked);
            }
        }

        let report = SearchReport {
            password,
            total: self.total,
            processed: counters.processed.into_inner(),
            filtered: counters.filtered.into_inner(),
            cached: counters.cached.into_inner(),
            verified: counters.verified.into_inner(),
            probe_passed: counters.probe_passed.into_inner(),
        };
        info!(
            found = report.password.is_some(),
            processed = report.processed,
            filtered = report.filtered,
            cached = report.cached,
            verified = report.verified,
            "search finished"
        );
        Ok(report)
    }

    fn feed(&self, tx: Sender<String>, shared: &Shared) {
        for candidate in Candidates::new(&self.config.alphabet, self.config.length) {
            if shared.cancelled() || tx.send(candidate).is_err() {
                break;
            }
        }
        debug!("feeder done");
    }

    fn worker<P: Progress + ?Sized>(
        &self,
        id: usize,
        rx: Receiver<String>,
        shared: &Shared,
        progress: &P,
    ) {
        let mut probe = match self.verifier.open_probe() {
            Ok(probe) => probe,
            Err(err) => return shared.fail(err),
        };
        debug!(worker = id, "worker started");

        while !shared.cancelled() {
            let Ok(candidate) = rx.recv() else { break };
            if shared.cancelled() {
                break;
            }
            if let Err(err) = self.process(&mut probe, &candidate, shared, progress) {
                shared.fail(err);
                break;
            }
        }
        debug!(worker = id, "worker stopped");
    }

    fn process<P: Progress + ?Sized>(
        &self,
        probe: &mut Probe,
        candidate: &str,
        shared: &Shared,
        progress: &P,
    ) -> Result<(), SearchError> {
        let counters = &shared.counters;
        progress.inc(1);
        counters.processed.fetch_add(1, Ordering::Relaxed);

        if self.filter.reject(candidate) {
            counters.filtered.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }
        if self.cache.contains(candidate)? {
            counters.cached.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }

        counters.verified.fetch_add(1, Ordering::Relaxed);
        let verdict = self
            .verifier
            .verify(probe, candidate)
            .map_err(|source| self.verifier.archive_error(source))?;

        match verdict {
            Verdict::Valid => {
                counters.probe_passed.fetch_add(1, Ordering::Relaxed);
                if shared.found.set(candidate.to_owned()).is_ok() {
                    info!(candidate, "password found");
                }
                shared.cancel();
            }
            Verdict::Invalid(stage) => {
                if stage == Stage::Full {
                    counters.probe_passed.fetch_add(1, Ordering::Relaxed);
                }
                self.cache.insert(candidate)?;
            }
        }
        Ok(())
    }
}
