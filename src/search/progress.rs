//! Progress reporting for a running search.

use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{spinner:.green} {percent:>3}% [{wide_bar:.cyan/blue}] {pos}/{len} ({per_sec}, {eta} remaining)";

/// Sink for per-candidate progress. Called concurrently from every worker.
pub trait Progress: Send + Sync {
    fn inc(&self, n: u64);
    fn finish(&self);
}

impl Progress for ProgressBar {
    fn inc(&self, n: u64) {
        ProgressBar::inc(self, n);
    }

    fn finish(&self) {
        ProgressBar::finish(self);
    }
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn inc(&self, _n: u64) {}

    fn finish(&self) {}
}

/// Terminal progress bar sized for `total` candidates.
pub fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
        bar.set_style(style.progress_chars("#>-"));
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_counts() {
        let bar = ProgressBar::hidden();
        bar.set_length(10);
        Progress::inc(&bar, 3);
        Progress::inc(&bar, 4);
        assert_eq!(bar.position(), 7);
        Progress::finish(&bar);
        assert!(bar.is_finished());
    }

    #[test]
    fn test_template_parses() {
        assert!(ProgressStyle::with_template(BAR_TEMPLATE).is_ok());
        assert_eq!(progress_bar(46_656).length(), Some(46_656));
    }
}
