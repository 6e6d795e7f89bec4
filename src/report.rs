//! Channel for non-fatal, per-item failures.
//!
//! Flattening, type sorting and date sorting never abort because one file
//! could not be moved. Each such failure becomes a [`Failure`] handed to the
//! [`Reporter`] the caller supplied. [`LogReporter`] turns them into `tracing`
//! warnings; [`CollectingReporter`] keeps them for later inspection.

use crate::error::SortError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// What was being attempted when a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Moving a file (including creating its destination directory).
    Move,
    /// Removing an emptied source directory.
    Remove,
    /// Reading a file's modification time.
    Metadata,
    /// Listing a directory.
    Listing,
    /// A requested category folder does not exist.
    MissingCategory,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::Move => "move",
            FailureKind::Remove => "remove",
            FailureKind::Metadata => "metadata",
            FailureKind::Listing => "listing",
            FailureKind::MissingCategory => "missing category",
        };
        f.write_str(label)
    }
}

/// A single non-fatal failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub path: PathBuf,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn from_error(kind: FailureKind, path: &Path, error: &SortError) -> Self {
        Self::new(kind, path, error.to_string())
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.path.display(), self.message)
    }
}

/// Receives non-fatal failures from the sorting engines.
pub trait Reporter: Send + Sync {
    fn report(&self, failure: Failure);
}

/// Emits every failure as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, failure: Failure) {
        warn!(
            kind = %failure.kind,
            path = %failure.path.display(),
            "{}",
            failure.message
        );
    }
}

/// Stores every failure in memory without logging it.
///
/// The owner decides how to present what was collected.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    failures: Mutex<Vec<Failure>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the failures collected so far.
    pub fn failures(&self) -> Vec<Failure> {
        self.lock().clone()
    }

    /// Removes and returns the failures collected so far.
    pub fn take(&self) -> Vec<Failure> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Failure>> {
        // A poisoned list is still a valid list.
        self.failures
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, failure: Failure) {
        self.lock().push(failure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    #[test]
    fn test_collecting_reporter_keeps_order() {
        let reporter = CollectingReporter::new();
        reporter.report(Failure::new(FailureKind::Move, "/a", "first"));
        reporter.report(Failure::new(FailureKind::Remove, "/b", "second"));

        let failures = reporter.failures();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].kind, FailureKind::Move);
        assert_eq!(failures[1].path, PathBuf::from("/b"));
    }

    #[test]
    fn test_take_drains_failures() {
        let reporter = CollectingReporter::new();
        reporter.report(Failure::new(FailureKind::Metadata, "/c", "stat failed"));

        assert_eq!(reporter.take().len(), 1);
        assert!(reporter.is_empty());
    }

    struct EventCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for EventCounter {
        fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn count_events(f: impl FnOnce()) -> usize {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(EventCounter(count.clone()));
        tracing::subscriber::with_default(subscriber, f);
        count.load(Ordering::SeqCst)
    }

    #[test]
    fn test_log_reporter_emits_one_event_per_failure() {
        let events = count_events(|| {
            LogReporter.report(Failure::new(FailureKind::Move, "/a", "denied"));
        });
        assert_eq!(events, 1);
    }

    #[test]
    fn test_collecting_reporter_does_not_log() {
        let reporter = CollectingReporter::new();
        let events = count_events(|| {
            reporter.report(Failure::new(FailureKind::Move, "/a", "denied"));
        });
        assert_eq!(events, 0);
        assert_eq!(reporter.len(), 1);
    }

    #[test]
    fn test_failure_display() {
        let failure = Failure::new(FailureKind::MissingCategory, "/root/Videos", "not found");
        assert_eq!(failure.to_string(), "[missing category] /root/Videos: not found");
    }
}
