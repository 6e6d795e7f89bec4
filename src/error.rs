//! Error types shared by every sorting engine.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the traversal, sorting and flattening operations.
///
/// `NotFound` and `InvalidArgument` are always fatal. The per-item variants
/// (`Move`, `CreateDir`, `Remove`, `Io`) are fatal only inside
/// [`Sorter::sort_by_regex`](crate::Sorter::sort_by_regex), where they end up
/// wrapped in [`SortError::RegexSort`]. Elsewhere they are handed to a
/// [`Reporter`](crate::Reporter) and processing continues.
#[derive(Debug, Error)]
pub enum SortError {
    /// The root or source path of an operation does not exist.
    #[error("path does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    /// Malformed input to a constructor or call.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A file could not be moved.
    #[error("failed to move {} to {}: {source}", from.display(), to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A destination directory could not be created.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A directory could not be removed.
    #[error("failed to remove directory {}: {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Listing a directory or reading metadata failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any failure during a regex sort, promoted to a fatal error for the whole call.
    #[error("an error occurred while sorting files: {0}")]
    RegexSort(#[source] Box<SortError>),
}

impl SortError {
    pub(crate) fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Maps an I/O error on `path`, keeping `NotFound` distinct.
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    /// Returns true for [`SortError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for sorting operations.
pub type SortResult<T> = Result<T, SortError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_keeps_not_found_distinct() {
        let err = SortError::io(
            "/missing",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.is_not_found());

        let err = SortError::io(
            "/denied",
            io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_regex_sort_wraps_message() {
        let inner = SortError::not_found("/tmp/x");
        let err = SortError::RegexSort(Box::new(inner));
        assert!(err.to_string().contains("/tmp/x"));
    }
}
