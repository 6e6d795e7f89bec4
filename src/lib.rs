//! sortium - sort files into category and date folders, sort by regex, and
//! flatten nested directories.
//!
//! This library provides a single-level directory traversal primitive, an
//! extension-based category table, and the engines built on them: flattening,
//! sorting by type (sequential or parallel), by regex and by modification date.
//! Non-fatal per-file failures are sent to a caller-supplied [`Reporter`].

pub mod cli;
pub mod config;
pub mod error;
pub mod file_category;
pub mod file_utils;
pub mod flatten;
pub mod mover;
pub mod output;
pub mod report;
pub mod sorter;
pub mod traversal;

pub use config::{Config, ConfigError};
pub use error::{SortError, SortResult};
pub use file_category::{CategoryTable, FALLBACK_CATEGORY};
pub use file_utils::{date_folder_name, find_unique_extensions, modified_time};
pub use flatten::flatten;
pub use mover::{MoveTask, move_into};
pub use report::{CollectingReporter, Failure, FailureKind, LogReporter, Reporter};
pub use sorter::{Dispatch, RuleSet, Sorter};
pub use traversal::{Entry, IgnoreSet, Listing, iterate};

pub use cli::{SortCommand, run_cli};
