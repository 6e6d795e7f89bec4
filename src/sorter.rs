//! Sorting files into category, regex and date folders.
//!
//! [`Sorter`] holds an immutable [`CategoryTable`] and the [`Reporter`] that
//! receives non-fatal failures. Type and date sorting report per-file problems
//! and keep going; regex sorting stops at the first problem and returns it
//! wrapped in [`SortError::RegexSort`].

use crate::error::{SortError, SortResult};
use crate::file_category::{CategoryTable, validate_category_name};
use crate::file_utils::{date_folder_name, modified_time};
use crate::mover::{MoveTask, move_into};
use crate::report::{Failure, FailureKind, LogReporter, Reporter};
use crate::traversal::{self, Entry, IgnoreSet};
use rayon::prelude::*;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// How the move step of a type sort is executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dispatch {
    /// One file after the other on the calling thread.
    #[default]
    Sequential,
    /// Moves spread over rayon's global thread pool.
    Parallel,
}

/// Ordered regex rules mapping file names to categories.
///
/// Each pattern is anchored at the start of the file name only, so
/// `img_\d+` matches `img_12.png` but not `old_img_12.png`. Rules are tried in
/// insertion order and the first match wins.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<(String, Regex)>,
}

impl RuleSet {
    /// Compiles `(category, pattern)` pairs, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `SortError::InvalidArgument` for an invalid category name or
    /// a pattern that does not compile.
    pub fn new<I, C, P>(rules: I) -> SortResult<Self>
    where
        I: IntoIterator<Item = (C, P)>,
        C: Into<String>,
        P: AsRef<str>,
    {
        let rules = rules
            .into_iter()
            .map(|(category, pattern)| {
                let category = category.into();
                validate_category_name(&category)?;
                let pattern = pattern.as_ref();
                let regex = Regex::new(&format!("^(?:{})", pattern)).map_err(|e| {
                    SortError::InvalidArgument(format!(
                        "invalid regex pattern '{}' for category '{}': {}",
                        pattern, category, e
                    ))
                })?;
                Ok((category, regex))
            })
            .collect::<SortResult<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// Returns the category of the first rule matching `file_name`.
    pub fn category_for(&self, file_name: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|(_, regex)| regex.is_match(file_name))
            .map(|(category, _)| category.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Sorts files into category folders.
///
/// # Examples
///
/// ```no_run
/// use sortium::{Dispatch, IgnoreSet, Sorter};
/// use std::path::Path;
///
/// let sorter = Sorter::default();
/// sorter.sort_by_type(Path::new("/home/user/Downloads"), &IgnoreSet::new(), Dispatch::Parallel)?;
/// sorter.sort_by_date(Path::new("/home/user/Downloads"), &["Images", "Documents"])?;
/// # Ok::<(), sortium::SortError>(())
/// ```
pub struct Sorter {
    table: CategoryTable,
    reporter: Arc<dyn Reporter>,
}

impl Sorter {
    /// Creates a sorter that logs failures through `tracing`.
    pub fn new(table: CategoryTable) -> Self {
        Self::with_reporter(table, Arc::new(LogReporter))
    }

    /// Creates a sorter that sends failures to `reporter`.
    pub fn with_reporter(table: CategoryTable, reporter: Arc<dyn Reporter>) -> Self {
        Self { table, reporter }
    }

    /// Moves every file directly inside `folder` into `folder/<category>`.
    ///
    /// Categories come from the file extensions. Subdirectories are left
    /// alone, and names in `ignore` are skipped. With [`Dispatch::Parallel`]
    /// the moves are planned first, run on the thread pool, and their
    /// failures reported once all of them finished.
    ///
    /// # Errors
    ///
    /// Returns `SortError::NotFound` if `folder` does not exist and
    /// `SortError::Io` if it cannot be listed. Per-file failures are reported,
    /// not returned.
    pub fn sort_by_type(
        &self,
        folder: &Path,
        ignore: &IgnoreSet,
        dispatch: Dispatch,
    ) -> SortResult<()> {
        if !folder.exists() {
            return Err(SortError::not_found(folder));
        }

        let tasks = self.plan_type_moves(folder, ignore)?;
        info!(folder = %folder.display(), files = tasks.len(), ?dispatch, "Sorting by type");

        match dispatch {
            Dispatch::Sequential => {
                for task in &tasks {
                    if let Err(e) = task.run() {
                        self.report(FailureKind::Move, &task.source, &e);
                    }
                }
            }
            Dispatch::Parallel => {
                let failures: Vec<_> = tasks
                    .par_iter()
                    .filter_map(|task| {
                        task.run()
                            .err()
                            .map(|e| Failure::from_error(FailureKind::Move, &task.source, &e))
                    })
                    .collect();
                for failure in failures {
                    self.reporter.report(failure);
                }
            }
        }

        Ok(())
    }

    fn plan_type_moves(&self, folder: &Path, ignore: &IgnoreSet) -> SortResult<Vec<MoveTask>> {
        let entries = traversal::iterate(folder, ignore).map_err(|e| SortError::io(folder, e))?;

        let mut tasks = Vec::new();
        for entry in entries {
            match entry {
                Ok(Entry::File(name)) => {
                    let source = folder.join(&name);
                    let category = self.table.category_for_path(&source).to_string();
                    tasks.push(MoveTask::new(source, category, folder.to_path_buf()));
                }
                Ok(Entry::Dir(_)) => {}
                Err(e) => self.reporter.report(Failure::new(
                    FailureKind::Listing,
                    folder,
                    e.to_string(),
                )),
            }
        }
        Ok(tasks)
    }

    /// Moves files matching `rules` from the tree under `folder` into
    /// `dest_base/<category>`.
    ///
    /// Files of each directory are handled before its subdirectories. A file
    /// matching no rule stays where it is. `dest_base` is not walked when it
    /// sits inside `folder`.
    ///
    /// # Errors
    ///
    /// Returns `SortError::NotFound` if `folder` does not exist. Any other
    /// failure during the walk stops it and is returned as
    /// `SortError::RegexSort`.
    pub fn sort_by_regex(&self, folder: &Path, rules: &RuleSet, dest_base: &Path) -> SortResult<()> {
        if !folder.exists() {
            return Err(SortError::not_found(folder));
        }

        info!(folder = %folder.display(), dest = %dest_base.display(), rules = rules.len(), "Sorting by regex");
        self.regex_sort_dir(folder, rules, dest_base)
            .map_err(|e| SortError::RegexSort(Box::new(e)))
    }

    fn regex_sort_dir(&self, dir: &Path, rules: &RuleSet, dest_base: &Path) -> SortResult<()> {
        let ignore = IgnoreSet::new();
        let listing = traversal::iterate(dir, &ignore)
            .and_then(|t| t.partition())
            .map_err(|e| SortError::io(dir, e))?;

        for name in &listing.files {
            let file_name = name.to_string_lossy();
            if let Some(category) = rules.category_for(&file_name) {
                move_into(&dir.join(name), &dest_base.join(category))?;
            }
        }

        // The destination may only have appeared while moving this level's files.
        let dest_canonical = fs::canonicalize(dest_base).ok();
        for name in &listing.dirs {
            let sub_dir = dir.join(name);
            if let (Some(dest), Ok(canonical)) = (&dest_canonical, fs::canonicalize(&sub_dir))
                && &canonical == dest
            {
                continue;
            }
            self.regex_sort_dir(&sub_dir, rules, dest_base)?;
        }

        Ok(())
    }

    /// Moves the files of each `folder/<category>` into a subfolder named
    /// after their modification date (`DD-Mon-YYYY`).
    ///
    /// Categories without a matching directory are reported and skipped, as
    /// are files whose metadata or move fails.
    ///
    /// # Errors
    ///
    /// Returns `SortError::NotFound` if `folder` does not exist.
    pub fn sort_by_date<S: AsRef<str>>(&self, folder: &Path, category_names: &[S]) -> SortResult<()> {
        if !folder.exists() {
            return Err(SortError::not_found(folder));
        }

        info!(folder = %folder.display(), categories = category_names.len(), "Sorting by date");

        for category in category_names {
            let category_dir = folder.join(category.as_ref());
            if !category_dir.is_dir() {
                self.reporter.report(Failure::new(
                    FailureKind::MissingCategory,
                    &category_dir,
                    "category folder not found, skipping",
                ));
                continue;
            }
            self.date_sort_category(&category_dir);
        }

        Ok(())
    }

    fn date_sort_category(&self, category_dir: &Path) {
        let ignore = IgnoreSet::new();
        let entries = match traversal::iterate(category_dir, &ignore) {
            Ok(entries) => entries,
            Err(e) => {
                self.reporter.report(Failure::new(
                    FailureKind::Listing,
                    category_dir,
                    e.to_string(),
                ));
                return;
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            match entry {
                Ok(Entry::File(name)) => files.push(name),
                Ok(Entry::Dir(_)) => {}
                Err(e) => self.reporter.report(Failure::new(
                    FailureKind::Listing,
                    category_dir,
                    e.to_string(),
                )),
            }
        }

        for name in files {
            let file_path = category_dir.join(&name);
            let modified = match modified_time(&file_path) {
                Ok(modified) => modified,
                Err(e) => {
                    self.report(FailureKind::Metadata, &file_path, &e);
                    continue;
                }
            };

            let date_dir = category_dir.join(date_folder_name(&modified));
            match move_into(&file_path, &date_dir) {
                Ok(dest) => debug!(to = %dest.display(), "Sorted by date"),
                Err(e) => self.report(FailureKind::Move, &file_path, &e),
            }
        }
    }

    fn report(&self, kind: FailureKind, path: &Path, error: &SortError) {
        self.reporter.report(Failure::from_error(kind, path, error));
    }
}

impl Default for Sorter {
    fn default() -> Self {
        Self::new(CategoryTable::default())
    }
}
