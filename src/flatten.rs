//! Flattening nested directory trees.
//!
//! [`flatten`] pulls every file of a subtree up into a single destination
//! directory, optionally removing the source subdirectories it emptied.

use crate::error::{SortError, SortResult};
use crate::mover::move_into;
use crate::report::{Failure, FailureKind, Reporter};
use crate::traversal::{self, IgnoreSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Moves every file under `source` directly into `dest`.
///
/// Names in `ignore` are skipped at every depth, so an ignored directory and
/// everything below it stays where it is. `dest` is created if needed; it is
/// never descended into nor removed, even when it lives inside `source`.
///
/// With `remove_subdirs`, each subdirectory is removed once its contents have
/// been relocated, deepest first, together with any symlinks or special files
/// left in it (links are unlinked, their targets are not touched). A directory
/// still holding ignored entries or files that failed to move is left in
/// place and reported.
///
/// Move and removal failures go to `reporter` and do not stop the walk.
///
/// # Errors
///
/// Returns `SortError::NotFound` if `source` does not exist (nothing is
/// touched in that case) and `SortError::CreateDir` if `dest` cannot be
/// created.
pub fn flatten(
    source: &Path,
    dest: &Path,
    ignore: &IgnoreSet,
    remove_subdirs: bool,
    reporter: &dyn Reporter,
) -> SortResult<()> {
    if !source.exists() {
        return Err(SortError::not_found(source));
    }

    fs::create_dir_all(dest).map_err(|e| SortError::CreateDir {
        path: dest.to_path_buf(),
        source: e,
    })?;

    info!(source = %source.display(), dest = %dest.display(), "Flattening directory");

    let flattener = Flattener {
        dest,
        dest_canonical: fs::canonicalize(dest).ok(),
        ignore,
        remove_subdirs,
        reporter,
    };
    flattener.flatten_dir(source);

    info!(source = %source.display(), "Flatten complete");
    Ok(())
}

struct Flattener<'a> {
    dest: &'a Path,
    dest_canonical: Option<PathBuf>,
    ignore: &'a IgnoreSet,
    remove_subdirs: bool,
    reporter: &'a dyn Reporter,
}

impl Flattener<'_> {
    fn flatten_dir(&self, dir: &Path) {
        let listing = match traversal::iterate(dir, self.ignore).and_then(|t| t.partition()) {
            Ok(listing) => listing,
            Err(e) => {
                self.reporter
                    .report(Failure::new(FailureKind::Listing, dir, e.to_string()));
                return;
            }
        };

        for name in &listing.files {
            let file_path = dir.join(name);
            if let Err(e) = move_into(&file_path, self.dest) {
                self.reporter
                    .report(Failure::from_error(FailureKind::Move, &file_path, &e));
            }
        }

        for name in &listing.dirs {
            let sub_dir = dir.join(name);
            let canonical = fs::canonicalize(&sub_dir).ok();

            if self.is_dest(canonical.as_deref()) {
                continue;
            }

            self.flatten_dir(&sub_dir);

            if self.remove_subdirs && !self.holds_dest(canonical.as_deref()) {
                self.remove_dir(&sub_dir);
            }
        }
    }

    fn remove_dir(&self, dir: &Path) {
        self.unlink_leftovers(dir);

        match fs::remove_dir(dir) {
            Ok(()) => debug!(path = %dir.display(), "Removed directory"),
            Err(e) => {
                let error = SortError::Remove {
                    path: dir.to_path_buf(),
                    source: e,
                };
                self.reporter
                    .report(Failure::from_error(FailureKind::Remove, dir, &error));
            }
        }
    }

    /// Unlinks the symlinks and special files the walk left behind.
    ///
    /// Links are removed themselves, their targets are never touched.
    /// Ignored names and regular files that failed to move stay.
    fn unlink_leftovers(&self, dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                self.reporter
                    .report(Failure::new(FailureKind::Listing, dir, e.to_string()));
                return;
            }
        };

        for entry in entries.flatten() {
            if self.ignore.contains(&entry.file_name()) {
                continue;
            }
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() || file_type.is_file() {
                continue;
            }

            let path = entry.path();
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "Unlinked leftover entry"),
                Err(e) => {
                    let error = SortError::Remove {
                        path: path.clone(),
                        source: e,
                    };
                    self.reporter
                        .report(Failure::from_error(FailureKind::Remove, &path, &error));
                }
            }
        }
    }

    fn is_dest(&self, canonical: Option<&Path>) -> bool {
        matches!((canonical, &self.dest_canonical), (Some(dir), Some(dest)) if dir == dest)
    }

    /// True when the destination sits somewhere below `canonical`.
    fn holds_dest(&self, canonical: Option<&Path>) -> bool {
        matches!((canonical, &self.dest_canonical), (Some(dir), Some(dest)) if dest.starts_with(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CollectingReporter;
    use tempfile::TempDir;

    fn build_tree(root: &Path) {
        fs::create_dir_all(root.join("sub1/sub_sub1")).unwrap();
        fs::create_dir_all(root.join("sub2/sub_sub2")).unwrap();
        fs::write(root.join("top.txt"), "top").unwrap();
        fs::write(root.join("sub1/video1.mp4"), "video").unwrap();
        fs::write(root.join("sub1/sub_sub1/image1.jpg"), "image").unwrap();
        fs::write(root.join("sub2/audio1.mp3"), "audio").unwrap();
        fs::write(root.join("sub2/sub_sub2/page1.html"), "<html></html>").unwrap();
    }

    #[test]
    fn test_flatten_moves_all_files() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        build_tree(source.path());
        let reporter = CollectingReporter::new();

        flatten(source.path(), dest.path(), &IgnoreSet::new(), false, &reporter).unwrap();

        for name in ["top.txt", "video1.mp4", "image1.jpg", "audio1.mp3", "page1.html"] {
            assert!(dest.path().join(name).is_file(), "{} should be flattened", name);
        }
        assert!(source.path().join("sub1/sub_sub1").is_dir());
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_flatten_creates_destination() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest_root = TempDir::new().expect("Failed to create temp directory");
        build_tree(source.path());
        let dest = dest_root.path().join("deep/new/dest");

        flatten(source.path(), &dest, &IgnoreSet::new(), false, &CollectingReporter::new())
            .unwrap();

        assert!(dest.join("page1.html").is_file());
    }

    #[test]
    fn test_flatten_missing_source() {
        let dest_root = TempDir::new().expect("Failed to create temp directory");
        let dest = dest_root.path().join("dest");

        let result = flatten(
            Path::new("wrong_path/does/not/exist"),
            &dest,
            &IgnoreSet::new(),
            false,
            &CollectingReporter::new(),
        );

        assert!(matches!(result, Err(SortError::NotFound { .. })));
        assert!(!dest.exists());
    }

    #[test]
    fn test_flatten_remove_subdirs() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        build_tree(source.path());
        let reporter = CollectingReporter::new();

        flatten(source.path(), dest.path(), &IgnoreSet::new(), true, &reporter).unwrap();

        assert!(!source.path().join("sub1").exists());
        assert!(!source.path().join("sub2").exists());
        assert!(source.path().exists());
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_flatten_keeps_nested_destination() {
        let source = TempDir::new().expect("Failed to create temp directory");
        build_tree(source.path());
        let dest = source.path().join("sub1/collected");
        let reporter = CollectingReporter::new();

        flatten(source.path(), &dest, &IgnoreSet::new(), true, &reporter).unwrap();

        assert!(dest.join("image1.jpg").is_file());
        assert!(dest.join("top.txt").is_file());
        assert!(!source.path().join("sub2").exists());
        assert!(!source.path().join("sub1/sub_sub1").exists());
        assert!(reporter.is_empty(), "unexpected failures: {:?}", reporter.failures());
    }

    #[test]
    fn test_flatten_ignore_applies_at_every_depth() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        build_tree(source.path());
        fs::create_dir_all(source.path().join("sub1/ignoreme")).unwrap();
        fs::write(source.path().join("sub1/ignoreme/hidden.txt"), "h").unwrap();
        let reporter = CollectingReporter::new();

        flatten(
            source.path(),
            dest.path(),
            &IgnoreSet::from_names(["ignoreme"]),
            true,
            &reporter,
        )
        .unwrap();

        assert!(!dest.path().join("hidden.txt").exists());
        assert!(source.path().join("sub1/ignoreme/hidden.txt").is_file());
        // sub1 still holds the ignored directory, so it cannot be removed.
        let failures = reporter.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, FailureKind::Remove);
        assert_eq!(failures[0].path, source.path().join("sub1"));
    }

    #[cfg(unix)]
    #[test]
    fn test_flatten_remove_subdirs_unlinks_leftover_symlinks() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        let outside = TempDir::new().expect("Failed to create temp directory");
        let target = outside.path().join("t.txt");
        fs::write(&target, "target").unwrap();
        fs::create_dir(source.path().join("sub")).unwrap();
        fs::write(source.path().join("sub/real.txt"), "real").unwrap();
        std::os::unix::fs::symlink(&target, source.path().join("sub/link.txt")).unwrap();
        let reporter = CollectingReporter::new();

        flatten(source.path(), dest.path(), &IgnoreSet::new(), true, &reporter).unwrap();

        assert!(dest.path().join("real.txt").is_file());
        assert!(!dest.path().join("link.txt").exists());
        assert!(!source.path().join("sub").exists());
        assert!(target.is_file(), "symlink target must survive");
        assert!(reporter.is_empty(), "unexpected failures: {:?}", reporter.failures());
    }

    #[cfg(unix)]
    #[test]
    fn test_flatten_remove_subdirs_keeps_ignored_symlink() {
        let source = TempDir::new().expect("Failed to create temp directory");
        let dest = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(source.path().join("sub")).unwrap();
        fs::write(source.path().join("target.txt"), "target").unwrap();
        std::os::unix::fs::symlink(
            source.path().join("target.txt"),
            source.path().join("sub/keep.lnk"),
        )
        .unwrap();
        let reporter = CollectingReporter::new();

        flatten(
            source.path(),
            dest.path(),
            &IgnoreSet::from_names(["keep.lnk"]),
            true,
            &reporter,
        )
        .unwrap();

        assert!(fs::symlink_metadata(source.path().join("sub/keep.lnk")).is_ok());
        let failures = reporter.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, FailureKind::Remove);
    }
}
