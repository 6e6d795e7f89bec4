//! Single-level directory traversal.
//!
//! [`iterate`] reads one directory and yields its immediate children split into
//! subdirectories and regular files. Names in the [`IgnoreSet`] and symbolic
//! links are never yielded. Nothing is cached: every call re-reads the directory.
//!
//! # Examples
//!
//! ```no_run
//! use sortium::traversal::{iterate, IgnoreSet};
//! use std::path::Path;
//!
//! let ignore = IgnoreSet::from_names([".git"]);
//! let listing = iterate(Path::new("."), &ignore)?.partition()?;
//! for name in &listing.files {
//!     println!("{}", name.to_string_lossy());
//! }
//! # Ok::<(), std::io::Error>(())
//! ```

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs::{self, ReadDir};
use std::io;
use std::path::Path;

/// Names of directory entries to leave out of a traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    names: HashSet<OsString>,
}

impl IgnoreSet {
    /// Creates an empty ignore set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an ignore set from entry names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Adds a name to the set.
    pub fn insert(&mut self, name: impl Into<OsString>) {
        self.names.insert(name.into());
    }

    pub fn contains(&self, name: &OsStr) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One immediate child of a traversed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A subdirectory (not a symlink to one).
    Dir(OsString),
    /// A regular file (not a symlink to one).
    File(OsString),
}

/// The children of one directory, already partitioned.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub dirs: Vec<OsString>,
    pub files: Vec<OsString>,
}

/// Lazy, single-pass iterator over a directory's classified children.
pub struct Traversal<'a> {
    entries: ReadDir,
    ignore: &'a IgnoreSet,
}

impl Traversal<'_> {
    /// Drains the traversal into directories and files, in listing order.
    ///
    /// Stops at the first entry that cannot be read.
    pub fn partition(self) -> io::Result<Listing> {
        let mut listing = Listing::default();
        for entry in self {
            match entry? {
                Entry::Dir(name) => listing.dirs.push(name),
                Entry::File(name) => listing.files.push(name),
            }
        }
        Ok(listing)
    }
}

impl Iterator for Traversal<'_> {
    type Item = io::Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e)),
            };

            let name = entry.file_name();
            if self.ignore.contains(&name) {
                continue;
            }

            // `DirEntry::file_type` does not follow symlinks.
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => return Some(Err(e)),
            };

            if file_type.is_symlink() {
                continue;
            }
            if file_type.is_dir() {
                return Some(Ok(Entry::Dir(name)));
            }
            if file_type.is_file() {
                return Some(Ok(Entry::File(name)));
            }
        }
    }
}

/// Starts a traversal of `folder`'s immediate children.
///
/// Fails only if the directory itself cannot be opened.
pub fn iterate<'a>(folder: &Path, ignore: &'a IgnoreSet) -> io::Result<Traversal<'a>> {
    Ok(Traversal {
        entries: fs::read_dir(folder)?,
        ignore,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sorted(mut names: Vec<OsString>) -> Vec<OsString> {
        names.sort();
        names
    }

    #[test]
    fn test_partitions_dirs_and_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("b.png"), "b").unwrap();

        let listing = iterate(root, &IgnoreSet::new())
            .unwrap()
            .partition()
            .unwrap();

        assert_eq!(listing.dirs, vec![OsString::from("sub")]);
        assert_eq!(
            sorted(listing.files),
            vec![OsString::from("a.txt"), OsString::from("b.png")]
        );
    }

    #[test]
    fn test_ignored_names_are_skipped() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("node_modules")).unwrap();
        fs::write(root.join("keep.txt"), "k").unwrap();
        fs::write(root.join("skip.txt"), "s").unwrap();

        let ignore = IgnoreSet::from_names(["node_modules", "skip.txt"]);
        let listing = iterate(root, &ignore).unwrap().partition().unwrap();

        assert!(listing.dirs.is_empty());
        assert_eq!(listing.files, vec![OsString::from("keep.txt")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_skipped() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("real_dir")).unwrap();
        fs::write(root.join("real.txt"), "r").unwrap();
        std::os::unix::fs::symlink(root.join("real_dir"), root.join("link_dir")).unwrap();
        std::os::unix::fs::symlink(root.join("real.txt"), root.join("link.txt")).unwrap();

        let listing = iterate(root, &IgnoreSet::new())
            .unwrap()
            .partition()
            .unwrap();

        assert_eq!(listing.dirs, vec![OsString::from("real_dir")]);
        assert_eq!(listing.files, vec![OsString::from("real.txt")]);
    }

    #[test]
    fn test_traversal_rereads_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let ignore = IgnoreSet::new();

        assert_eq!(iterate(root, &ignore).unwrap().count(), 0);
        fs::write(root.join("late.txt"), "l").unwrap();
        let listing = iterate(root, &ignore).unwrap().partition().unwrap();
        assert_eq!(listing.files, vec![OsString::from("late.txt")]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let ignore = IgnoreSet::new();
        let result = iterate(&temp_dir.path().join("absent"), &ignore);
        assert_eq!(result.err().map(|e| e.kind()), Some(io::ErrorKind::NotFound));
    }
}
