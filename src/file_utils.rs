//! File metadata helpers and directory surveys.

use crate::error::{SortError, SortResult};
use crate::traversal::{self, Entry, IgnoreSet};
use chrono::{DateTime, Local};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Folder name format used by the date sort, e.g. `05-Mar-2024`.
pub const DATE_FOLDER_FORMAT: &str = "%d-%b-%Y";

/// Returns the last-modified time of `path` in local time.
///
/// # Errors
///
/// Returns `SortError::NotFound` if the path does not exist, and
/// `SortError::Io` if its metadata cannot be read.
pub fn modified_time(path: &Path) -> SortResult<DateTime<Local>> {
    let metadata = fs::metadata(path).map_err(|e| SortError::io(path, e))?;
    let modified = metadata.modified().map_err(|e| SortError::io(path, e))?;
    Ok(DateTime::<Local>::from(modified))
}

/// Formats a timestamp as a date folder name.
///
/// chrono always uses English month abbreviations, so the result does not
/// depend on the process locale.
///
/// ```
/// use chrono::{Local, TimeZone};
/// use sortium::file_utils::date_folder_name;
///
/// let date = Local.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
/// assert_eq!(date_folder_name(&date), "05-Mar-2024");
/// ```
pub fn date_folder_name(timestamp: &DateTime<Local>) -> String {
    timestamp.format(DATE_FOLDER_FORMAT).to_string()
}

/// Collects every distinct file extension found under `root`, recursively.
///
/// Extensions are lowercased and keep their leading dot. Symbolic links are
/// not followed, and subdirectories that cannot be read are skipped.
///
/// # Errors
///
/// Returns `SortError::NotFound` if `root` does not exist.
pub fn find_unique_extensions(root: &Path) -> SortResult<BTreeSet<String>> {
    if !root.exists() {
        return Err(SortError::not_found(root));
    }

    let ignore = IgnoreSet::new();
    let mut extensions = BTreeSet::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match traversal::iterate(&dir, &ignore) {
            Ok(entries) => entries,
            Err(e) if dir == root => return Err(SortError::io(root, e)),
            Err(e) => {
                debug!(path = %dir.display(), error = %e, "Skipping unreadable directory");
                continue;
            }
        };

        for entry in entries.flatten() {
            match entry {
                Entry::Dir(name) => pending.push(dir.join(name)),
                Entry::File(name) => {
                    if let Some(ext) = Path::new(&name).extension() {
                        extensions.insert(format!(".{}", ext.to_string_lossy().to_lowercase()));
                    }
                }
            }
        }
    }

    Ok(extensions)
}
