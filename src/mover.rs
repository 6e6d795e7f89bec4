/// Moving files into destination directories.
///
/// Every engine relocates files through [`move_into`]: it creates the
/// destination directory when needed and renames the file into it, falling
/// back to copy-then-delete when the rename crosses filesystems.
/// [`MoveTask`] packages one such move as owned data for the parallel sort.
use crate::error::{SortError, SortResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Moves `file_path` into `dest_dir`, keeping its file name.
///
/// `dest_dir` is created with its parents if it does not exist. An existing
/// file of the same name is handled by the platform's rename semantics
/// (replaced on Unix). Returns the new path of the file.
///
/// # Errors
///
/// Returns `SortError::CreateDir` if the destination cannot be created and
/// `SortError::Move` if the file cannot be moved.
///
/// # Examples
///
/// ```no_run
/// use sortium::mover::move_into;
/// use std::path::Path;
///
/// match move_into(Path::new("/downloads/photo.png"), Path::new("/downloads/Images")) {
///     Ok(dest) => println!("Moved to {}", dest.display()),
///     Err(e) => eprintln!("Move failed: {}", e),
/// }
/// ```
pub fn move_into(file_path: &Path, dest_dir: &Path) -> SortResult<PathBuf> {
    fs::create_dir_all(dest_dir).map_err(|e| SortError::CreateDir {
        path: dest_dir.to_path_buf(),
        source: e,
    })?;

    let file_name = file_path.file_name().ok_or_else(|| SortError::Move {
        from: file_path.to_path_buf(),
        to: dest_dir.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "file has no name component"),
    })?;
    let destination = dest_dir.join(file_name);

    rename_or_copy(file_path, &destination).map_err(|e| SortError::Move {
        from: file_path.to_path_buf(),
        to: destination.clone(),
        source: e,
    })?;

    debug!(from = %file_path.display(), to = %destination.display(), "Moved file");
    Ok(destination)
}

fn rename_or_copy(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        other => other,
    }
}

/// One file relocation, planned ahead and executed later.
///
/// The file at `source` moves into `base_dir/category`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTask {
    pub source: PathBuf,
    pub category: String,
    pub base_dir: PathBuf,
}

impl MoveTask {
    pub fn new(source: PathBuf, category: impl Into<String>, base_dir: PathBuf) -> Self {
        Self {
            source,
            category: category.into(),
            base_dir,
        }
    }

    /// Directory the file ends up in.
    pub fn dest_dir(&self) -> PathBuf {
        self.base_dir.join(&self.category)
    }

    /// Performs the move.
    pub fn run(&self) -> SortResult<PathBuf> {
        move_into(&self.source, &self.dest_dir())
    }
}
