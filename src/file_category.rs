/// Extension-based categorization of files.
///
/// A [`CategoryTable`] maps category names (e.g. "Images", "Documents") to
/// lists of extensions. Lookups go through a precomputed inverse map and are
/// case-insensitive; unknown extensions fall back to [`FALLBACK_CATEGORY`].
///
/// # Examples
///
/// ```
/// use sortium::file_category::CategoryTable;
///
/// let table = CategoryTable::default();
/// assert_eq!(table.category_for(".png"), "Images");
/// assert_eq!(table.category_for(".MP3"), "Music");
/// assert_eq!(table.category_for(".xyz"), "Others");
/// ```
use crate::error::{SortError, SortResult};
use std::collections::HashMap;
use std::path::Path;

/// Catch-all category for extensions missing from the table.
pub const FALLBACK_CATEGORY: &str = "Others";

/// Built-in category table, in declaration order.
const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Images",
        &[
            ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", ".tiff", ".ico", ".heic",
        ],
    ),
    (
        "Documents",
        &[".pdf", ".doc", ".docx", ".txt", ".odt", ".rtf", ".md", ".tex"],
    ),
    ("Spreadsheets", &[".xls", ".xlsx", ".ods", ".csv"]),
    ("Presentations", &[".ppt", ".pptx", ".odp"]),
    (
        "Videos",
        &[".mp4", ".avi", ".mov", ".mkv", ".flv", ".wmv", ".webm", ".m4v"],
    ),
    (
        "Music",
        &[".mp3", ".wav", ".aac", ".flac", ".ogg", ".m4a", ".wma"],
    ),
    (
        "Archives",
        &[".zip", ".rar", ".tar", ".gz", ".bz2", ".7z", ".xz"],
    ),
    (
        "Code",
        &[
            ".py", ".js", ".ts", ".html", ".css", ".rs", ".java", ".c", ".cpp", ".h", ".go",
            ".sh", ".json", ".xml", ".yaml", ".yml", ".toml",
        ],
    ),
    (
        "Executables",
        &[".exe", ".msi", ".dmg", ".deb", ".rpm", ".apk", ".appimage"],
    ),
    ("Fonts", &[".ttf", ".otf", ".woff", ".woff2"]),
];

/// Immutable mapping from category names to extensions.
///
/// The table keeps the categories in the order they were supplied. When an
/// extension appears under more than one category, the last one wins.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<(String, Vec<String>)>,
    by_extension: HashMap<String, usize>,
}

impl CategoryTable {
    /// Builds a table from `(category, extensions)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `SortError::InvalidArgument` if a category name is empty or
    /// contains a path separator, or if an extension does not start with `.`
    /// followed by at least one character.
    pub fn new<I, C, E, S>(categories: I) -> SortResult<Self>
    where
        I: IntoIterator<Item = (C, E)>,
        C: Into<String>,
        E: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self {
            categories: Vec::new(),
            by_extension: HashMap::new(),
        };

        for (name, extensions) in categories {
            let name = name.into();
            validate_category_name(&name)?;

            let extensions = extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .collect::<SortResult<Vec<_>>>()?;

            let index = table.categories.len();
            for ext in &extensions {
                table.by_extension.insert(ext.clone(), index);
            }
            table.categories.push((name, extensions));
        }

        Ok(table)
    }

    /// Resolves the category of an extension.
    ///
    /// The lookup ignores case and accepts the extension with or without its
    /// leading dot.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortium::file_category::CategoryTable;
    ///
    /// let table = CategoryTable::default();
    /// assert_eq!(table.category_for(".PDF"), "Documents");
    /// assert_eq!(table.category_for("pdf"), "Documents");
    /// assert_eq!(table.category_for(""), "Others");
    /// ```
    pub fn category_for(&self, extension: &str) -> &str {
        if extension.is_empty() || extension == "." {
            return FALLBACK_CATEGORY;
        }

        let key = if extension.starts_with('.') {
            extension.to_lowercase()
        } else {
            format!(".{}", extension.to_lowercase())
        };

        self.by_extension
            .get(&key)
            .map(|&index| self.categories[index].0.as_str())
            .unwrap_or(FALLBACK_CATEGORY)
    }

    /// Resolves the category of a file from its extension.
    pub fn category_for_path(&self, path: &Path) -> &str {
        match path.extension() {
            Some(ext) => self.category_for(&ext.to_string_lossy()),
            None => FALLBACK_CATEGORY,
        }
    }

    /// Iterates over the category names in table order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the extensions listed for `category`, if it exists.
    pub fn extensions(&self, category: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, exts)| exts.as_slice())
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        let mut table = Self {
            categories: Vec::new(),
            by_extension: HashMap::new(),
        };
        for (name, extensions) in DEFAULT_CATEGORIES {
            let index = table.categories.len();
            for ext in *extensions {
                table.by_extension.insert((*ext).to_string(), index);
            }
            table.categories.push((
                (*name).to_string(),
                extensions.iter().map(|ext| (*ext).to_string()).collect(),
            ));
        }
        table
    }
}

/// Checks that `name` can be used as a single destination folder name.
pub(crate) fn validate_category_name(name: &str) -> SortResult<()> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(SortError::InvalidArgument(format!(
            "invalid category name '{}'",
            name
        )));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(SortError::InvalidArgument(format!(
            "category name '{}' must not contain a path separator",
            name
        )));
    }
    Ok(())
}

fn normalize_extension(ext: &str) -> SortResult<String> {
    if ext.len() < 2 || !ext.starts_with('.') {
        return Err(SortError::InvalidArgument(format!(
            "extension '{}' must start with '.' followed by at least one character",
            ext
        )));
    }
    Ok(ext.to_lowercase())
}
