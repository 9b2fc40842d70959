//! Media library scanning.
//!
//! A [`Library`] walks its directories for files with one of the configured
//! suffixes and keeps the result as the current listing. Lookups by id only
//! see the listing produced by the most recent [`Library::refresh`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use mediafiler_core::library::{parse_suffixes, Library};
//!
//! let mut library = Library::new(vec!["/srv/videos".into()], parse_suffixes("mp4,mkv"));
//! library.refresh()?;
//! for file in library.files() {
//!     println!("{} {}", file.id, file.title());
//! }
//! ```

pub mod id;

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use walkdir::WalkDir;

use crate::error::{Error, Result};

pub use id::{file_id, is_valid_id, min_unique_prefix};

/// A listed media file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    /// Full path on disk
    pub path: PathBuf,
    /// Short id, unique within the listing
    pub id: String,
    /// Last modification time
    pub modified: SystemTime,
}

impl FileInfo {
    /// File name without its extension.
    #[must_use]
    pub fn title(&self) -> String {
        title(&self.path)
    }
}

/// File name of `path` without its extension.
#[must_use]
pub fn title(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Turn a comma separated suffix list into dotted suffixes.
///
/// `"mp4, mkv"` becomes `[".mp4", ".mkv"]`.
#[must_use]
pub fn parse_suffixes(list: &str) -> Vec<String> {
    normalize_suffixes(list.split(','))
}

/// Dot-prefix every non-empty suffix.
#[must_use]
pub fn normalize_suffixes<I, S>(suffixes: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    suffixes
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .map(|s| if s.starts_with('.') { s } else { format!(".{s}") })
        .collect()
}

/// Directories being listed and the current listing.
#[derive(Debug, Clone)]
pub struct Library {
    dirs: Vec<PathBuf>,
    suffixes: Vec<String>,
    files: Vec<FileInfo>,
}

impl Library {
    /// Create a library over `dirs`, listing files ending in one of `suffixes`.
    ///
    /// Suffixes are matched literally against the end of the path, so they
    /// normally carry their leading dot (see [`parse_suffixes`]).
    #[must_use]
    pub const fn new(dirs: Vec<PathBuf>, suffixes: Vec<String>) -> Self {
        Self {
            dirs,
            suffixes,
            files: Vec::new(),
        }
    }

    /// Directories scanned by [`Library::refresh`].
    #[must_use]
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Suffixes that select listed files.
    #[must_use]
    pub fn suffixes(&self) -> &[String] {
        &self.suffixes
    }

    /// The listing, oldest first.
    #[must_use]
    pub fn files(&self) -> &[FileInfo] {
        &self.files
    }

    /// Find a file in the current listing.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&FileInfo> {
        self.files.iter().find(|f| f.id == id)
    }

    /// Rescan all directories and replace the listing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DirectoryNotFound`] if one of the directories is gone.
    pub fn refresh(&mut self) -> Result<()> {
        let mut files = Vec::new();

        for dir in &self.dirs {
            if !dir.is_dir() {
                return Err(Error::DirectoryNotFound(dir.display().to_string()));
            }

            for entry in WalkDir::new(dir) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        tracing::warn!("Skipping unreadable entry under {}: {}", dir.display(), e);
                        continue;
                    }
                };
                if entry.file_type().is_dir() || !self.matches(entry.path()) {
                    continue;
                }

                let path = entry.into_path();
                let modified = std::fs::metadata(&path)
                    .and_then(|m| m.modified())
                    .unwrap_or(UNIX_EPOCH);
                files.push(FileInfo {
                    id: file_id(&path),
                    path,
                    modified,
                });
            }
        }

        let n = min_unique_prefix(&files.iter().map(|f| f.id.as_str()).collect::<Vec<_>>());
        for file in &mut files {
            file.id.truncate(n);
        }

        // TODO: group by parent directory before ordering by modification time
        files.sort_by_key(|f| f.modified);

        tracing::debug!("Listed {} files from {} directories", files.len(), self.dirs.len());
        self.files = files;
        Ok(())
    }

    fn matches(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.suffixes.iter().any(|sfx| path.ends_with(sfx.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str, age_secs: u64) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let file = std::fs::File::create(&path).unwrap();
        file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
            .unwrap();
        path
    }

    #[test]
    fn test_parse_suffixes() {
        assert_eq!(parse_suffixes("mp4,mkv"), vec![".mp4", ".mkv"]);
        assert_eq!(parse_suffixes(" webm , ,.avi"), vec![".webm", ".avi"]);
        assert!(parse_suffixes("").is_empty());
    }

    #[test]
    fn test_title_strips_extension() {
        assert_eq!(title(Path::new("/v/My Trip.mp4")), "My Trip");
        assert_eq!(title(Path::new("/v/clip.part.mkv")), "clip.part");
    }

    #[test]
    fn test_refresh_filters_and_sorts() {
        let tmp = TempDir::new().unwrap();
        let newest = touch(tmp.path(), "new.mp4", 10);
        let oldest = touch(tmp.path(), "nested/old.mkv", 300);
        touch(tmp.path(), "notes.txt", 20);
        touch(tmp.path(), "gone.mp4.delete", 20);

        let mut library = Library::new(vec![tmp.path().to_path_buf()], parse_suffixes("mp4,mkv"));
        library.refresh().unwrap();

        let paths: Vec<_> = library.files().iter().map(|f| f.path.clone()).collect();
        assert_eq!(paths, vec![oldest, newest]);
    }

    #[test]
    fn test_ids_are_unique_and_same_length() {
        let tmp = TempDir::new().unwrap();
        for i in 0..20 {
            touch(tmp.path(), &format!("clip{i}.mp4"), i);
        }

        let mut library = Library::new(vec![tmp.path().to_path_buf()], parse_suffixes("mp4"));
        library.refresh().unwrap();

        let files = library.files();
        let len = files[0].id.len();
        assert!(files.iter().all(|f| f.id.len() == len));
        let unique: std::collections::HashSet<_> = files.iter().map(|f| &f.id).collect();
        assert_eq!(unique.len(), files.len());

        let first = &files[0];
        assert_eq!(library.get(&first.id), Some(first));
        assert!(library.get("not-an-id").is_none());
    }

    #[test]
    fn test_refresh_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let mut library = Library::new(vec![tmp.path().join("missing")], parse_suffixes("mp4"));
        assert!(matches!(library.refresh(), Err(Error::DirectoryNotFound(_))));
    }
}
