//! Reversible archive and delete marks.
//!
//! Marking a file renames it to `<file>.<action>`, which takes it out of the
//! listing immediately while keeping it recoverable. Undoing renames it back.
//! The reaper later finishes the action for marks that were not undone.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What a mark will eventually do to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Move into the archive directory
    Archive,
    /// Remove from disk
    Delete,
}

impl Action {
    /// Both actions.
    pub const ALL: [Self; 2] = [Self::Archive, Self::Delete];

    /// Lowercase name, also used in URLs and marker suffixes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Delete => "delete",
        }
    }

    /// Suffix appended to a marked file, including the dot.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Archive => ".archive",
            Self::Delete => ".delete",
        }
    }

    /// Path a file gets while marked.
    #[must_use]
    pub fn marked_path(self, path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_owned();
        name.push(self.marker());
        PathBuf::from(name)
    }

    /// Which action a marked path belongs to, if any.
    #[must_use]
    pub fn from_marked(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "archive" => Some(Self::Archive),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Original path of a marked file.
    #[must_use]
    pub fn unmarked_path(self, marked: &Path) -> Option<PathBuf> {
        marked
            .to_str()?
            .strip_suffix(self.marker())
            .map(PathBuf::from)
    }

    /// Rename `path` to its marked name, or back when `undo` is set.
    ///
    /// `path` is always the unmarked file name. Returns `(from, to)` as
    /// renamed on disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rename`] if the rename fails.
    pub fn mark(self, path: &Path, undo: bool) -> Result<(PathBuf, PathBuf)> {
        let mut from = path.to_path_buf();
        let mut to = self.marked_path(path);
        if undo {
            std::mem::swap(&mut from, &mut to);
        }

        std::fs::rename(&from, &to).map_err(|source| Error::Rename {
            from: from.clone(),
            to: to.clone(),
            source,
        })?;

        tracing::info!("{} {} -> {}", self.verb(undo), from.display(), to.display());
        Ok((from, to))
    }

    const fn verb(self, undo: bool) -> &'static str {
        match (self, undo) {
            (Self::Archive, false) => "archive",
            (Self::Archive, true) => "unarchive",
            (Self::Delete, false) => "delete",
            (Self::Delete, true) => "undelete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
