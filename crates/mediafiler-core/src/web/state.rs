//! Shared state for the web server.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::Mutex;

use crate::action::Action;
use crate::error::{Error, Result};
use crate::library::Library;
use crate::listing::Listing;
use crate::reaper::PendingMarks;

/// Shared state handle passed to handlers.
pub type SharedState = Arc<AppState>;

/// Everything the handlers touch.
///
/// Locks are always taken library first, then marks.
#[derive(Debug)]
pub struct AppState {
    /// Directories and current listing
    pub library: Mutex<Library>,
    /// Marks waiting for the reaper
    pub marks: Arc<Mutex<PendingMarks>>,
    /// Archive destination, `None` disables archiving
    pub archive_dir: Option<PathBuf>,
}

impl AppState {
    /// Create shared state.
    #[must_use]
    pub fn new(
        library: Library,
        marks: Arc<Mutex<PendingMarks>>,
        archive_dir: Option<PathBuf>,
    ) -> SharedState {
        Arc::new(Self {
            library: Mutex::new(library),
            marks,
            archive_dir,
        })
    }

    /// Whether archive marks are accepted.
    #[must_use]
    pub const fn archive_enabled(&self) -> bool {
        self.archive_dir.is_some()
    }

    /// Rescan and return the fresh listing.
    pub async fn refresh(&self) -> Result<Listing> {
        let mut library = self.library.lock().await;
        library.refresh()?;
        Ok(Listing::from_library(&library, self.archive_enabled()))
    }

    /// Path of a listed file.
    pub async fn path_of(&self, id: &str) -> Option<PathBuf> {
        self.library.lock().await.get(id).map(|f| f.path.clone())
    }

    /// Mark the file `id` for `action`, or undo that mark.
    ///
    /// Ids are resolved against the listing of the last refresh, so an undo
    /// works on a file that has since disappeared from a fresh scan.
    pub async fn mark(&self, action: Action, id: &str, undo: bool) -> Result<()> {
        if action == Action::Archive && !self.archive_enabled() {
            return Err(Error::ArchiveDisabled);
        }

        let library = self.library.lock().await;
        let file = library.get(id).ok_or_else(|| Error::UnknownId {
            action: action.to_string(),
            id: id.to_string(),
        })?;

        let (from, to) = action.mark(&file.path, undo)?;

        let mut marks = self.marks.lock().await;
        if undo {
            marks.forget(action, &from);
        } else {
            marks.record(action, to, SystemTime::now());
        }
        Ok(())
    }
}
