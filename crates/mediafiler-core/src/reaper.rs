//! Delayed completion of archive and delete marks.
//!
//! Marks stay reversible for a grace period. [`PendingMarks`] remembers when
//! each marked file was marked; the reaper task periodically takes the marks
//! that are older than the grace period and finishes them: deleted files are
//! removed, archived files are moved into the archive directory.
//!
//! Marked files left over from a previous run are found by [`discover`] at
//! startup and get a fresh grace period.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::sync::Mutex;
use walkdir::WalkDir;

use crate::action::Action;
use crate::error::{Error, Result};

/// Marked files waiting for their grace period to run out.
#[derive(Debug, Clone, Default)]
pub struct PendingMarks {
    archive: HashMap<PathBuf, SystemTime>,
    delete: HashMap<PathBuf, SystemTime>,
}

/// Marks whose grace period has passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DueMarks {
    /// Marked files to remove
    pub delete: Vec<PathBuf>,
    /// Marked files to move into the archive directory
    pub archive: Vec<PathBuf>,
}

impl DueMarks {
    /// Whether nothing is due.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.delete.is_empty() && self.archive.is_empty()
    }
}

impl PendingMarks {
    /// Create an empty set of marks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, action: Action) -> &HashMap<PathBuf, SystemTime> {
        match action {
            Action::Archive => &self.archive,
            Action::Delete => &self.delete,
        }
    }

    fn map_mut(&mut self, action: Action) -> &mut HashMap<PathBuf, SystemTime> {
        match action {
            Action::Archive => &mut self.archive,
            Action::Delete => &mut self.delete,
        }
    }

    /// Remember that `marked` was marked for `action` at `at`.
    pub fn record(&mut self, action: Action, marked: PathBuf, at: SystemTime) {
        self.map_mut(action).insert(marked, at);
    }

    /// Drop a mark that was undone.
    pub fn forget(&mut self, action: Action, marked: &Path) -> bool {
        self.map_mut(action).remove(marked).is_some()
    }

    /// Whether `marked` is waiting for `action`.
    #[must_use]
    pub fn contains(&self, action: Action, marked: &Path) -> bool {
        self.map(action).contains_key(marked)
    }

    /// Number of pending marks for `action`.
    #[must_use]
    pub fn count(&self, action: Action) -> usize {
        self.map(action).len()
    }

    /// Total number of pending marks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archive.len() + self.delete.len()
    }

    /// Whether no marks are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove and return every mark made before `now - grace`.
    pub fn take_due(&mut self, now: SystemTime, grace: Duration) -> DueMarks {
        let Some(cutoff) = now.checked_sub(grace) else {
            return DueMarks::default();
        };

        let take = |map: &mut HashMap<PathBuf, SystemTime>| {
            let due: Vec<PathBuf> = map
                .iter()
                .filter(|(_, at)| **at < cutoff)
                .map(|(p, _)| p.clone())
                .collect();
            for p in &due {
                map.remove(p);
            }
            due
        };

        DueMarks {
            delete: take(&mut self.delete),
            archive: take(&mut self.archive),
        }
    }
}

/// Find marked files left behind in `dirs` and treat them as marked `now`.
///
/// # Errors
///
/// Returns [`Error::DirectoryNotFound`] if one of the directories is missing.
pub fn discover(dirs: &[PathBuf], now: SystemTime) -> Result<PendingMarks> {
    let mut marks = PendingMarks::new();

    for dir in dirs {
        if !dir.is_dir() {
            return Err(Error::DirectoryNotFound(dir.display().to_string()));
        }
        for entry in WalkDir::new(dir).into_iter().filter_map(std::result::Result::ok) {
            if let Some(action) = Action::from_marked(entry.path()) {
                marks.record(action, entry.into_path(), now);
            }
        }
    }

    tracing::info!(
        "Found {} files waiting for delete, {} for archive",
        marks.count(Action::Delete),
        marks.count(Action::Archive)
    );
    Ok(marks)
}

/// What one sweep did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReapReport {
    /// Marked files removed
    pub deleted: Vec<PathBuf>,
    /// Archive destinations written
    pub archived: Vec<PathBuf>,
    /// Marked files removed because an identical-size copy was already archived
    pub already_archived: Vec<PathBuf>,
    /// Marked files left in place
    pub skipped: Vec<PathBuf>,
}

/// Finishes due marks on disk.
#[derive(Debug, Clone)]
pub struct Reaper {
    archive_dir: Option<PathBuf>,
    grace_period: Duration,
}

impl Reaper {
    /// Create a reaper archiving into `archive_dir`.
    #[must_use]
    pub const fn new(archive_dir: Option<PathBuf>, grace_period: Duration) -> Self {
        Self {
            archive_dir,
            grace_period,
        }
    }

    /// Grace period before a mark is finished.
    #[must_use]
    pub const fn grace_period(&self) -> Duration {
        self.grace_period
    }

    /// Delete and archive the given marked files.
    ///
    /// Failures are logged per file; one bad file does not stop the sweep.
    pub fn process(&self, due: DueMarks) -> ReapReport {
        let mut report = ReapReport::default();

        for path in due.delete {
            tracing::info!("delete {}", path.display());
            match std::fs::remove_file(&path) {
                Ok(()) => report.deleted.push(path),
                Err(e) => {
                    tracing::warn!("Failed to delete {}: {}", path.display(), e);
                    report.skipped.push(path);
                }
            }
        }

        for path in due.archive {
            if let Err(e) = self.archive_one(&path, &mut report) {
                tracing::warn!("Failed to archive {}: {}", path.display(), e);
                report.skipped.push(path);
            }
        }

        report
    }

    fn archive_one(&self, path: &Path, report: &mut ReapReport) -> Result<()> {
        let original = Action::Archive
            .unmarked_path(path)
            .ok_or_else(|| Error::NotArchiveMarked(path.to_path_buf()))?;
        let archive_dir = self.archive_dir.as_ref().ok_or(Error::ArchiveDisabled)?;
        let name = original
            .file_name()
            .ok_or_else(|| Error::InvalidPath(original.display().to_string()))?;
        let dst = archive_dir.join(name);

        if let Ok(existing) = std::fs::metadata(&dst) {
            let size = std::fs::metadata(path)?.len();
            if existing.len() == size {
                tracing::info!("{} is already archived", path.display());
                std::fs::remove_file(path)?;
                report.already_archived.push(path.to_path_buf());
            } else {
                tracing::warn!("Cannot archive {}, {} exists", path.display(), dst.display());
                report.skipped.push(path.to_path_buf());
            }
            return Ok(());
        }

        tracing::info!("archive to {}", dst.display());
        move_file(path, &dst)?;
        report.archived.push(dst);
        Ok(())
    }

    /// Take due marks out of `marks` and finish them.
    ///
    /// The lock is only held while taking; file system work happens after
    /// it is released.
    pub async fn sweep(&self, marks: &Mutex<PendingMarks>) -> ReapReport {
        let due = marks
            .lock()
            .await
            .take_due(SystemTime::now(), self.grace_period);
        if due.is_empty() {
            return ReapReport::default();
        }

        let reaper = self.clone();
        tokio::task::spawn_blocking(move || reaper.process(due))
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Reaper task failed: {}", e);
                ReapReport::default()
            })
    }

    /// Sweep every grace period, forever.
    ///
    /// Sweeps happen at least every [`crate::MAX_GRACE_PERIOD`], so an
    /// oversized grace period never overflows the timer.
    pub async fn run(self, marks: Arc<Mutex<PendingMarks>>) {
        let period = self.grace_period.min(crate::MAX_GRACE_PERIOD);
        let start = tokio::time::Instant::now() + period;
        let mut ticker = tokio::time::interval_at(start, period);

        loop {
            ticker.tick().await;
            let report = self.sweep(&marks).await;
            tracing::debug!(
                "Sweep done: {} deleted, {} archived, {} skipped",
                report.deleted.len(),
                report.archived.len() + report.already_archived.len(),
                report.skipped.len()
            );
        }
    }
}

/// Rename, or copy and remove when crossing file systems.
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to)?;
    std::fs::remove_file(from)?;
    Ok(())
}
