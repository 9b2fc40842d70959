//! Archived / deleted toggles for listed entries.
//!
//! Every rendered entry carries two mutually exclusive flags. Toggling one
//! updates the entry's state (and thus its style) right away and then tells
//! the server through a [`Notifier`]. The notification is fire-and-forget:
//! whatever happens to it never feeds back into the entry.
//!
//! | Flag set before | Toggle | Result | Notification |
//! |-----------------|--------|--------|--------------|
//! | neither | archived | archived | `GET <url>` |
//! | archived | archived | neither | `GET <url>?undo` |
//! | deleted | archived | unchanged | none |
//!
//! State is kept in [`EntryStates`], keyed by entry id and owned by whatever
//! renders the listing. It is never persisted; after a reload the server's
//! listing is the truth again.
//!
//! ## Example
//!
//! ```rust,ignore
//! use mediafiler_core::toggle::{EntryFlag, EntryStates, HttpNotifier};
//!
//! let mut states = EntryStates::new(HttpNotifier::new());
//! states.render("a7k9");
//! states.toggle("a7k9", EntryFlag::Deleted, EntryFlag::Archived, "http://host:5555/delete/a7k9");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use reqwest::Client;
use tokio_util::task::TaskTracker;

use crate::action::Action;

/// Query modifier asking the server to reverse a mark.
pub const UNDO_MODIFIER: &str = "undo";

/// A boolean status attached to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryFlag {
    /// Marked for archiving
    Archived,
    /// Marked for deletion
    Deleted,
}

impl EntryFlag {
    /// The flag this one excludes.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Archived => Self::Deleted,
            Self::Deleted => Self::Archived,
        }
    }

    /// Server action this flag stands for.
    #[must_use]
    pub const fn action(self) -> Action {
        match self {
            Self::Archived => Action::Archive,
            Self::Deleted => Action::Delete,
        }
    }

    /// Style shown while this flag is set.
    #[must_use]
    pub const fn active_style(self) -> EntryStyle {
        match self {
            Self::Archived => EntryStyle::Archived,
            Self::Deleted => EntryStyle::Deleted,
        }
    }
}

impl From<Action> for EntryFlag {
    fn from(action: Action) -> Self {
        match action {
            Action::Archive => Self::Archived,
            Action::Delete => Self::Deleted,
        }
    }
}

impl fmt::Display for EntryFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Archived => f.write_str("archived"),
            Self::Deleted => f.write_str("deleted"),
        }
    }
}

/// How an entry is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryStyle {
    /// No flag set
    #[default]
    Normal,
    /// Archived flag set
    Archived,
    /// Deleted flag set
    Deleted,
}

/// Per-entry flags. Both start unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryState {
    archived: bool,
    deleted: bool,
}

impl EntryState {
    /// Whether `flag` is set.
    #[must_use]
    pub const fn is_set(&self, flag: EntryFlag) -> bool {
        match flag {
            EntryFlag::Archived => self.archived,
            EntryFlag::Deleted => self.deleted,
        }
    }

    fn set(&mut self, flag: EntryFlag, value: bool) {
        match flag {
            EntryFlag::Archived => self.archived = value,
            EntryFlag::Deleted => self.deleted = value,
        }
    }

    /// Current style.
    #[must_use]
    pub const fn style(&self) -> EntryStyle {
        if self.archived {
            EntryStyle::Archived
        } else if self.deleted {
            EntryStyle::Deleted
        } else {
            EntryStyle::Normal
        }
    }
}

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Flag was set and the plain URL notified
    Applied,
    /// Flag was cleared and the undo URL notified
    Reverted,
    /// Nothing happened: the other flag was set, or the entry is unknown
    Ignored,
}

/// Receiver of outbound notification calls.
///
/// Implementations must not block and must not report back: the caller has
/// already updated its state by the time `notify` runs.
pub trait Notifier {
    /// Dispatch a notification to `url` and return immediately.
    fn notify(&self, url: String);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, url: String) {
        (**self).notify(url);
    }
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, url: String) {
        (**self).notify(url);
    }
}

/// Sends notifications as HTTP GET requests on spawned tokio tasks.
///
/// Must be used from within a tokio runtime. The tasks are tracked so that
/// [`HttpNotifier::flush`] can let in-flight requests finish before the
/// runtime goes away; their results still never reach the entries.
#[derive(Debug, Clone, Default)]
pub struct HttpNotifier {
    client: Client,
    tasks: TaskTracker,
}

impl HttpNotifier {
    /// Create a notifier with a fresh HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::with_client(Client::new())
    }

    /// Create a notifier sharing an existing client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            tasks: TaskTracker::new(),
        }
    }

    /// Number of notifications still in flight.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Wait up to `timeout` for in-flight notifications.
    ///
    /// Returns `true` if all of them finished in time. The notifier stays
    /// usable afterwards.
    pub async fn flush(&self, timeout: Duration) -> bool {
        self.tasks.close();
        let finished = tokio::time::timeout(timeout, self.tasks.wait())
            .await
            .is_ok();
        self.tasks.reopen();
        if !finished {
            tracing::warn!("{} notifications still pending", self.tasks.len());
        }
        finished
    }
}

impl Notifier for HttpNotifier {
    fn notify(&self, url: String) {
        let client = self.client.clone();
        self.tasks.spawn(async move {
            match client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::debug!("Notified {}", url);
                }
                Ok(resp) => {
                    tracing::warn!("Notification to {} answered {}", url, resp.status());
                }
                Err(e) => {
                    tracing::warn!("Notification to {} failed: {}", url, e);
                }
            }
        });
    }
}

/// Append the undo modifier to `url`.
#[must_use]
pub fn with_undo(url: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}{UNDO_MODIFIER}")
}

/// Flags of every rendered entry, looked up by entry id.
#[derive(Debug)]
pub struct EntryStates<N> {
    entries: HashMap<String, EntryState>,
    notifier: N,
}

impl<N: Notifier> EntryStates<N> {
    /// Create an empty set of states notifying through `notifier`.
    #[must_use]
    pub fn new(notifier: N) -> Self {
        Self {
            entries: HashMap::new(),
            notifier,
        }
    }

    /// Register an entry as rendered. Flags start unset; an already rendered
    /// entry keeps its flags.
    pub fn render(&mut self, id: impl Into<String>) -> EntryState {
        *self.entries.entry(id.into()).or_default()
    }

    /// Flags of a rendered entry.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<EntryState> {
        self.entries.get(id).copied()
    }

    /// Style of a rendered entry, `Normal` if unknown.
    #[must_use]
    pub fn style(&self, id: &str) -> EntryStyle {
        self.get(id).map_or(EntryStyle::Normal, |s| s.style())
    }

    /// Drop every entry, as when the listing is reloaded.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of rendered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry is rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The notifier in use.
    #[must_use]
    pub const fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Flip `flag` on entry `id` unless `other` is set.
    ///
    /// Setting the flag notifies `notify_url`; clearing it notifies
    /// `notify_url` with the undo modifier. The state change is done before
    /// the notification is dispatched.
    pub fn toggle(
        &mut self,
        id: &str,
        flag: EntryFlag,
        other: EntryFlag,
        notify_url: &str,
    ) -> ToggleOutcome {
        let Some(state) = self.entries.get_mut(id) else {
            return ToggleOutcome::Ignored;
        };
        if state.is_set(other) {
            return ToggleOutcome::Ignored;
        }

        if state.is_set(flag) {
            state.set(flag, false);
            self.notifier.notify(with_undo(notify_url));
            ToggleOutcome::Reverted
        } else {
            state.set(flag, true);
            self.notifier.notify(notify_url.to_string());
            ToggleOutcome::Applied
        }
    }

    /// Toggle the archived flag; ignored while the entry is deleted.
    pub fn toggle_archive(&mut self, id: &str, notify_url: &str) -> ToggleOutcome {
        self.toggle(id, EntryFlag::Archived, EntryFlag::Deleted, notify_url)
    }

    /// Toggle the deleted flag; ignored while the entry is archived.
    pub fn toggle_delete(&mut self, id: &str, notify_url: &str) -> ToggleOutcome {
        self.toggle(id, EntryFlag::Deleted, EntryFlag::Archived, notify_url)
    }
}
