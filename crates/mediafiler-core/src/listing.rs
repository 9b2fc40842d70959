//! The listing as exchanged over HTTP.
//!
//! The server turns its [`Library`] into a [`Listing`] for `GET /api/files`;
//! clients fetch it with [`fetch`] and build entry links and notification
//! URLs from it.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::{Error, Result};
use crate::library::Library;

/// Path of the JSON listing endpoint.
pub const LISTING_PATH: &str = "/api/files";

/// One listed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// Short id
    pub id: String,
    /// File name without extension
    pub title: String,
    /// Server-relative link to the file
    pub url: String,
    /// Last modification time
    pub modified: DateTime<Utc>,
}

impl ListingEntry {
    /// Absolute link to the file on `base`.
    #[must_use]
    pub fn link(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.url)
    }

    /// URL that marks this entry for `action` on `base`.
    #[must_use]
    pub fn notify_url(&self, base: &str, action: Action) -> String {
        format!("{}/{}/{}", base.trim_end_matches('/'), action, self.id)
    }
}

/// The whole listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Whether the server accepts archive marks
    pub archive_enabled: bool,
    /// Files, oldest first
    pub files: Vec<ListingEntry>,
}

impl Listing {
    /// Build the listing for the current state of `library`.
    #[must_use]
    pub fn from_library(library: &Library, archive_enabled: bool) -> Self {
        let files = library
            .files()
            .iter()
            .map(|f| ListingEntry {
                id: f.id.clone(),
                title: f.title(),
                url: format!("/f/{}", f.id),
                modified: DateTime::<Utc>::from(f.modified),
            })
            .collect();
        Self {
            archive_enabled,
            files,
        }
    }

    /// Find an entry by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ListingEntry> {
        self.files.iter().find(|f| f.id == id)
    }
}

/// Fetch the listing of the server at `base`.
///
/// # Errors
///
/// Returns [`Error::Http`] if the request fails or the server answers with
/// an error status.
pub async fn fetch(client: &Client, base: &str) -> Result<Listing> {
    let url = format!("{}{}", base.trim_end_matches('/'), LISTING_PATH);
    let resp = client.get(&url).send().await?;
    if !resp.status().is_success() {
        return Err(Error::Http(format!("{url} answered {}", resp.status())));
    }
    Ok(resp.json().await?)
}
