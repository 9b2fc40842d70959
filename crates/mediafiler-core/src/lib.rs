//! # Mediafiler Core Library
//!
//! `mediafiler-core` lists media files from a set of directories, serves
//! them over HTTP, and lets viewers mark entries as archived or deleted.
//! Marks are plain renames and stay reversible until the reaper finishes
//! them after a grace period.
//!
//! ## Modules
//!
//! - [`action`] - Archive / delete marks and their undo
//! - [`clipboard`] - Copying entry links through a scoped buffer
//! - [`config`] - Configuration management
//! - [`library`] - Directory scanning and file ids
//! - [`listing`] - The listing exchanged over HTTP
//! - [`reaper`] - Finishing marks after the grace period
//! - [`toggle`] - Client-side archived / deleted toggles
//! - [`web`] - Embedded web server
//!
//! ## Example
//!
//! ```rust,ignore
//! use mediafiler_core::library::{parse_suffixes, Library};
//!
//! let mut library = Library::new(vec!["/srv/videos".into()], parse_suffixes("mp4,mkv"));
//! library.refresh()?;
//! println!("{} files", library.files().len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::unused_async)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::must_use_candidate)]

use std::time::Duration;

pub mod action;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod library;
pub mod listing;
pub mod reaper;
pub mod toggle;

#[cfg(feature = "web")]
pub mod web;

pub use error::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default web server port
pub const DEFAULT_PORT: u16 = 5555;

/// Default listed suffixes
pub const DEFAULT_SUFFIXES: &str = "mp4,mkv";

/// Default time a mark stays reversible
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(11 * 60);

/// Longest accepted grace period (one year)
pub const MAX_GRACE_PERIOD: Duration = Duration::from_secs(365 * 24 * 60 * 60);
