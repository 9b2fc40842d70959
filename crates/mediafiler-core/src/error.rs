//! Error types for Mediafiler.
//!
//! This module provides a unified error type for all Mediafiler operations,
//! with specific error variants for different failure modes.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized `Result` type for Mediafiler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Mediafiler.
#[derive(Error, Debug)]
pub enum Error {
    /// No entry with this id in the current listing
    #[error("invalid id to {action}: {id}")]
    UnknownId {
        /// Action that was attempted
        action: String,
        /// The id that did not resolve
        id: String,
    },

    /// Archiving requested but no archive directory is configured
    #[error("archive not supported")]
    ArchiveDisabled,

    /// Renaming a file for a mark (or its undo) failed
    #[error("rename error: {from} -> {to}: {source}")]
    Rename {
        /// Source path
        from: PathBuf,
        /// Destination path
        to: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A pending archive entry is missing its marker suffix
    #[error("file {0} does not end with .archive")]
    NotArchiveMarked(PathBuf),

    /// Invalid path
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// No directory was given to serve
    #[error("no directory is specified")]
    NoDirectories,

    /// Directory not found
    #[error("directory not found: {0}")]
    DirectoryNotFound(String),

    /// Configuration file error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Invalid configuration value
    #[error("invalid configuration value for '{key}': {reason}")]
    InvalidConfig {
        /// Configuration key
        key: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Clipboard access failed
    #[error("clipboard error: {0}")]
    ClipboardError(String),

    /// Talking to a remote server failed
    #[error("http error: {0}")]
    Http(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns whether this error is caused by the request rather than the server.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownId { .. } | Self::ArchiveDisabled | Self::InvalidPath(_)
        )
    }

    /// Returns a helpful suggestion for resolving the error, if applicable.
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NoDirectories => Some(
                "Pass one or more directories to serve:\n\
                   mediafiler serve ~/Videos\n\
                 Or list them under [library] dirs in the config file",
            ),
            Self::ArchiveDisabled => Some(
                "Start the server with an archive directory:\n\
                   mediafiler serve -a /mnt/archive ~/Videos",
            ),
            Self::ClipboardError(_) => Some("Check the display server connection."),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}
