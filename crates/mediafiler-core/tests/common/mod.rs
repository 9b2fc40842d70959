//! Common test utilities for `Mediafiler` integration tests.
//!
//! This module provides shared functionality for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use mediafiler_core::library::{parse_suffixes, Library};
use mediafiler_core::reaper::PendingMarks;
use mediafiler_core::web::{self, AppState, SharedState};

/// Create a temporary directory for test files.
///
/// The directory will be automatically cleaned up when the returned
/// `TempDir` is dropped.
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Create a test file with the given content.
pub fn create_test_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Generate random bytes for testing.
pub fn random_bytes(size: usize) -> Vec<u8> {
    use rand::RngCore;
    let mut bytes = vec![0u8; size];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// Build server state listing `dir` for mp4 and mkv files.
pub fn state_for(dir: &Path, archive_dir: Option<PathBuf>) -> SharedState {
    let library = Library::new(vec![dir.to_path_buf()], parse_suffixes("mp4,mkv"));
    AppState::new(
        library,
        Arc::new(Mutex::new(PendingMarks::new())),
        archive_dir,
    )
}

/// Serve `state` on an ephemeral localhost port and return its base URL.
pub async fn spawn_server(state: SharedState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, web::router(state))
            .await
            .expect("serve");
    });
    format!("http://{addr}")
}

/// Poll `cond` until it holds or five seconds pass.
pub async fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    cond()
}
