//! End-to-end tests for entry toggles against a running server.

#![cfg(feature = "web")]

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::RawQuery, routing::get, Router};
use tokio::sync::Mutex;

use mediafiler_core::action::Action;
use mediafiler_core::listing;
use mediafiler_core::toggle::{
    with_undo, EntryStates, EntryStyle, HttpNotifier, Notifier, ToggleOutcome,
};

use common::{create_temp_dir, create_test_file, spawn_server, state_for, wait_for};

type Hits = Arc<Mutex<Vec<Option<String>>>>;

async fn recording_server() -> (String, Hits) {
    let hits = Hits::default();
    let recorded = hits.clone();
    let app = Router::new().route(
        "/delete/ab",
        get(move |RawQuery(q): RawQuery| {
            let recorded = recorded.clone();
            async move {
                recorded.lock().await.push(q);
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    (format!("http://{addr}/delete/ab"), hits)
}

async fn wait_for_hits(hits: &Hits, n: usize) -> Vec<Option<String>> {
    for _ in 0..100 {
        if hits.lock().await.len() >= n {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    hits.lock().await.clone()
}

#[tokio::test]
async fn test_http_notifier_hits_url() {
    let (url, hits) = recording_server().await;

    HttpNotifier::new().notify(url.clone());
    assert_eq!(wait_for_hits(&hits, 1).await, vec![None]);

    HttpNotifier::new().notify(with_undo(&url));
    assert_eq!(
        wait_for_hits(&hits, 2).await,
        vec![None, Some("undo".to_string())]
    );
}

#[tokio::test]
async fn test_http_notifier_failure_is_silent() {
    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead_url = format!("http://{}/delete/ab", closed.local_addr().unwrap());
    drop(closed);
    let (url, hits) = recording_server().await;

    let notifier = HttpNotifier::new();
    notifier.notify(dead_url);
    notifier.notify(url);

    assert_eq!(wait_for_hits(&hits, 1).await, vec![None]);
}

#[test]
fn test_flushed_notification_survives_runtime_shutdown() {
    let server_rt = tokio::runtime::Runtime::new().unwrap();
    let (url, hits) = server_rt.block_on(recording_server());

    let client_rt = tokio::runtime::Runtime::new().unwrap();
    let finished = client_rt.block_on(async {
        let notifier = HttpNotifier::new();
        notifier.notify(url);
        notifier.flush(Duration::from_secs(5)).await
    });
    drop(client_rt);

    assert!(finished);
    assert_eq!(server_rt.block_on(wait_for_hits(&hits, 1)), vec![None]);
}

#[tokio::test]
async fn test_flush_keeps_notifier_usable() {
    let (url, hits) = recording_server().await;
    let notifier = HttpNotifier::new();

    assert!(notifier.flush(Duration::from_millis(100)).await);
    notifier.notify(url);
    assert!(notifier.flush(Duration::from_secs(5)).await);
    assert_eq!(notifier.pending(), 0);
    assert_eq!(hits.lock().await.clone(), vec![None]);
}

#[tokio::test]
async fn test_toggle_delete_round_trip() {
    let tmp = create_temp_dir();
    let path = create_test_file(tmp.path(), "clip.mp4", b"video");
    let marked = Action::Delete.marked_path(&path);
    let base = spawn_server(state_for(tmp.path(), None)).await;

    let client = reqwest::Client::new();
    let remote = listing::fetch(&client, &base).await.unwrap();
    let entry = remote.files[0].clone();

    let mut states = EntryStates::new(HttpNotifier::with_client(client));
    states.render(entry.id.clone());
    let url = entry.notify_url(&base, Action::Delete);

    assert_eq!(states.toggle_delete(&entry.id, &url), ToggleOutcome::Applied);
    assert_eq!(states.style(&entry.id), EntryStyle::Deleted);
    assert!(wait_for(|| marked.exists()).await);

    assert_eq!(states.toggle_delete(&entry.id, &url), ToggleOutcome::Reverted);
    assert_eq!(states.style(&entry.id), EntryStyle::Normal);
    assert!(wait_for(|| path.exists()).await);
}

#[tokio::test]
async fn test_blocked_toggle_sends_nothing() {
    let tmp = create_temp_dir();
    let media = tmp.path().join("media");
    let path = create_test_file(&media, "clip.mp4", b"video");
    let base = spawn_server(state_for(&media, Some(tmp.path().join("archive")))).await;

    let client = reqwest::Client::new();
    let remote = listing::fetch(&client, &base).await.unwrap();
    let entry = remote.files[0].clone();

    let mut states = EntryStates::new(HttpNotifier::with_client(client));
    states.render(entry.id.clone());

    states.toggle_archive(&entry.id, &entry.notify_url(&base, Action::Archive));
    let archived = Action::Archive.marked_path(&path);
    assert!(wait_for(|| archived.exists()).await);

    let outcome = states.toggle_delete(&entry.id, &entry.notify_url(&base, Action::Delete));
    assert_eq!(outcome, ToggleOutcome::Ignored);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(archived.exists());
    assert!(!Action::Delete.marked_path(&path).exists());
}
