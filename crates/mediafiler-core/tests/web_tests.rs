//! Integration tests for the web routes.

#![cfg(feature = "web")]

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use mediafiler_core::action::Action;
use mediafiler_core::listing::Listing;
use mediafiler_core::web::{router, SharedState};

use common::{create_temp_dir, create_test_file, random_bytes, state_for};

async fn get(state: &SharedState, uri: &str) -> (StatusCode, Vec<u8>) {
    let resp = router(state.clone())
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn listing(state: &SharedState) -> Listing {
    let (status, body) = get(state, "/api/files").await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_listing_and_index() {
    let tmp = create_temp_dir();
    create_test_file(tmp.path(), "one.mp4", b"1");
    create_test_file(tmp.path(), "sub/two.mkv", b"2");
    create_test_file(tmp.path(), "readme.txt", b"3");
    let state = state_for(tmp.path(), None);

    let listing = listing(&state).await;
    assert!(!listing.archive_enabled);
    let mut titles: Vec<_> = listing.files.iter().map(|f| f.title.clone()).collect();
    titles.sort();
    assert_eq!(titles, vec!["one", "two"]);

    let (status, body) = get(&state, "/").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains(">one</a>"));
    assert!(!html.contains("readme"));
}

#[tokio::test]
async fn test_serve_file() {
    let tmp = create_temp_dir();
    let content = random_bytes(4096);
    create_test_file(tmp.path(), "clip.mp4", &content);
    let state = state_for(tmp.path(), None);

    let id = listing(&state).await.files[0].id.clone();
    let (status, body) = get(&state, &format!("/f/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, content);

    let (status, _) = get(&state, "/f/ZZ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_serve_unknown_file() {
    let tmp = create_temp_dir();
    create_test_file(tmp.path(), "a.mp4", b"a");
    create_test_file(tmp.path(), "b.mp4", b"b");
    let state = state_for(tmp.path(), None);
    let listing = listing(&state).await;

    let unknown = (b'a'..=b'z')
        .map(|c| (c as char).to_string().repeat(listing.files[0].id.len()))
        .find(|cand| listing.get(cand).is_none())
        .unwrap();

    let (status, _) = get(&state, &format!("/f/{unknown}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_and_undelete() {
    let tmp = create_temp_dir();
    let path = create_test_file(tmp.path(), "clip.mp4", b"x");
    let marked = Action::Delete.marked_path(&path);
    let state = state_for(tmp.path(), None);
    let id = listing(&state).await.files[0].id.clone();

    let (status, _) = get(&state, &format!("/delete/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!path.exists());
    assert!(marked.exists());
    assert!(state.marks.lock().await.contains(Action::Delete, &marked));

    let (status, _) = get(&state, &format!("/delete/{id}?undelete")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(path.exists());
    assert!(state.marks.lock().await.is_empty());
}

#[tokio::test]
async fn test_marked_file_leaves_listing() {
    let tmp = create_temp_dir();
    create_test_file(tmp.path(), "clip.mp4", b"x");
    let state = state_for(tmp.path(), None);
    let id = listing(&state).await.files[0].id.clone();

    get(&state, &format!("/delete/{id}")).await;
    assert!(listing(&state).await.files.is_empty());
}

#[tokio::test]
async fn test_archive_requires_archive_dir() {
    let tmp = create_temp_dir();
    create_test_file(tmp.path(), "clip.mp4", b"x");
    let state = state_for(tmp.path(), None);
    let id = listing(&state).await.files[0].id.clone();

    let (status, body) = get(&state, &format!("/archive/{id}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, b"archive not supported");
}

#[tokio::test]
async fn test_archive_and_undo() {
    let tmp = create_temp_dir();
    let media = tmp.path().join("media");
    let path = create_test_file(&media, "clip.mkv", b"x");
    let state = state_for(&media, Some(tmp.path().join("archive")));
    let listing = listing(&state).await;
    assert!(listing.archive_enabled);
    let id = listing.files[0].id.clone();

    let (status, _) = get(&state, &format!("/archive/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(Action::Archive.marked_path(&path).exists());

    let (status, _) = get(&state, &format!("/archive/{id}?undo")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(path.exists());
}

#[tokio::test]
async fn test_mark_errors() {
    let tmp = create_temp_dir();
    create_test_file(tmp.path(), "clip.mp4", b"x");
    let state = state_for(tmp.path(), None);
    let id = listing(&state).await.files[0].id.clone();

    let (status, body) = get(&state, "/delete/nosuchid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(String::from_utf8(body).unwrap().contains("invalid id to delete"));

    // Undo without a prior mark has nothing to rename back.
    let (status, body) = get(&state, &format!("/delete/{id}?undo")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, b"rename error");
}

#[tokio::test]
async fn test_assets() {
    let tmp = create_temp_dir();
    let state = state_for(tmp.path(), None);

    let (status, body) = get(&state, "/asset/index.js").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(body).unwrap().contains("function toggle"));

    let (status, _) = get(&state, "/asset/missing.js").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
