//! HTTP endpoint handlers for the Mediafiler web interface.

#![allow(clippy::missing_errors_doc)]

use std::collections::HashMap;
use std::fmt::Write as _;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::action::Action;
use crate::library::is_valid_id;
use crate::listing::Listing;

use super::error::{ApiError, ApiResult};
use super::state::SharedState;

// ============================================================================
// Listing
// ============================================================================

/// GET / - Rescan and render the listing page.
pub async fn index(State(state): State<SharedState>) -> ApiResult<Html<String>> {
    let listing = state.refresh().await?;
    Ok(Html(render_index(&listing)))
}

/// GET /api/files - Rescan and return the listing as JSON.
pub async fn list_files(State(state): State<SharedState>) -> ApiResult<Json<Listing>> {
    Ok(Json(state.refresh().await?))
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render the listing page.
#[must_use]
pub fn render_index(listing: &Listing) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Media</title>\n\
         <link rel=\"stylesheet\" href=\"/asset/style.css\">\n\
         </head>\n<body>\n<ul class=\"files\">\n",
    );

    for file in &listing.files {
        let id = html_escape(&file.id);
        let _ = write!(
            html,
            "<li class=\"entry\" data-id=\"{id}\">\
             <a href=\"{url}\">{title}</a>\
             <span class=\"modified\">{modified}</span>\
             <button data-op=\"copy\">copy</button>",
            url = html_escape(&file.url),
            title = html_escape(&file.title),
            modified = file.modified.format("%Y-%m-%d %H:%M"),
        );
        if listing.archive_enabled {
            html.push_str("<button data-op=\"archive\">archive</button>");
        }
        html.push_str("<button data-op=\"delete\">delete</button></li>\n");
    }

    html.push_str("</ul>\n<script src=\"/asset/index.js\"></script>\n</body>\n</html>\n");
    html
}

// ============================================================================
// Files
// ============================================================================

/// GET /f/{id} - Stream a listed file.
pub async fn serve_file(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    request: Request,
) -> ApiResult<Response> {
    if !is_valid_id(&id) {
        return Err(ApiError::bad_request("Invalid path"));
    }

    let path = state
        .path_of(&id)
        .await
        .ok_or_else(|| ApiError::not_found("Not found"))?;

    match ServeFile::new(&path).oneshot(request).await {
        Ok(resp) => Ok(resp.into_response()),
        Err(e) => Err(ApiError::internal(format!("Failed to serve file: {e}"))),
    }
}

// ============================================================================
// Marks
// ============================================================================

/// Whether the query parameters ask to reverse a mark.
fn is_undo(params: &HashMap<String, String>) -> bool {
    params.contains_key("undo") || params.contains_key("undelete")
}

async fn mark(
    state: &SharedState,
    action: Action,
    id: &str,
    params: &HashMap<String, String>,
) -> ApiResult<StatusCode> {
    state.mark(action, id, is_undo(params)).await?;
    Ok(StatusCode::OK)
}

/// GET /archive/{id} - Mark a file for archiving (`?undo` reverses).
pub async fn archive_file(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<StatusCode> {
    mark(&state, Action::Archive, &id, &params).await
}

/// GET /delete/{id} - Mark a file for deletion (`?undo` or `?undelete` reverses).
pub async fn delete_file(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<StatusCode> {
    mark(&state, Action::Delete, &id, &params).await
}
