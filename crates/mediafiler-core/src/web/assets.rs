//! Static file serving using rust-embed.
//!
//! The page script and stylesheet are embedded into the binary at compile
//! time and served under `/asset/`.

use axum::{
    body::Body,
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

/// Embedded static assets for the listing page.
#[derive(RustEmbed)]
#[folder = "src/web/assets/"]
#[include = "*.js"]
#[include = "*.css"]
#[include = "*.ico"]
#[include = "*.svg"]
pub struct Assets;

/// GET /asset/{*path} - Serve an embedded asset.
pub async fn serve_asset(Path(path): Path<String>) -> impl IntoResponse {
    serve_file(path.trim_start_matches('/'))
}

/// Serve a specific file from embedded assets.
fn serve_file(path: &str) -> Response {
    Assets::get(path).map_or_else(
        || (StatusCode::NOT_FOUND, "Not Found").into_response(),
        |content| {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [
                    (header::CONTENT_TYPE, mime.as_ref().to_string()),
                    (header::CACHE_CONTROL, cache_control_for(path).to_string()),
                ],
                Body::from(content.data.into_owned()),
            )
                .into_response()
        },
    )
}

/// Check if path has a specific extension (case-insensitive).
fn has_extension(path: &str, ext: &str) -> bool {
    std::path::Path::new(path)
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Get appropriate cache-control header for a file type.
fn cache_control_for(path: &str) -> &'static str {
    if has_extension(path, "js") || has_extension(path, "css") {
        "public, max-age=3600"
    } else {
        "public, max-age=86400"
    }
}

/// List all embedded assets (for debugging).
#[must_use]
pub fn list_assets() -> Vec<String> {
    Assets::iter().map(|f| f.to_string()).collect()
}
