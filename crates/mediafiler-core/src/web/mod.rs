//! Embedded web server for Mediafiler.
//!
//! ## Starting the server
//!
//! ```bash
//! mediafiler serve ~/Videos                    # Default port 5555
//! mediafiler serve -p 9000 -a /mnt/old ~/Videos
//! mediafiler serve --localhost-only ~/Videos
//! ```
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | / | Listing page |
//! | GET | /api/files | Listing as JSON |
//! | GET | /f/{id} | File content |
//! | GET | /archive/{id} | Mark for archiving (`?undo` reverses) |
//! | GET | /delete/{id} | Mark for deletion (`?undo` reverses) |
//! | GET | /asset/{path} | Page script and stylesheet |

pub mod assets;
pub mod error;
pub mod handlers;
pub mod state;

use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::error::Result;
use crate::listing::LISTING_PATH;

pub use state::{AppState, SharedState};

/// Configuration for the web server.
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Bind to localhost only
    pub localhost_only: bool,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            port: crate::DEFAULT_PORT,
            localhost_only: false,
        }
    }
}

impl From<&crate::config::WebConfig> for WebServerConfig {
    fn from(config: &crate::config::WebConfig) -> Self {
        Self {
            port: config.port,
            localhost_only: config.localhost_only,
        }
    }
}

impl WebServerConfig {
    /// Get the bind address for the server.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        if self.localhost_only {
            SocketAddr::from(([127, 0, 0, 1], self.port))
        } else {
            SocketAddr::from(([0, 0, 0, 0], self.port))
        }
    }
}

/// Build the router over `state`.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(LISTING_PATH, get(handlers::list_files))
        .route("/f/{id}", get(handlers::serve_file))
        .route("/archive/{id}", get(handlers::archive_file))
        .route("/delete/{id}", get(handlers::delete_file))
        .route("/asset/{*path}", get(assets::serve_asset))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The web server instance.
#[derive(Debug)]
pub struct WebServer {
    config: WebServerConfig,
    state: SharedState,
}

impl WebServer {
    /// Create a new web server with the given configuration.
    #[must_use]
    pub const fn new(config: WebServerConfig, state: SharedState) -> Self {
        Self { config, state }
    }

    /// Get the server configuration.
    #[must_use]
    pub const fn config(&self) -> &WebServerConfig {
        &self.config
    }

    /// Bind and serve until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Listening on http://{}", listener.local_addr()?);

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Web server stopped");
        Ok(())
    }

    /// Addresses the listing can be opened at.
    #[must_use]
    pub fn addresses(&self) -> Vec<String> {
        let mut addrs = vec![format!("http://localhost:{}", self.config.port)];
        if !self.config.localhost_only {
            if let Some(ip) = local_ip() {
                addrs.push(format!("http://{ip}:{}", self.config.port));
            }
        }
        addrs
    }
}

/// Outbound address of this host on the local network.
fn local_ip() -> Option<std::net::IpAddr> {
    let socket = std::net::UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    socket.local_addr().ok().map(|a| a.ip())
}
