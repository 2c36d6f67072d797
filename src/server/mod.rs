//! Web server for browsing a CMIS repository.
//!
//! Serves a directory-style listing of the repository's folder tree
//! and streams document content on download, without ever buffering
//! whole files in memory. A session is established per request, so a
//! restarted repository never leaves the server holding stale state.

mod assets;
mod handlers;
mod routes;
mod templates;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::session::SessionBuilder;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub builder: Arc<SessionBuilder>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            builder: Arc::new(SessionBuilder::new(settings)),
        }
    }
}

/// Start the web server and block until it exits.
pub async fn serve(settings: Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
