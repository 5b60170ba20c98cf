//! HTTP control server
//!
//! This module builds the axum router that exposes the command handler and
//! runs it until a shutdown signal arrives. Transport action routes are
//! generated from the action registry, one `PATCH /player/<name>.json` route
//! per entry.

use crate::actions::registry;
use crate::control::{ActionList, ApiError, CommandHandler, VersionResponse};
use crate::error::{BeefdeetsError, Result};
use crate::player::{AlbumCover, NowPlaying};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::Deserialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{debug, info};

/// Query string of the now-playing endpoint
#[derive(Debug, Default, Deserialize)]
pub struct NowPlayingQuery {
    /// Comma-separated field names
    pub fields: Option<String>,
}

/// HTTP server exposing the control API
pub struct ControlServer {
    /// Listen address
    addr: SocketAddr,
    /// Command handler
    handler: Arc<CommandHandler>,
}

impl ControlServer {
    /// Create a new control server
    pub fn new(addr: SocketAddr, handler: Arc<CommandHandler>) -> Self {
        Self { addr, handler }
    }

    /// Listen address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Router with every control route
    pub fn router(&self) -> Router {
        create_router(self.handler.clone())
    }

    /// Serve until Ctrl+C or SIGTERM
    pub async fn start(&self) -> Result<()> {
        self.start_with_shutdown(shutdown_signal()).await
    }

    /// Serve until `shutdown` resolves
    pub async fn start_with_shutdown<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Starting control server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await.map_err(|e| {
            BeefdeetsError::Server(format!("Failed to bind {}: {}", self.addr, e))
        })?;

        info!("Control server listening on {}", self.addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| BeefdeetsError::Server(e.to_string()))?;

        info!("Control server stopped");
        Ok(())
    }
}

/// Create the router with all routes
pub fn create_router(handler: Arc<CommandHandler>) -> Router {
    let mut router = Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/player/now_playing.json", get(now_playing))
        .route("/player/version.json", get(version))
        .route("/player/album_cover.jpg", get(album_cover))
        .route("/player/actions.json", get(actions));

    for (name, action) in registry().entries() {
        debug!("Registering route PATCH /player/{}.json", name);
        router = router.route(
            &format!("/player/{}.json", name),
            patch(move |State(handler): State<Arc<CommandHandler>>| async move {
                handler.perform(action).await
            }),
        );
    }

    router.with_state(handler)
}

/// Index page
async fn index(State(handler): State<Arc<CommandHandler>>) -> Response {
    match handler.page_title().await {
        Ok(title) => Html(format!(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body><h1>{}</h1></body>\n</html>\n",
            escape_html(&title),
            escape_html(&title)
        ))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Health check endpoint
async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn now_playing(
    State(handler): State<Arc<CommandHandler>>,
    Query(query): Query<NowPlayingQuery>,
) -> std::result::Result<Json<NowPlaying>, ApiError> {
    handler.now_playing(query.fields.as_deref()).await.map(Json)
}

async fn version(
    State(handler): State<Arc<CommandHandler>>,
) -> std::result::Result<Json<VersionResponse>, ApiError> {
    handler.version().await.map(Json)
}

async fn album_cover(State(handler): State<Arc<CommandHandler>>) -> Response {
    match handler.album_cover().await {
        Ok(cover) => cover_response(cover),
        Err(e) => e.into_response(),
    }
}

async fn actions(State(handler): State<Arc<CommandHandler>>) -> Json<ActionList> {
    Json(handler.actions())
}

/// Image response that clients must never cache
fn cover_response(cover: AlbumCover) -> Response {
    (
        [
            (header::CONTENT_TYPE, cover.mime_type),
            (
                header::CACHE_CONTROL,
                "no-store, no-cache, must-revalidate, max-age=0",
            ),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        cover.data,
    )
        .into_response()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
