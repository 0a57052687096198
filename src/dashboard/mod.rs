//! Dashboard — local web form over the wager ledger.
//!
//! Serves a JSON API and a self-contained HTML page with the entry form,
//! stats, history table and bet-type chart. Bound to loopback by default.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    response::Html,
    routing::get,
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

pub use routes::{AppState, DashboardState};

/// The embedded page (compiled into the binary).
const DASHBOARD_HTML: &str = include_str!("templates/index.html");

/// Serve the web form until `shutdown` resolves.
pub async fn serve<F>(state: AppState, addr: SocketAddr, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state, addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind dashboard address {addr}"))?;
    info!(%addr, "Wager form available on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Dashboard server error")?;

    info!("Dashboard stopped");
    Ok(())
}

/// Build the Axum router with all routes and middleware.
///
/// `addr` is where the page itself is served from; cross-origin requests
/// are only honoured for that origin.
pub fn build_router(state: AppState, addr: SocketAddr) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(own_origins(addr)))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        // API routes
        .route("/api/options", get(routes::get_options))
        .route(
            "/api/wagers",
            get(routes::list_wagers)
                .post(routes::add_wager)
                .delete(routes::clear_wagers),
        )
        .route("/api/stats", get(routes::get_stats))
        .route("/api/chart", get(routes::get_chart))
        .route("/health", get(routes::health))
        // Form page
        .route("/", get(serve_dashboard))
        .layer(cors)
        .with_state(state)
}

/// Origins a browser reports for pages loaded from `addr`.
fn own_origins(addr: SocketAddr) -> Vec<HeaderValue> {
    let mut origins = vec![format!("http://{addr}")];
    if addr.ip().is_loopback() {
        origins.push(format!("http://localhost:{}", addr.port()));
    }
    origins
        .into_iter()
        .filter_map(|origin| HeaderValue::from_str(&origin).ok())
        .collect()
}

/// Serve the embedded HTML page.
async fn serve_dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
