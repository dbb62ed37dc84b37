//! Web dashboard adapter.
//!
//! Axum server with an HTMX-driven page: changing symbol, period or theme
//! re-requests `/` and swaps only the `#content` fragment.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::adapters::cached_data_port::CachedDataPort;
use crate::domain::error::TickerdashError;
use crate::domain::settings::Settings;
use crate::ports::news_port::NewsPort;

pub struct AppState {
    pub data: Arc<CachedDataPort>,
    pub news: Arc<dyn NewsPort + Send + Sync>,
    pub settings: Settings,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/export.csv", get(handlers::export_csv))
        .route("/cache/clear", post(handlers::clear_cache))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Binds the configured listen address and serves until the process exits.
pub async fn serve(state: AppState) -> Result<(), TickerdashError> {
    let addr = state.settings.listen;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "web dashboard listening");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
