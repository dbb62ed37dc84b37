//! HTTP request handlers for the web adapter.

use askama::Template;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::adapters::csv_adapter::{export_file_name, to_csv_bytes};
use crate::domain::dashboard::{build_dashboard, load_series, DashboardRequest};
use crate::domain::period::Period;
use crate::domain::settings::Settings;
use crate::domain::theme::Theme;

use super::templates::{render_page, DashboardContent};
use super::error::status_from_error;
use super::{is_htmx_request, AppState, WebError};

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub symbol: Option<String>,
    pub period: Option<String>,
    pub theme: Option<String>,
}

/// Fills absent query fields from the configured defaults.
pub fn resolve_request(
    settings: &Settings,
    query: &DashboardQuery,
) -> Result<DashboardRequest, WebError> {
    let defaults = &settings.defaults;
    let symbol = match query.symbol.as_deref() {
        Some(s) => s.trim().to_uppercase(),
        None => defaults.symbol.clone(),
    };
    let period = match query.period.as_deref() {
        Some(p) => p.parse::<Period>()?,
        None => defaults.period,
    };
    let theme = match query.theme.as_deref() {
        Some(t) => t.parse::<Theme>()?,
        None => defaults.theme,
    };
    Ok(DashboardRequest::new(symbol, period, theme))
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, WebError> {
    let request = resolve_request(&state.settings, &query)?;
    let options = state.settings.dashboard_options();

    let data = Arc::clone(&state.data);
    let news = Arc::clone(&state.news);
    let job = request.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        build_dashboard(data.as_ref(), news.as_ref(), &job, &options)
    })
    .await
    .map_err(|e| WebError::internal(format!("dashboard task failed: {}", e)))?;

    let (status, content) = match outcome {
        Ok(dash) => (StatusCode::OK, DashboardContent::from_dashboard(&dash)),
        Err(err) if err.is_invalid_data() || err.is_bad_symbol() => (
            status_from_error(&err),
            DashboardContent::failed(&request, err.to_string()),
        ),
        Err(err) => return Err(err.into()),
    };

    let fragment = content
        .render()
        .map_err(|e| WebError::internal(e.to_string()))?;
    // htmx 1.x only swaps 2xx/3xx responses, so the banner goes out as 200.
    if is_htmx_request(&headers) {
        return Ok(Html(fragment).into_response());
    }
    let page = render_page(&request.symbol, request.theme, &fragment)
        .map_err(|e| WebError::internal(e.to_string()))?;
    Ok((status, Html(page)).into_response())
}

pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, WebError> {
    let request = resolve_request(&state.settings, &query)?;

    let data = Arc::clone(&state.data);
    let symbol = request.symbol.clone();
    let series = tokio::task::spawn_blocking(move || {
        load_series(data.as_ref(), &symbol, request.period)
    })
    .await
    .map_err(|e| WebError::internal(format!("export task failed: {}", e)))??;

    let body = to_csv_bytes(series.bars())?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(series.symbol())
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

pub async fn clear_cache(State(state): State<Arc<AppState>>) -> StatusCode {
    state.data.clear();
    StatusCode::NO_CONTENT
}

pub async fn not_found() -> WebError {
    WebError::not_found("Page not found")
}
