#![cfg(feature = "web")]
//! Web handler integration tests.
//!
//! Tests cover:
//! - Dashboard renders metrics, chart, table, forecast and news
//! - HTMX fragment vs full page responses
//! - Invalid symbol banner with 422 (200 for HTMX fragments), bad period/theme with 400
//! - CSV download headers and body
//! - Cache clearing and 404 fallback

mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tickerdash::adapters::cached_data_port::CachedDataPort;
use tickerdash::adapters::csv_adapter::read_csv;
use tickerdash::adapters::file_config_adapter::FileConfigAdapter;
use tickerdash::adapters::web::{build_router, AppState};
use tickerdash::domain::settings::Settings;
use tower::ServiceExt;

use common::*;

struct TestApp {
    router: Router,
    calls: Arc<AtomicUsize>,
}

fn create_test_app_with(ini: &str, news: MockNewsPort) -> TestApp {
    let port = MockDataPort::new()
        .with_bars("AAPL", generate_bars("2024-01-01", 60, 180.0))
        .with_bars("TINY", generate_bars("2024-01-01", 1, 5.0));
    let calls = port.call_counter();
    let settings = Settings::from_config(&FileConfigAdapter::from_string(ini).unwrap()).unwrap();

    let state = AppState {
        data: Arc::new(CachedDataPort::new(Box::new(port), Duration::from_secs(600))),
        news: Arc::new(news),
        settings,
    };
    TestApp {
        router: build_router(state),
        calls,
    }
}

fn create_test_app() -> TestApp {
    create_test_app_with("", MockNewsPort::with_headlines(3))
}

async fn get(router: Router, uri: &str, htmx: bool) -> (StatusCode, String) {
    let mut builder = Request::builder().uri(uri);
    if htmx {
        builder = builder.header("HX-Request", "true");
    }
    let response = router
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).into_owned())
}

mod dashboard_tests {
    use super::*;

    #[tokio::test]
    async fn default_symbol_renders_full_page() {
        let app = create_test_app();
        let (status, html) = get(app.router, "/", false).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("id=\"content\""));
        assert!(html.contains("AAPL Price Chart"));
        assert!(html.contains("<svg"));
        assert!(html.contains("Predicted Next Close: $"));
        assert!(html.contains("Model Confidence: "));
        assert!(html.contains("SMA_20"));
        assert!(html.contains("Headline 1"));
    }

    #[tokio::test]
    async fn htmx_request_returns_fragment_only() {
        let app = create_test_app();
        let (status, html) = get(app.router, "/?symbol=aapl&period=1y&theme=Light", true).await;

        assert_eq!(status, StatusCode::OK);
        assert!(!html.contains("<html"));
        assert!(html.trim_start().starts_with("<div id=\"content\""));
        assert!(html.contains("#ffffff"));
        assert!(html.contains("<option value=\"1y\" selected>"));
    }

    #[tokio::test]
    async fn recent_table_has_twenty_five_rows() {
        let app = create_test_app();
        let (_, html) = get(app.router, "/?symbol=AAPL", true).await;
        assert_eq!(html.matches("<tr><td>2024-").count(), 25);
    }

    #[tokio::test]
    async fn unknown_symbol_shows_banner_with_422() {
        let app = create_test_app();
        let (status, html) = get(app.router, "/?symbol=ZZZZ", false).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(html.contains("invalid stock symbol or insufficient data"));
        assert!(!html.contains("Predicted Next Close"));
        assert!(!html.contains("<svg"));
    }

    #[tokio::test]
    async fn single_bar_shows_banner_with_422() {
        let app = create_test_app();
        let (status, html) = get(app.router, "/?symbol=tiny", false).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(html.contains("role=\"alert\""));
    }

    #[tokio::test]
    async fn htmx_invalid_symbol_fragment_is_swappable() {
        let app = create_test_app();
        let (status, html) = get(app.router, "/?symbol=ZZZZ", true).await;

        assert!(status.is_success(), "htmx drops {} responses", status);
        assert!(html.trim_start().starts_with("<div id=\"content\""));
        assert!(html.contains("invalid stock symbol or insufficient data"));
        assert!(!html.contains("<svg"));
        assert!(!html.contains("Predicted Next Close"));
    }

    #[tokio::test]
    async fn path_like_symbol_is_rejected_without_fetching() {
        let app = create_test_app();
        let (status, html) = get(app.router.clone(), "/?symbol=..%2Fsecret", false).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(html.contains("invalid stock symbol"));

        let (status, _) = get(app.router, "/export.csv?symbol=..%2Fsecret", false).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(app.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_period_is_bad_request() {
        let app = create_test_app();
        let (status, html) = get(app.router, "/?symbol=AAPL&period=7d", false).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(html.contains("7d"));
    }

    #[tokio::test]
    async fn unknown_theme_is_bad_request() {
        let app = create_test_app();
        let (status, _) = get(app.router, "/?theme=solarized", false).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn empty_news_shows_notice() {
        let app = create_test_app_with("", MockNewsPort::empty());
        let (_, html) = get(app.router, "/", true).await;
        assert!(html.contains("No recent news available."));
    }

    #[tokio::test]
    async fn configured_defaults_are_used() {
        let app = create_test_app_with(
            "[web]\ndefault_symbol = tiny\ndefault_theme = light\n",
            MockNewsPort::empty(),
        );
        let (status, html) = get(app.router, "/", false).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(html.contains("value=\"TINY\""));
    }
}

mod export_tests {
    use super::*;

    #[tokio::test]
    async fn export_returns_csv_attachment() {
        let app = create_test_app();
        let response = app
            .router
            .oneshot(
                Request::builder()
                    .uri("/export.csv?symbol=aapl&period=5y")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"AAPL_data.csv\""
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.starts_with(b"Date,Open,High,Low,Close,Volume\n"));
        let rows = read_csv(&body[..]).unwrap();
        assert_eq!(rows, generate_bars("2024-01-01", 60, 180.0));
    }

    #[tokio::test]
    async fn export_of_unknown_symbol_is_unprocessable() {
        let app = create_test_app();
        let (status, _) = get(app.router, "/export.csv?symbol=ZZZZ", false).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}

mod cache_tests {
    use super::*;

    #[tokio::test]
    async fn repeated_views_fetch_once_until_cleared() {
        let app = create_test_app();

        get(app.router.clone(), "/?symbol=AAPL&theme=Dark", true).await;
        get(app.router.clone(), "/?symbol=AAPL&theme=Light", true).await;
        assert_eq!(app.calls.load(Ordering::SeqCst), 1);

        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/cache/clear")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        get(app.router, "/?symbol=AAPL", true).await;
        assert_eq!(app.calls.load(Ordering::SeqCst), 2);
    }
}

mod fallback_tests {
    use super::*;

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = create_test_app();
        let (status, html) = get(app.router, "/reports/1", false).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(html.contains("Page not found"));
    }
}
