//! HTML templates using Askama, with pre-formatted view models.

use askama::Template;

use crate::adapters::chart_svg::render_price_chart;
use crate::domain::dashboard::{confidence_label, forecast_label, Dashboard, DashboardRequest};
use crate::domain::period::Period;
use crate::domain::summary::{format_volume, Direction};
use crate::domain::theme::Theme;

#[derive(Template)]
#[template(path = "base.html")]
pub struct BasePage<'a> {
    pub title: &'a str,
    pub background: &'a str,
    pub text: &'a str,
    pub content: &'a str,
}

pub fn render_page(title: &str, theme: Theme, content: &str) -> askama::Result<String> {
    let palette = theme.palette();
    BasePage {
        title,
        background: palette.background,
        text: palette.text,
        content,
    }
    .render()
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}

pub struct SelectOption {
    pub value: &'static str,
    pub selected: bool,
}

pub struct MetricsView {
    pub close: String,
    pub delta: String,
    pub direction: &'static str,
    pub open: String,
    pub high: String,
    pub volume: String,
}

pub struct RowView {
    pub date: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
    pub sma: String,
    pub ema: String,
}

pub struct NewsView {
    pub title: String,
    pub publisher: String,
    pub link: String,
}

pub struct DashboardBody {
    pub metrics: MetricsView,
    pub chart_svg: String,
    pub sma_column: String,
    pub ema_column: String,
    pub rows: Vec<RowView>,
    pub export_url: String,
    pub forecast_text: String,
    pub confidence_text: String,
    pub news: Vec<NewsView>,
}

#[derive(Template)]
#[template(path = "dashboard_content.html")]
pub struct DashboardContent {
    pub symbol: String,
    pub periods: Vec<SelectOption>,
    pub themes: Vec<SelectOption>,
    pub background: &'static str,
    pub text: &'static str,
    pub card: &'static str,
    pub error: Option<String>,
    pub body: Option<DashboardBody>,
}

impl DashboardContent {
    fn controls(request: &DashboardRequest) -> Self {
        let palette = request.theme.palette();
        Self {
            symbol: request.symbol.clone(),
            periods: Period::ALL
                .iter()
                .map(|p| SelectOption {
                    value: p.as_str(),
                    selected: *p == request.period,
                })
                .collect(),
            themes: Theme::ALL
                .iter()
                .map(|t| SelectOption {
                    value: t.as_str(),
                    selected: *t == request.theme,
                })
                .collect(),
            background: palette.background,
            text: palette.text,
            card: palette.card,
            error: None,
            body: None,
        }
    }

    /// Controls plus an error banner; nothing downstream is shown.
    pub fn failed(request: &DashboardRequest, message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::controls(request)
        }
    }

    pub fn from_dashboard(dashboard: &Dashboard) -> Self {
        let summary = &dashboard.summary;
        let metrics = MetricsView {
            close: format!("${:.2}", summary.close),
            delta: format!("{:+.2}", summary.delta),
            direction: match summary.direction() {
                Direction::Up => "up",
                Direction::Down => "down",
            },
            open: format!("${:.2}", summary.open),
            high: format!("${:.2}", summary.high),
            volume: format_volume(summary.volume),
        };

        let optional = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_default();
        let rows = dashboard
            .recent
            .iter()
            .map(|row| RowView {
                date: row.bar.date.format("%Y-%m-%d").to_string(),
                open: format!("{:.2}", row.bar.open),
                high: format!("{:.2}", row.bar.high),
                low: format!("{:.2}", row.bar.low),
                close: format!("{:.2}", row.bar.close),
                volume: format_volume(row.bar.volume),
                sma: optional(row.sma),
                ema: optional(row.ema),
            })
            .collect();

        let news = dashboard
            .news
            .iter()
            .map(|a| NewsView {
                title: a.display_title().to_string(),
                publisher: a.display_publisher().to_string(),
                link: a.display_link().to_string(),
            })
            .collect();

        let body = DashboardBody {
            metrics,
            chart_svg: render_price_chart(&dashboard.chart, dashboard.request.theme),
            sma_column: dashboard.chart.sma.indicator_type.column(),
            ema_column: dashboard.chart.ema.indicator_type.column(),
            rows,
            export_url: format!(
                "/export.csv?symbol={}&period={}",
                encode_query_value(dashboard.symbol()),
                dashboard.request.period
            ),
            forecast_text: forecast_label(dashboard.forecast),
            confidence_text: confidence_label(dashboard.confidence),
            news,
        };

        Self {
            body: Some(body),
            ..Self::controls(&dashboard.request)
        }
    }
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
pub fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_content_shows_banner_only() {
        let request = DashboardRequest::new("ZZZZ", Period::OneYear, Theme::Light);
        let html = DashboardContent::failed(&request, "invalid stock symbol or insufficient data")
            .render()
            .unwrap();
        assert!(html.contains("invalid stock symbol or insufficient data"));
        assert!(html.contains(r#"value="ZZZZ""#));
        assert!(!html.contains("Predicted Next Close"));
    }

    #[test]
    fn query_values_are_encoded() {
        assert_eq!(encode_query_value("BRK-B"), "BRK-B");
        assert_eq!(encode_query_value("^GSPC"), "%5EGSPC");
        assert_eq!(encode_query_value("A&B"), "A%26B");
    }

    #[test]
    fn page_wraps_content_with_theme_colours() {
        let html = render_page("AAPL", Theme::Light, "<div id=\"content\"></div>").unwrap();
        assert!(html.contains("<html"));
        assert!(html.contains("#ffffff"));
        assert!(html.contains("<div id=\"content\"></div>"));
    }
}
