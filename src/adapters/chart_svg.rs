//! Inline SVG price chart: close line with SMA/EMA overlays.

use crate::domain::dashboard::ChartData;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::theme::Theme;

pub const CHART_WIDTH: f64 = 960.0;
pub const CHART_HEIGHT: f64 = 520.0;

const PAD_LEFT: f64 = 64.0;
const PAD_RIGHT: f64 = 24.0;
const PAD_TOP: f64 = 56.0;
const PAD_BOTTOM: f64 = 48.0;

struct Scale {
    min: f64,
    max: f64,
    step_x: f64,
}

impl Scale {
    fn new(chart: &ChartData) -> Self {
        let overlay = chart
            .sma
            .values
            .iter()
            .chain(chart.ema.values.iter())
            .filter_map(|p| p.get());
        let (min, max) = chart
            .close
            .iter()
            .copied()
            .chain(overlay)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let plot_width = CHART_WIDTH - PAD_LEFT - PAD_RIGHT;
        let step_x = if chart.close.len() > 1 {
            plot_width / (chart.close.len() - 1) as f64
        } else {
            0.0
        };
        Self { min, max, step_x }
    }

    fn x(&self, index: usize) -> f64 {
        PAD_LEFT + index as f64 * self.step_x
    }

    fn y(&self, value: f64) -> f64 {
        let plot_height = CHART_HEIGHT - PAD_TOP - PAD_BOTTOM;
        let range = self.max - self.min;
        if range > 0.0 {
            CHART_HEIGHT - PAD_BOTTOM - (value - self.min) / range * plot_height
        } else {
            PAD_TOP + plot_height / 2.0
        }
    }
}

fn polyline(points: &[(usize, f64)], scale: &Scale, colour: &str, dash: Option<&str>) -> String {
    let coords: Vec<String> = points
        .iter()
        .map(|&(i, v)| format!("{:.1},{:.1}", scale.x(i), scale.y(v)))
        .collect();
    let dash = dash
        .map(|d| format!(r#" stroke-dasharray="{}""#, d))
        .unwrap_or_default();
    format!(
        r#"<polyline fill="none" stroke="{}" stroke-width="2"{} points="{}"/>"#,
        colour,
        dash,
        coords.join(" ")
    )
}

fn overlay_points(series: &IndicatorSeries) -> Vec<(usize, f64)> {
    series
        .values
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.get().map(|v| (i, v)))
        .collect()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn render_price_chart(chart: &ChartData, theme: Theme) -> String {
    let palette = theme.palette();
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w:.0} {h:.0}" width="100%" height="{h:.0}" role="img" aria-label="{title}">"#,
        w = CHART_WIDTH,
        h = CHART_HEIGHT,
        title = escape(&chart.title),
    );
    svg.push_str(&format!(
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        palette.background
    ));
    svg.push_str(&format!(
        r#"<text x="{:.0}" y="32" fill="{}" font-size="20" font-family="sans-serif">{}</text>"#,
        PAD_LEFT,
        palette.text,
        escape(&chart.title)
    ));

    if chart.close.is_empty() {
        svg.push_str("</svg>");
        return svg;
    }

    let scale = Scale::new(chart);
    let bottom = CHART_HEIGHT - PAD_BOTTOM;
    let right = CHART_WIDTH - PAD_RIGHT;

    for value in [scale.max, (scale.max + scale.min) / 2.0, scale.min] {
        let y = scale.y(value);
        svg.push_str(&format!(
            r#"<line x1="{:.0}" y1="{y:.1}" x2="{:.0}" y2="{y:.1}" stroke="{}"/><text x="{:.0}" y="{:.1}" fill="{}" font-size="12" text-anchor="end" font-family="sans-serif">{:.2}</text>"#,
            PAD_LEFT,
            right,
            palette.grid,
            PAD_LEFT - 8.0,
            y + 4.0,
            palette.text,
            value,
        ));
    }

    let last = chart.dates.len().saturating_sub(1);
    for (index, anchor) in [(0, "start"), (last, "end")] {
        if let Some(date) = chart.dates.get(index) {
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.0}" fill="{}" font-size="12" text-anchor="{}" font-family="sans-serif">{}</text>"#,
                scale.x(index),
                bottom + 24.0,
                palette.text,
                anchor,
                date.format("%Y-%m-%d"),
            ));
        }
    }

    let close: Vec<(usize, f64)> = chart.close.iter().copied().enumerate().collect();
    svg.push_str(&polyline(&close, &scale, palette.close_line, None));

    let sma = overlay_points(&chart.sma);
    if !sma.is_empty() {
        svg.push_str(&polyline(&sma, &scale, palette.sma_line, Some("8 4")));
    }
    let ema = overlay_points(&chart.ema);
    if !ema.is_empty() {
        svg.push_str(&polyline(&ema, &scale, palette.ema_line, Some("2 3")));
    }

    let legend = [
        ("Close".to_string(), palette.close_line, ""),
        (chart.sma.indicator_type.label(), palette.sma_line, "8 4"),
        (chart.ema.indicator_type.label(), palette.ema_line, "2 3"),
    ];
    for (slot, (label, colour, dash)) in legend.iter().enumerate() {
        let x = right - 300.0 + slot as f64 * 100.0;
        svg.push_str(&format!(
            r#"<line x1="{:.0}" y1="28" x2="{:.0}" y2="28" stroke="{}" stroke-width="2" stroke-dasharray="{}"/><text x="{:.0}" y="32" fill="{}" font-size="12" font-family="sans-serif">{}</text>"#,
            x,
            x + 24.0,
            colour,
            dash,
            x + 30.0,
            palette.text,
            label,
        ));
    }

    svg.push_str("</svg>");
    svg
}
