//! Dark/Light display themes.

use crate::domain::error::TickerdashError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Colours used by the page and the price chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub card: &'static str,
    pub text: &'static str,
    pub grid: &'static str,
    pub close_line: &'static str,
    pub sma_line: &'static str,
    pub ema_line: &'static str,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Dark, Theme::Light];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }

    pub fn palette(&self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: "#0e1117",
                card: "#1c1f26",
                text: "#f2f5fa",
                grid: "#283442",
                close_line: "#636efa",
                sma_line: "#ef553b",
                ema_line: "#00cc96",
            },
            Theme::Light => Palette {
                background: "#ffffff",
                card: "#f5f5f5",
                text: "#2a3f5f",
                grid: "#ebf0f8",
                close_line: "#636efa",
                sma_line: "#ef553b",
                ema_line: "#00cc96",
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = TickerdashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(TickerdashError::UnknownTheme(s.to_string())),
        }
    }
}
