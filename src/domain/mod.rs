//! Core domain types and logic.

pub mod confidence;
pub mod dashboard;
pub mod error;
pub mod indicator;
pub mod news;
pub mod ohlcv;
pub mod period;
pub mod settings;
pub mod summary;
pub mod theme;
pub mod trend;
