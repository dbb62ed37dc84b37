//! Concrete adapter implementations for ports.

pub mod cached_data_port;
pub mod chart_svg;
pub mod csv_adapter;
pub mod file_config_adapter;
#[cfg(feature = "web")]
pub mod web;
#[cfg(feature = "yahoo")]
pub mod yahoo_adapter;
