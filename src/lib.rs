//! Trendcast: directional price predictions served from a pretrained sequence model.

pub mod config;
pub mod core;
pub mod inference;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
