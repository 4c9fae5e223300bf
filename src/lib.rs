// trendly library crate.
// Fetches the keyword feed, stores the first entries in a per-group slot, and publishes state for redraws.

pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod feed;
pub mod logging;
pub mod render;
pub mod state;
pub mod ui;
