//! Library exports for reuse in integration tests.

/// Application directory resolution.
pub mod app_dirs;
/// Typed client for the KPI backend.
pub mod backend;
/// Startup configuration.
pub mod config;
/// egui dashboard modules.
pub mod egui_app;
/// Logging setup.
pub mod logging;
/// Pure KPI transforms.
pub mod metrics;
/// Domain and wire types.
pub mod model;
/// Per-query fetch cache.
pub mod query_cache;

mod http_client;
