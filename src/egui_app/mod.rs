//! egui dashboard: controller, view state, and renderer.

/// Controller owning caches, workers, and UI state.
pub mod controller;
pub(crate) mod jobs;
/// View state consumed by the renderer.
pub mod state;
/// egui renderer modules.
pub mod ui;
