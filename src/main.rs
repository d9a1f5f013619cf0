#![deny(missing_docs)]
#![deny(warnings)]

//! Entry point for the egui-based Adboard UI.

use adboard::config::Config;
use adboard::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use adboard::logging;
use eframe::egui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "Invalid configuration");
            return Err(Box::new(err));
        }
    };
    tracing::info!(base_url = %config.base_url, "Starting dashboard");

    let viewport = egui::ViewportBuilder::default()
        .with_min_inner_size(MIN_VIEWPORT_SIZE)
        .with_inner_size(egui::Vec2::new(1100.0, 760.0));
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Adboard",
        native_options,
        Box::new(move |_cc| Ok(Box::new(EguiApp::new(config)))),
    )?;
    Ok(())
}
