//! Upload cards: file picker, mode toggle, result/status lines.

use std::path::PathBuf;

use egui::{CornerRadius, Margin, RichText, Ui};

use crate::egui_app::controller::EguiController;
use crate::egui_app::state::{UploadCardState, UploadFeedback};
use crate::model::{DatasetKind, UploadMode};

use super::style;

/// Render one card per dataset; returns after forwarding any picked file to
/// the controller.
pub fn render(ui: &mut Ui, controller: &mut EguiController) {
    let mut picked: Option<(DatasetKind, PathBuf)> = None;

    ui.horizontal_top(|ui| {
        for card in controller.ui.uploads.iter_mut() {
            egui::Frame::new()
                .fill(style::CARD_FILL)
                .inner_margin(Margin::same(10))
                .corner_radius(CornerRadius::same(4))
                .show(ui, |ui| {
                    ui.set_width(300.0);
                    ui.vertical(|ui| {
                        if let Some(path) = card_contents(ui, card) {
                            picked = Some((card.kind, path));
                        }
                    });
                });
        }
    });

    if let Some((kind, path)) = picked {
        controller.start_upload(kind, path);
    }
}

/// Card body; returns the picked file when the user chose one.
fn card_contents(ui: &mut Ui, card: &mut UploadCardState) -> Option<PathBuf> {
    ui.label(RichText::new(card.kind.display_name()).strong());
    status_line(ui, card);
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        ui.label("Mode:");
        ui.selectable_value(&mut card.mode, UploadMode::Replace, "Replace");
        ui.selectable_value(&mut card.mode, UploadMode::Append, "Append");
    });

    let mut picked = None;
    if card.in_flight {
        ui.colored_label(style::MUTED_TEXT, "Uploading…");
    } else if ui.button("Choose CSV file…").clicked() {
        picked = rfd::FileDialog::new()
            .add_filter("CSV files", &["csv"])
            .pick_file();
    }

    match &card.feedback {
        Some(UploadFeedback::Success(text)) => {
            ui.label(text);
        }
        Some(UploadFeedback::Warning { summary, row_errors }) => {
            ui.colored_label(style::WARNING_TEXT, summary);
            for error in row_errors.iter().take(5) {
                ui.colored_label(style::MUTED_TEXT, error);
            }
            if row_errors.len() > 5 {
                ui.colored_label(
                    style::MUTED_TEXT,
                    format!("…and {} more", row_errors.len() - 5),
                );
            }
        }
        Some(UploadFeedback::Failure(text)) => {
            ui.colored_label(style::ERROR_TEXT, text);
        }
        None => {}
    }
    picked
}

fn status_line(ui: &mut Ui, card: &UploadCardState) {
    let text = if card.status_loading && card.dataset_status.is_none() {
        "Checking dataset…".to_string()
    } else if card.status_unavailable && card.dataset_status.is_none() {
        "Dataset status unavailable".to_string()
    } else if let Some(status) = &card.dataset_status {
        match &status.last_updated_at {
            Some(updated) => format!(
                "{} rows, updated {}",
                style::format_count(status.records_count),
                updated
            ),
            None => format!("{} rows", style::format_count(status.records_count)),
        }
    } else {
        "No data uploaded yet".to_string()
    };
    ui.colored_label(style::MUTED_TEXT, text);
}
