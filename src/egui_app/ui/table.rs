//! Sortable leaderboard table of performance records.

use egui::{Color32, CornerRadius, RichText, Ui};

use crate::backend::SortDirection;
use crate::egui_app::controller::EguiController;
use crate::metrics::SortKey;
use crate::model::PerformanceRecord;

use super::style;

/// Render the leaderboard; header clicks re-sort via the controller.
pub fn render(ui: &mut Ui, controller: &mut EguiController) {
    let rows = controller.sorted_records();
    if rows.is_empty() {
        ui.colored_label(style::MUTED_TEXT, "No performance records loaded");
        return;
    }

    let sort = controller.ui.sort;
    let mut clicked: Option<SortKey> = None;

    egui::ScrollArea::vertical().max_height(320.0).show(ui, |ui| {
        egui::Grid::new("leaderboard")
            .striped(true)
            .min_col_width(72.0)
            .show(ui, |ui| {
                for key in SortKey::ALL {
                    let marker = if sort.key == key {
                        match sort.direction {
                            SortDirection::Ascending => " ▲",
                            SortDirection::Descending => " ▼",
                        }
                    } else {
                        ""
                    };
                    let label = format!("{}{marker}", key.column_title());
                    if ui.button(RichText::new(label).strong()).clicked() {
                        clicked = Some(key);
                    }
                }
                ui.end_row();

                for record in &rows {
                    row(ui, record);
                    ui.end_row();
                }
            });
    });

    if let Some(key) = clicked {
        controller.ui.toggle_sort(key);
    }
}

fn row(ui: &mut Ui, record: &PerformanceRecord) {
    ui.label(&record.content_id);
    ui.label(&record.title);
    ui.label(&record.content_group);
    ui.label(style::format_count(record.total_impressions));
    ui.label(style::format_percent(record.attention_rate * 100.0));
    ui.label(style::format_percent(record.entrance_rate * 100.0));
    grade_badge(ui, record);
}

fn grade_badge(ui: &mut Ui, record: &PerformanceRecord) {
    let grade = record.performance_grade;
    let text = RichText::new(format!(" {} ", grade.label()))
        .color(Color32::BLACK)
        .strong();
    egui::Frame::new()
        .fill(style::grade_color(grade))
        .corner_radius(CornerRadius::same(3))
        .show(ui, |ui| {
            ui.label(text);
        });
}
