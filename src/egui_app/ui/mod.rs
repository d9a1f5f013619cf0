//! egui renderer for the dashboard.

mod chart;
/// Shared colors and formatting.
pub mod style;
mod table;
mod uploads;

use std::time::{Duration, Instant};

use eframe::egui::{self, Color32, CornerRadius, Frame, Margin, RichText, Vec2};

use crate::config::Config;
use crate::egui_app::controller::EguiController;
use crate::query_cache::FetchState;

/// Smallest viewport the layout stays usable at.
pub const MIN_VIEWPORT_SIZE: Vec2 = Vec2::new(900.0, 620.0);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: EguiController,
    visuals_set: bool,
}

impl EguiApp {
    /// Create the app around the startup configuration.
    pub fn new(config: Config) -> Self {
        Self {
            controller: EguiController::new(config),
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = Color32::from_rgb(12, 12, 14);
        visuals.panel_fill = style::PANEL_FILL;
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_top_bar(&mut self, ctx: &egui::Context, now: Instant) {
        egui::TopBottomPanel::top("top_bar")
            .frame(Frame::new().fill(Color32::from_rgb(24, 24, 28)).inner_margin(Margin::same(8)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Adboard").strong().color(Color32::WHITE));
                    ui.add_space(8.0);
                    ui.separator();
                    if ui.button("Refresh").clicked() {
                        self.controller.refresh(now);
                    }
                    let toggle_label = if self.controller.ui.show_upload_cards {
                        "Hide uploads"
                    } else {
                        "Upload data"
                    };
                    if ui.button(toggle_label).clicked() {
                        self.controller.ui.show_upload_cards =
                            !self.controller.ui.show_upload_cards;
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Close").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
            });
    }

    fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .frame(Frame::new().fill(Color32::BLACK).inner_margin(Margin::same(6)))
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                ui.horizontal(|ui| {
                    ui.add_space(8.0);
                    ui.painter().circle_filled(
                        ui.cursor().min + egui::vec2(6.0, 9.0),
                        6.0,
                        style::status_badge_color(status.tone),
                    );
                    ui.add_space(16.0);
                    ui.label(
                        RichText::new(style::status_badge_label(status.tone)).color(Color32::WHITE),
                    );
                    ui.separator();
                    ui.label(RichText::new(&status.text).color(Color32::WHITE));
                });
            });
    }

    fn render_central(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_summary_cards(ui);
                ui.add_space(12.0);

                if self.controller.ui.show_upload_cards {
                    ui.heading("Upload datasets");
                    uploads::render(ui, &mut self.controller);
                    ui.add_space(12.0);
                }

                ui.heading("Entrance rate by group");
                chart::render(ui, &self.controller.group_chart());
                ui.add_space(12.0);

                ui.heading("Content leaderboard");
                table::render(ui, &mut self.controller);
            });
        });
    }

    fn render_summary_cards(&mut self, ui: &mut egui::Ui) {
        let summary = self.controller.summary();
        let loading = matches!(self.controller.performance_state(), FetchState::Loading);
        ui.horizontal(|ui| {
            summary_card(
                ui,
                "Total impressions",
                summary.map(|s| style::format_count(s.total_impressions)),
                loading,
            );
            summary_card(
                ui,
                "Avg attention rate",
                summary.map(|s| style::format_percent(s.average_attention_rate)),
                loading,
            );
            summary_card(
                ui,
                "Avg entrance rate",
                summary.map(|s| style::format_percent(s.average_entrance_rate)),
                loading,
            );
            summary_card(
                ui,
                "Records",
                summary.map(|s| s.record_count.to_string()),
                loading,
            );
        });
    }
}

/// One headline KPI card; placeholder dash until data exists.
fn summary_card(ui: &mut egui::Ui, title: &str, value: Option<String>, loading: bool) {
    egui::Frame::new()
        .fill(style::CARD_FILL)
        .inner_margin(Margin::same(10))
        .corner_radius(CornerRadius::same(4))
        .show(ui, |ui| {
            ui.set_width(170.0);
            ui.vertical(|ui| {
                ui.colored_label(style::MUTED_TEXT, title);
                match value {
                    Some(value) => {
                        ui.label(RichText::new(value).heading().color(Color32::WHITE));
                    }
                    None if loading => {
                        ui.colored_label(style::MUTED_TEXT, "Loading…");
                    }
                    None => {
                        ui.colored_label(style::MUTED_TEXT, "—");
                    }
                }
            });
        });
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.apply_visuals(ctx);
        self.controller.poll_background_jobs(now);
        self.controller.ensure_data(now);

        self.render_top_bar(ctx, now);
        self.render_status_bar(ctx);
        self.render_central(ctx);

        // Worker completions arrive between frames; keep painting while any
        // job is outstanding so results show up without user input.
        if self.controller.has_pending_work() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
