//! Colors and formatting shared by the dashboard panels.

use egui::Color32;

use crate::egui_app::state::StatusTone;
use crate::model::Grade;

/// Panel background.
pub const PANEL_FILL: Color32 = Color32::from_rgb(16, 16, 18);
/// Card background.
pub const CARD_FILL: Color32 = Color32::from_rgb(26, 26, 30);
/// Muted text for captions and placeholders.
pub const MUTED_TEXT: Color32 = Color32::from_rgb(140, 140, 150);
/// Warning text for partial upload results.
pub const WARNING_TEXT: Color32 = Color32::from_rgb(230, 176, 60);
/// Error text.
pub const ERROR_TEXT: Color32 = Color32::from_rgb(235, 87, 87);

/// Badge color for one grade.
///
/// Total over the closed grade set on purpose: adding a grade must force a
/// decision here instead of falling back to a default color.
pub fn grade_color(grade: Grade) -> Color32 {
    match grade {
        Grade::S => Color32::from_rgb(255, 193, 7),
        Grade::A => Color32::from_rgb(76, 175, 80),
        Grade::B => Color32::from_rgb(66, 165, 245),
        Grade::C => Color32::from_rgb(255, 152, 0),
        Grade::D => Color32::from_rgb(239, 83, 80),
    }
}

/// Footer badge color for a status tone.
pub fn status_badge_color(tone: StatusTone) -> Color32 {
    match tone {
        StatusTone::Idle => Color32::from_rgb(120, 120, 130),
        StatusTone::Busy => Color32::from_rgb(66, 165, 245),
        StatusTone::Ok => Color32::from_rgb(76, 175, 80),
        StatusTone::Error => Color32::from_rgb(239, 83, 80),
    }
}

/// Footer badge label for a status tone.
pub fn status_badge_label(tone: StatusTone) -> &'static str {
    match tone {
        StatusTone::Idle => "Idle",
        StatusTone::Busy => "Busy",
        StatusTone::Ok => "OK",
        StatusTone::Error => "Error",
    }
}

/// Render a `[0, 100]` percentage with one decimal.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

/// Render an impression count with thousands separators.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
