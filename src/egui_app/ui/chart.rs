//! Painted bar chart of per-group average entrance rates.

use egui::{Align2, Color32, CornerRadius, FontId, Rect, Sense, Ui, pos2, vec2};

use crate::metrics::GroupAggregate;

use super::style;

const CHART_HEIGHT: f32 = 180.0;
const BAR_GAP: f32 = 12.0;
const LABEL_HEIGHT: f32 = 18.0;
const BAR_FILL: Color32 = Color32::from_rgb(80, 150, 235);

/// Draw one bar per group, tallest-first order as supplied by the metrics
/// layer, with value labels above and group names below.
pub fn render(ui: &mut Ui, aggregates: &[GroupAggregate]) {
    if aggregates.is_empty() {
        ui.colored_label(style::MUTED_TEXT, "No group data yet");
        return;
    }

    let width = ui.available_width();
    let (response, painter) = ui.allocate_painter(vec2(width, CHART_HEIGHT), Sense::hover());
    let rect = response.rect;

    let max_rate = aggregates
        .iter()
        .map(|aggregate| aggregate.average_entrance_rate)
        .fold(0.0_f64, f64::max)
        .max(1.0);

    let count = aggregates.len() as f32;
    let bar_width = ((rect.width() - BAR_GAP * (count + 1.0)) / count).min(96.0);
    let base_y = rect.bottom() - LABEL_HEIGHT;
    let usable_height = rect.height() - 2.0 * LABEL_HEIGHT;

    for (index, aggregate) in aggregates.iter().enumerate() {
        let fraction = (aggregate.average_entrance_rate / max_rate) as f32;
        let height = (usable_height * fraction).max(2.0);
        let left = rect.left() + BAR_GAP + index as f32 * (bar_width + BAR_GAP);
        let bar = Rect::from_min_max(pos2(left, base_y - height), pos2(left + bar_width, base_y));
        painter.rect_filled(bar, CornerRadius::same(2), BAR_FILL);

        painter.text(
            pos2(bar.center().x, bar.top() - 2.0),
            Align2::CENTER_BOTTOM,
            style::format_percent(aggregate.average_entrance_rate),
            FontId::proportional(11.0),
            Color32::WHITE,
        );
        painter.text(
            pos2(bar.center().x, base_y + 2.0),
            Align2::CENTER_TOP,
            truncate(&aggregate.content_group, 14),
            FontId::proportional(11.0),
            style::MUTED_TEXT,
        );
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}
