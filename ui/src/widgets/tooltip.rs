//! Hover value bubble.

use egui::epaint::StrokeKind;
use egui::{Align2, CornerRadius, FontId, Painter, Pos2, Rect, Stroke, vec2};

use crate::theme;

/// Draw a small value bubble above `anchor`, clamped into `bounds`.
pub fn draw_tooltip(painter: &Painter, anchor: Pos2, bounds: Rect, text: &str) {
    let font = FontId::monospace(10.0);
    let galley = painter.layout_no_wrap(text.to_string(), font.clone(), theme::TEXT);
    let pad = vec2(6.0, 3.0);
    let size = galley.size() + pad * 2.0;

    let mut min = anchor - vec2(size.x / 2.0, size.y + 8.0);
    min.x = min.x.clamp(bounds.min.x, (bounds.max.x - size.x).max(bounds.min.x));
    min.y = min.y.max(bounds.min.y);
    let rect = Rect::from_min_size(min, size);

    painter.rect_filled(rect, CornerRadius::same(3), theme::WELL_BG.gamma_multiply(0.95));
    painter.rect_stroke(
        rect,
        CornerRadius::same(3),
        Stroke::new(1.0, theme::OUTLINE),
        StrokeKind::Inside,
    );
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        text,
        font,
        theme::TEXT,
    );
}
