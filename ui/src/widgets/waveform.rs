//! Min/max envelope waveform strip.

use egui::epaint::StrokeKind;
use egui::{CornerRadius, Painter, Rect, Stroke, pos2};

use crate::theme;

/// Draw a waveform from per-column min/max envelopes (-1..1). Columns beyond
/// the shorter of the two arrays are skipped, as are non-finite samples.
pub fn draw_waveform(painter: &Painter, rect: Rect, min: &[f32], max: &[f32]) {
    painter.rect_filled(rect, CornerRadius::same(2), theme::WELL_BG);

    let columns = min.len().min(max.len());
    if columns > 0 {
        let mid_y = rect.center().y;
        let half_h = rect.height() / 2.0 - 1.0;
        let step = rect.width() / columns as f32;

        // Center line
        painter.line_segment(
            [pos2(rect.min.x, mid_y), pos2(rect.max.x, mid_y)],
            Stroke::new(1.0, theme::GRID),
        );

        for i in 0..columns {
            let (lo, hi) = (min[i], max[i]);
            if !lo.is_finite() || !hi.is_finite() {
                continue;
            }
            let x = rect.min.x + (i as f32 + 0.5) * step;
            let y_top = mid_y - hi.clamp(-1.0, 1.0) * half_h;
            let y_bot = mid_y - lo.clamp(-1.0, 1.0) * half_h;
            painter.line_segment(
                [pos2(x, y_top), pos2(x, y_bot.max(y_top + 1.0))],
                Stroke::new(step.max(1.0), theme::ACCENT.gamma_multiply(0.8)),
            );
        }
    }

    painter.rect_stroke(
        rect,
        CornerRadius::same(2),
        Stroke::new(1.0, theme::OUTLINE),
        StrokeKind::Inside,
    );
}
