//! Level, reduction and voice-activity meters.

use egui::epaint::StrokeKind;
use egui::{Align2, Color32, CornerRadius, FontId, Painter, Rect, Stroke, pos2};
use voxrack_types::defaults::{DB_CEIL, DB_FLOOR, VAD_SMOOTHING};

use crate::theme;
use crate::util::{db_to_y, level_to_color};

/// Vertical level meter: fills bottom-up from the dB floor with the shared
/// green/yellow/red gradient.
pub fn level_meter(painter: &Painter, rect: Rect, db: f32) {
    painter.rect_filled(rect, CornerRadius::same(2), theme::WELL_BG);

    let db = if db.is_finite() { db } else { DB_FLOOR };
    if db > DB_FLOOR {
        let top_y = db_to_y(db, rect.min.y, rect.max.y);
        let level = (db - DB_FLOOR) / (DB_CEIL - DB_FLOOR);
        let bar = Rect::from_min_max(pos2(rect.min.x, top_y), rect.max);
        painter.rect_filled(bar, CornerRadius::same(2), level_to_color(level));
    }

    painter.rect_stroke(
        rect,
        CornerRadius::same(2),
        Stroke::new(1.0, theme::OUTLINE),
        StrokeKind::Inside,
    );
}

/// Gain-reduction meter: fills top-down, amber, `reduction_db` is <= 0.
pub fn reduction_meter(painter: &Painter, rect: Rect, reduction_db: f32, max_reduction_db: f32) {
    painter.rect_filled(rect, CornerRadius::same(2), theme::WELL_BG);

    let reduction = if reduction_db.is_finite() {
        (-reduction_db).max(0.0)
    } else {
        0.0
    };
    let span = (-max_reduction_db).max(1.0);
    let frac = (reduction / span).clamp(0.0, 1.0);
    if frac > 0.0 {
        let bar = Rect::from_min_max(
            rect.min,
            pos2(rect.max.x, rect.min.y + rect.height() * frac),
        );
        painter.rect_filled(bar, CornerRadius::same(2), theme::ACCENT_WARM);
    }

    painter.rect_stroke(
        rect,
        CornerRadius::same(2),
        Stroke::new(1.0, theme::OUTLINE),
        StrokeKind::Inside,
    );
}

/// dB tick marks and labels beside a meter. Returns nothing; labels share
/// the `db_to_y` mapping so they line up with the bar.
pub fn meter_scale(painter: &Painter, rect: Rect) {
    let marks: &[f32] = &[6.0, 0.0, -6.0, -12.0, -20.0, -30.0, -40.0, -60.0];
    for &db in marks {
        let y = db_to_y(db, rect.min.y, rect.max.y);
        painter.line_segment(
            [pos2(rect.max.x - 3.0, y), pos2(rect.max.x, y)],
            Stroke::new(1.0, theme::TEXT_DIM),
        );
        let label = if db > 0.0 {
            format!("+{}", db as i32)
        } else {
            format!("{}", db as i32)
        };
        painter.text(
            pos2(rect.min.x, y),
            Align2::LEFT_CENTER,
            label,
            FontId::proportional(8.0),
            theme::TEXT_DIM,
        );
    }
}

/// Voice-activity meter with one-pole display smoothing. The raw probability
/// jumps around frame to frame; the smoothed value is what gets drawn.
#[derive(Debug, Default)]
pub struct VadMeter {
    smoothed: f32,
}

impl VadMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the raw detector probability for this tick.
    pub fn update(&mut self, raw: f32) {
        let raw = if raw.is_finite() {
            raw.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.smoothed += (raw - self.smoothed) * VAD_SMOOTHING;
    }

    pub fn value(&self) -> f32 {
        self.smoothed
    }

    /// Horizontal bar, two-tone: teal while the detector reports voice,
    /// dim gray otherwise.
    pub fn paint(&self, painter: &Painter, rect: Rect, detecting: bool) {
        painter.rect_filled(rect, CornerRadius::same(2), theme::WELL_BG);

        let w = rect.width() * self.smoothed.clamp(0.0, 1.0);
        if w > 0.5 {
            let bar = Rect::from_min_max(rect.min, pos2(rect.min.x + w, rect.max.y));
            let color = if detecting {
                theme::PITCH_TRACK
            } else {
                Color32::from_gray(90)
            };
            painter.rect_filled(bar, CornerRadius::same(2), color);
        }

        painter.rect_stroke(
            rect,
            CornerRadius::same(2),
            Stroke::new(1.0, theme::OUTLINE),
            StrokeKind::Inside,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vad_smoothing_approaches_target() {
        let mut meter = VadMeter::new();
        for _ in 0..60 {
            meter.update(1.0);
        }
        assert!(meter.value() > 0.99);
        for _ in 0..60 {
            meter.update(0.0);
        }
        assert!(meter.value() < 0.01);
    }

    #[test]
    fn vad_single_step_factor() {
        let mut meter = VadMeter::new();
        meter.update(1.0);
        assert!((meter.value() - VAD_SMOOTHING).abs() < 1e-6);
    }

    #[test]
    fn vad_ignores_nan() {
        let mut meter = VadMeter::new();
        meter.update(0.8);
        let before = meter.value();
        meter.update(f32::NAN);
        // NaN treated as silence, value decays rather than poisoning.
        assert!(meter.value() < before);
        assert!(meter.value().is_finite());
    }
}
