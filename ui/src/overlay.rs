//! Render diagnostics overlay.
//!
//! Phase timings are collected during a render pass and drawn as a small
//! text block when the overlay is enabled.

use egui::epaint::StrokeKind;
use egui::{Align2, Color32, CornerRadius, FontId, Painter, Pos2, Rect, Stroke, vec2};
use instant::Instant;

use crate::theme;

/// Wall-clock timings for the phases of one render pass.
#[derive(Debug, Default)]
pub struct PhaseTimer {
    phases: Vec<(&'static str, f32)>,
}

impl PhaseTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop last frame's measurements.
    pub fn reset(&mut self) {
        self.phases.clear();
    }

    /// Run `f`, recording its wall-clock time under `name`.
    pub fn measure<R>(&mut self, name: &'static str, f: impl FnOnce() -> R) -> R {
        let start = Instant::now();
        let out = f();
        let ms = start.elapsed().as_secs_f32() * 1000.0;
        self.phases.push((name, ms));
        out
    }

    pub fn total_ms(&self) -> f32 {
        self.phases.iter().map(|(_, ms)| ms).sum()
    }

    /// Draw the timing block anchored at the top-left corner `anchor`.
    pub fn draw(&self, painter: &Painter, anchor: Pos2) {
        if self.phases.is_empty() {
            return;
        }
        let font = FontId::monospace(9.0);
        let line_h = 11.0;
        let width = 132.0;
        let rect = Rect::from_min_size(
            anchor,
            vec2(width, line_h * (self.phases.len() + 1) as f32 + 8.0),
        );

        painter.rect_filled(rect, CornerRadius::same(3), Color32::from_black_alpha(190));
        painter.rect_stroke(
            rect,
            CornerRadius::same(3),
            Stroke::new(1.0, theme::OUTLINE),
            StrokeKind::Inside,
        );

        let mut y = rect.min.y + 4.0;
        for (name, ms) in &self.phases {
            painter.text(
                egui::pos2(rect.min.x + 6.0, y),
                Align2::LEFT_TOP,
                format!("{:<10} {:>6.2} ms", name, ms),
                font.clone(),
                theme::TEXT_DIM,
            );
            y += line_h;
        }
        painter.text(
            egui::pos2(rect.min.x + 6.0, y),
            Align2::LEFT_TOP,
            format!("{:<10} {:>6.2} ms", "total", self.total_ms()),
            font,
            theme::TEXT,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_records_and_passes_through() {
        let mut timer = PhaseTimer::new();
        let out = timer.measure("work", || 7);
        assert_eq!(out, 7);
        assert_eq!(timer.phases.len(), 1);
        assert_eq!(timer.phases[0].0, "work");
        assert!(timer.phases[0].1 >= 0.0);

        timer.reset();
        assert!(timer.phases.is_empty());
        assert_eq!(timer.total_ms(), 0.0);
    }
}
