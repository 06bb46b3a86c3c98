//! Per-plugin renderers.
//!
//! One module per plugin window. Renderers are retained objects: they own
//! their knobs, cached layers and textures, re-layout from the given rect
//! each frame, and record sub-rectangles for hit-testing.

use egui::epaint::StrokeKind;
use egui::{Align2, CornerRadius, FontId, Painter, Pos2, Rect, Stroke, Vec2, pos2};

use voxrack_types::display::FreqScale;

use crate::curves::freq_to_norm;
use crate::interaction::HitRegion;
use crate::theme;
use crate::widgets::Knob;

pub mod air_exciter;
pub mod analyzer;
pub mod compressor;
pub mod eq;
pub mod gain;
pub mod room_tone;
pub mod sidechain;
pub mod spectrograph;
pub mod spectrum;
pub mod voice_gate;

pub use air_exciter::AirExciterRenderer;
pub use analyzer::AnalyzerRenderer;
pub use compressor::CompressorRenderer;
pub use eq::EqRenderer;
pub use gain::GainRenderer;
pub use room_tone::RoomToneRenderer;
pub use sidechain::SidechainRenderer;
pub use spectrograph::SpectrographRenderer;
pub use spectrum::SpectrumRenderer;
pub use voice_gate::VoiceGateRenderer;

/// Common surface of every plugin renderer.
pub trait PluginRenderer {
    type State;

    /// Design window dimensions the host should open with.
    fn preferred_size(&self) -> Vec2;

    /// Draw the plugin surface into `rect` from the current state snapshot.
    fn render(&mut self, painter: &Painter, rect: Rect, pixels_per_point: f32, state: &Self::State);

    /// Resolve a pointer position against the rectangles recorded by the
    /// most recent `render`.
    fn hit_test(&self, pos: Pos2) -> HitRegion;

    /// Knob list, indexed by the `HitRegion::Knob` payload.
    fn knobs(&self) -> &[Knob] {
        &[]
    }
}

/// Plugin panel background.
pub(crate) fn panel(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, CornerRadius::same(4), theme::PANEL_BG);
}

/// Recessed display well with outline.
pub(crate) fn well(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, CornerRadius::same(2), theme::WELL_BG);
    painter.rect_stroke(
        rect,
        CornerRadius::same(2),
        Stroke::new(1.0, theme::OUTLINE),
        StrokeKind::Inside,
    );
}

/// Plugin title in the top-left corner.
pub(crate) fn title(painter: &Painter, rect: Rect, text: &str, bypassed: bool) {
    let color = if bypassed { theme::TEXT_DIM } else { theme::TEXT };
    painter.text(
        rect.min + egui::vec2(10.0, 6.0),
        Align2::LEFT_TOP,
        text,
        FontId::proportional(13.0),
        color,
    );
}

/// Snap a rect to the physical pixel grid so bitmap blits stay crisp.
pub(crate) fn snap_to_pixels(rect: Rect, pixels_per_point: f32) -> Rect {
    if pixels_per_point <= 0.0 {
        return rect;
    }
    let snap = |v: f32| (v * pixels_per_point).round() / pixels_per_point;
    Rect::from_min_max(
        pos2(snap(rect.min.x), snap(rect.min.y)),
        pos2(snap(rect.max.x), snap(rect.max.y)),
    )
}

const TICK_FREQS: [f32; 10] = [
    20.0, 50.0, 100.0, 200.0, 500.0, 1000.0, 2000.0, 5000.0, 10_000.0, 20_000.0,
];

pub(crate) fn tick_label(freq: f32) -> String {
    if freq >= 1000.0 {
        format!("{}k", (freq / 1000.0) as u32)
    } else {
        format!("{}", freq as u32)
    }
}

/// Cached frequency-axis tick layer. Tick positions only depend on the well
/// width, frequency range and scale, so they are recomputed only when one of
/// those changes.
#[derive(Debug, Default)]
pub(crate) struct FreqAxis {
    key: Option<(u32, u32, u32, FreqScale)>,
    /// Normalized x position and label per tick.
    ticks: Vec<(f32, String)>,
}

impl FreqAxis {
    fn rebuild(&mut self, min: f32, max: f32, scale: FreqScale) {
        self.ticks.clear();
        for &freq in &TICK_FREQS {
            if freq < min * 0.999 || freq > max * 1.001 {
                continue;
            }
            self.ticks
                .push((freq_to_norm(freq, min, max, scale), tick_label(freq)));
        }
    }

    /// Draw grid lines and labels along the bottom edge of `rect`.
    pub(crate) fn draw(&mut self, painter: &Painter, rect: Rect, min: f32, max: f32, scale: FreqScale) {
        let key = (rect.width() as u32, min as u32, max as u32, scale);
        if self.key != Some(key) {
            self.rebuild(min, max, scale);
            self.key = Some(key);
        }

        for (t, label) in &self.ticks {
            let x = rect.min.x + t * rect.width();
            painter.line_segment(
                [pos2(x, rect.min.y), pos2(x, rect.max.y)],
                Stroke::new(1.0, theme::GRID),
            );
            painter.text(
                pos2(x, rect.max.y + 2.0),
                Align2::CENTER_TOP,
                label,
                FontId::proportional(8.0),
                theme::TEXT_DIM,
            );
        }
    }
}

/// Horizontal dB grid lines inside a curve well.
pub(crate) fn db_grid(painter: &Painter, rect: Rect, marks: &[f32], min_db: f32, max_db: f32) {
    for &db in marks {
        if db < min_db || db > max_db {
            continue;
        }
        let t = (db - min_db) / (max_db - min_db);
        let y = rect.max.y - t * rect.height();
        painter.line_segment(
            [pos2(rect.min.x, y), pos2(rect.max.x, y)],
            Stroke::new(1.0, theme::GRID),
        );
        painter.text(
            pos2(rect.min.x + 2.0, y),
            Align2::LEFT_BOTTOM,
            format!("{}", db as i32),
            FontId::proportional(8.0),
            theme::TEXT_DIM,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freq_axis_cache_key_tracks_inputs() {
        let mut axis = FreqAxis::default();
        axis.rebuild(20.0, 20_000.0, FreqScale::Logarithmic);
        assert_eq!(axis.ticks.len(), TICK_FREQS.len());
        // 1 kHz sits at the middle of the 20..20k log axis (about 0.566).
        let (t, label) = axis
            .ticks
            .iter()
            .find(|(_, l)| l == "1k")
            .cloned()
            .unwrap();
        assert!((t - 0.566).abs() < 0.01, "{}", t);
        assert_eq!(label, "1k");

        axis.rebuild(100.0, 8000.0, FreqScale::Logarithmic);
        assert!(axis.ticks.iter().all(|(t, _)| (0.0..=1.0).contains(t)));
        assert!(!axis.ticks.iter().any(|(_, l)| l == "20"));
    }

    #[test]
    fn snap_is_identity_at_integer_scale() {
        let rect = Rect::from_min_max(pos2(1.0, 2.0), pos2(3.0, 4.0));
        assert_eq!(snap_to_pixels(rect, 1.0), rect);
        let snapped = snap_to_pixels(Rect::from_min_max(pos2(1.3, 2.7), pos2(3.2, 4.6)), 1.0);
        assert_eq!(snapped, Rect::from_min_max(pos2(1.0, 3.0), pos2(3.0, 5.0)));
    }
}
