//! Analyzer plugin surface: scrolling spectrogram with colorbar and level
//! readout.

use egui::{Align2, FontId, Painter, Pos2, Rect, Stroke, Vec2, pos2, vec2};
use voxrack_types::state::AnalyzerState;

use crate::interaction::HitRegion;
use crate::spectrogram::{FrameSignature, SpectrogramImage};
use crate::theme;
use crate::util::format_db;
use crate::widgets::{PresetBar, level_meter, meter_scale};

use super::{PluginRenderer, panel, snap_to_pixels, title, well};

const HEADER_H: f32 = 26.0;
const PRESET_H: f32 = 18.0;
const COLORBAR_W: f32 = 12.0;
const METER_W: f32 = 12.0;
const SCALE_W: f32 = 26.0;
const AXIS_W: f32 = 34.0;
const MARGIN: f32 = 10.0;

/// Vertical frequency ticks drawn beside the spectrogram well. The bitmap is
/// linear in bin frequency, so tick positions are linear in Hz.
const FREQ_TICKS: [f32; 5] = [1000.0, 2000.0, 5000.0, 10_000.0, 20_000.0];

pub struct AnalyzerRenderer {
    spectro: SpectrogramImage,
    spectro_rect: Rect,
    colorbar: Rect,
    meter: Rect,
    preset_bar: PresetBar,
}

impl Default for AnalyzerRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzerRenderer {
    pub fn new() -> Self {
        Self {
            spectro: SpectrogramImage::new(),
            spectro_rect: Rect::NOTHING,
            colorbar: Rect::NOTHING,
            meter: Rect::NOTHING,
            preset_bar: PresetBar::new(),
        }
    }

    /// Backing bitmap, for scenario tests.
    pub fn spectrogram(&self) -> &SpectrogramImage {
        &self.spectro
    }

    /// Frequency under a pointer position inside the spectrogram well.
    pub fn freq_at(&self, pos: Pos2, sample_rate: f32) -> Option<f32> {
        if !self.spectro_rect.contains(pos) || sample_rate <= 0.0 {
            return None;
        }
        let t = 1.0 - (pos.y - self.spectro_rect.min.y) / self.spectro_rect.height();
        Some(t.clamp(0.0, 1.0) * sample_rate / 2.0)
    }

    fn layout(&mut self, rect: Rect) {
        let body = Rect::from_min_max(
            rect.min + vec2(MARGIN, HEADER_H),
            rect.max - vec2(MARGIN, PRESET_H + MARGIN + 12.0),
        );

        self.meter = Rect::from_min_size(
            pos2(body.max.x - METER_W, body.min.y),
            vec2(METER_W, body.height()),
        );
        self.colorbar = Rect::from_min_size(
            pos2(self.meter.min.x - SCALE_W - COLORBAR_W - 6.0, body.min.y),
            vec2(COLORBAR_W, body.height()),
        );
        self.spectro_rect = Rect::from_min_max(
            pos2(body.min.x + AXIS_W, body.min.y),
            pos2(self.colorbar.min.x - 6.0, body.max.y),
        );

        self.preset_bar.layout(
            Rect::from_min_size(
                pos2(rect.min.x + MARGIN, rect.max.y - PRESET_H - 4.0),
                vec2(rect.width() - 2.0 * MARGIN, PRESET_H),
            ),
            4,
        );
    }

    fn draw_freq_axis(&self, painter: &Painter, sample_rate: f32) {
        let nyquist = if sample_rate > 0.0 {
            sample_rate / 2.0
        } else {
            24_000.0
        };
        for &freq in &FREQ_TICKS {
            if freq > nyquist {
                continue;
            }
            let y = self.spectro_rect.max.y - (freq / nyquist) * self.spectro_rect.height();
            painter.line_segment(
                [
                    pos2(self.spectro_rect.min.x - 3.0, y),
                    pos2(self.spectro_rect.min.x, y),
                ],
                Stroke::new(1.0, theme::TEXT_DIM),
            );
            painter.text(
                pos2(self.spectro_rect.min.x - 5.0, y),
                Align2::RIGHT_CENTER,
                super::tick_label(freq),
                FontId::proportional(8.0),
                theme::TEXT_DIM,
            );
        }
    }

    fn draw_colorbar(&self, painter: &Painter) {
        let steps = 32;
        let h = self.colorbar.height() / steps as f32;
        for i in 0..steps {
            let t = 1.0 - i as f32 / (steps - 1) as f32;
            let slice = Rect::from_min_size(
                pos2(self.colorbar.min.x, self.colorbar.min.y + i as f32 * h),
                vec2(self.colorbar.width(), h + 0.5),
            );
            painter.rect_filled(slice, egui::CornerRadius::ZERO, self.spectro.sample(t));
        }
        painter.rect_stroke(
            self.colorbar,
            egui::CornerRadius::ZERO,
            Stroke::new(1.0, theme::OUTLINE),
            egui::epaint::StrokeKind::Inside,
        );
    }
}

impl PluginRenderer for AnalyzerRenderer {
    type State = AnalyzerState;

    fn preferred_size(&self) -> Vec2 {
        vec2(520.0, 320.0)
    }

    fn render(&mut self, painter: &Painter, rect: Rect, pixels_per_point: f32, state: &AnalyzerState) {
        self.layout(rect);
        panel(painter, rect);
        title(painter, rect, "Analyzer", state.bypass);

        let sig = FrameSignature::of(&state.window, state.palette, state.tone);
        self.spectro.update(sig, state.window.spectrogram.as_deref());

        well(painter, self.spectro_rect);
        let blit = snap_to_pixels(self.spectro_rect.shrink(1.0), pixels_per_point);
        self.spectro.paint(painter, blit, state.bloom);

        self.draw_freq_axis(painter, state.sample_rate);
        self.draw_colorbar(painter);

        let scale_rect = Rect::from_min_max(
            pos2(self.colorbar.max.x + 4.0, self.meter.min.y),
            pos2(self.meter.min.x - 2.0, self.meter.max.y),
        );
        meter_scale(painter, scale_rect);
        level_meter(painter, self.meter, state.input_db);

        painter.text(
            pos2(rect.max.x - MARGIN, rect.min.y + 8.0),
            Align2::RIGHT_TOP,
            format_db(state.input_db),
            FontId::monospace(10.0),
            theme::TEXT,
        );

        self.preset_bar.paint(painter, None, state.bypass);
    }

    fn hit_test(&self, pos: Pos2) -> HitRegion {
        if self.spectro_rect.contains(pos) {
            return HitRegion::Spectrogram;
        }
        if self.colorbar.contains(pos) {
            return HitRegion::Colorbar;
        }
        if self.meter.contains(pos) {
            return HitRegion::Meter;
        }
        self.preset_bar.hit_test(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_hit_testing() {
        let mut r = AnalyzerRenderer::new();
        r.layout(Rect::from_min_size(pos2(0.0, 0.0), r.preferred_size()));

        assert_eq!(r.hit_test(r.spectro_rect.center()), HitRegion::Spectrogram);
        assert_eq!(r.hit_test(r.colorbar.center()), HitRegion::Colorbar);
        assert_eq!(r.hit_test(r.meter.center()), HitRegion::Meter);
        assert_eq!(r.hit_test(pos2(2.0, 2.0)), HitRegion::None);
    }

    #[test]
    fn freq_at_maps_well_height() {
        let mut r = AnalyzerRenderer::new();
        r.layout(Rect::from_min_size(pos2(0.0, 0.0), r.preferred_size()));
        let rect = r.spectro_rect;

        let top = r.freq_at(pos2(rect.center().x, rect.min.y + 0.1), 48_000.0);
        let bottom = r.freq_at(pos2(rect.center().x, rect.max.y - 0.1), 48_000.0);
        assert!(top.unwrap() > 23_900.0);
        assert!(bottom.unwrap() < 100.0);
        assert_eq!(r.freq_at(pos2(-5.0, -5.0), 48_000.0), None);
    }
}
