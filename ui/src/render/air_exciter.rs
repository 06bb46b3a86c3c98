//! Air Exciter plugin surface.

use egui::{Align2, FontId, Painter, Pos2, Rect, Stroke, Vec2, pos2, vec2};
use voxrack_types::defaults::{EQ_FREQ_MAX, EQ_FREQ_MIN};
use voxrack_types::display::FreqScale;
use voxrack_types::state::AirExciterState;

use crate::curves::freq_to_norm;
use crate::interaction::HitRegion;
use crate::theme;
use crate::widgets::{Knob, PresetBar, Taper, ValueFormat, level_meter, meter_scale};

use super::{FreqAxis, PluginRenderer, panel, title, well};

pub const KNOB_DRIVE: usize = 0;
pub const KNOB_MIX: usize = 1;
pub const KNOB_FREQ: usize = 2;

const HEADER_H: f32 = 26.0;
const PRESET_H: f32 = 18.0;
const KNOB_ROW_H: f32 = 78.0;
const METER_W: f32 = 12.0;
const SCALE_W: f32 = 26.0;
const MARGIN: f32 = 10.0;

pub struct AirExciterRenderer {
    knobs: Vec<Knob>,
    preset_bar: PresetBar,
    axis: FreqAxis,
    band_rect: Rect,
    harm_meter: Rect,
}

impl Default for AirExciterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl AirExciterRenderer {
    pub fn new() -> Self {
        Self {
            knobs: vec![
                Knob::new("DRIVE", 0.0, 1.0)
                    .with_format(ValueFormat::Percent)
                    .with_default(0.3),
                Knob::new("MIX", 0.0, 1.0)
                    .with_format(ValueFormat::Percent)
                    .with_default(0.25),
                Knob::new("FREQ", 1000.0, 16_000.0)
                    .with_taper(Taper::Log)
                    .with_format(ValueFormat::Hz)
                    .with_default(3000.0),
            ],
            preset_bar: PresetBar::new(),
            axis: FreqAxis::default(),
            band_rect: Rect::NOTHING,
            harm_meter: Rect::NOTHING,
        }
    }

    fn layout(&mut self, rect: Rect) {
        let body = Rect::from_min_max(
            rect.min + vec2(MARGIN, HEADER_H),
            rect.max - vec2(MARGIN, PRESET_H + KNOB_ROW_H + 12.0 + MARGIN),
        );

        self.harm_meter = Rect::from_min_size(
            pos2(body.max.x - METER_W, body.min.y),
            vec2(METER_W, body.height()),
        );
        self.band_rect = Rect::from_min_max(
            body.min,
            pos2(self.harm_meter.min.x - SCALE_W - 6.0, body.max.y),
        );

        let row_y = rect.max.y - PRESET_H - KNOB_ROW_H / 2.0 - 6.0;
        let count = self.knobs.len();
        let step = (rect.width() - 2.0 * MARGIN) / count as f32;
        for (i, knob) in self.knobs.iter_mut().enumerate() {
            knob.place(
                pos2(rect.min.x + MARGIN + (i as f32 + 0.5) * step, row_y),
                16.0,
            );
        }

        self.preset_bar.layout(
            Rect::from_min_size(
                pos2(rect.min.x + MARGIN, rect.max.y - PRESET_H - 4.0),
                vec2(rect.width() - 2.0 * MARGIN, PRESET_H),
            ),
            4,
        );
    }

    /// Shaded region above the corner frequency where harmonics are added.
    fn draw_band(&mut self, painter: &Painter, state: &AirExciterState) {
        well(painter, self.band_rect);
        self.axis.draw(
            painter,
            self.band_rect,
            EQ_FREQ_MIN,
            EQ_FREQ_MAX,
            FreqScale::Logarithmic,
        );

        let t = freq_to_norm(state.freq_hz, EQ_FREQ_MIN, EQ_FREQ_MAX, FreqScale::Logarithmic);
        let x = self.band_rect.min.x + t * self.band_rect.width();
        let shade = Rect::from_min_max(
            pos2(x, self.band_rect.min.y),
            self.band_rect.max,
        );
        let strength = (0.15 + 0.5 * state.drive.clamp(0.0, 1.0)).min(0.65);
        painter.rect_filled(
            shade.shrink(1.0),
            egui::CornerRadius::ZERO,
            theme::ACCENT_WARM.gamma_multiply(strength * state.mix.clamp(0.0, 1.0).max(0.2)),
        );
        painter.line_segment(
            [pos2(x, self.band_rect.min.y), pos2(x, self.band_rect.max.y)],
            Stroke::new(1.5, theme::ACCENT_WARM),
        );
    }
}

impl PluginRenderer for AirExciterRenderer {
    type State = AirExciterState;

    fn preferred_size(&self) -> Vec2 {
        vec2(380.0, 300.0)
    }

    fn render(
        &mut self,
        painter: &Painter,
        rect: Rect,
        _pixels_per_point: f32,
        state: &AirExciterState,
    ) {
        self.layout(rect);
        panel(painter, rect);
        title(painter, rect, "Air Exciter", state.bypass);

        self.draw_band(painter, state);

        let scale_rect = Rect::from_min_max(
            pos2(self.harm_meter.min.x - SCALE_W, self.harm_meter.min.y),
            pos2(self.harm_meter.min.x - 2.0, self.harm_meter.max.y),
        );
        meter_scale(painter, scale_rect);
        level_meter(painter, self.harm_meter, state.harmonics_db);
        painter.text(
            pos2(self.harm_meter.center().x, self.harm_meter.max.y + 2.0),
            Align2::CENTER_TOP,
            "HARM",
            FontId::proportional(7.0),
            theme::TEXT_DIM,
        );

        let values = [state.drive, state.mix, state.freq_hz];
        for (knob, value) in self.knobs.iter().zip(values) {
            knob.paint(painter, value, !state.bypass);
        }

        self.preset_bar.paint(painter, None, state.bypass);
    }

    fn hit_test(&self, pos: Pos2) -> HitRegion {
        for (i, knob) in self.knobs.iter().enumerate() {
            if knob.hit_test(pos) {
                return HitRegion::Knob(i);
            }
        }
        if self.band_rect.contains(pos) {
            return HitRegion::TransferCurve;
        }
        if self.harm_meter.contains(pos) {
            return HitRegion::Meter;
        }
        self.preset_bar.hit_test(pos)
    }

    fn knobs(&self) -> &[Knob] {
        &self.knobs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knob_hits_by_index() {
        let mut r = AirExciterRenderer::new();
        r.layout(Rect::from_min_size(pos2(0.0, 0.0), r.preferred_size()));

        assert_eq!(r.hit_test(r.knobs[KNOB_DRIVE].center), HitRegion::Knob(KNOB_DRIVE));
        assert_eq!(r.hit_test(r.knobs[KNOB_FREQ].center), HitRegion::Knob(KNOB_FREQ));
        assert_eq!(r.hit_test(r.band_rect.center()), HitRegion::TransferCurve);
    }
}
