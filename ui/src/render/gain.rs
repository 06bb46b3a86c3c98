//! Gain plugin surface.

use egui::{Align2, FontId, Painter, Pos2, Rect, Vec2, pos2, vec2};
use voxrack_types::state::GainState;

use crate::interaction::HitRegion;
use crate::theme;
use crate::widgets::{Knob, KnobStyle, PresetBar, ValueFormat, level_meter, meter_scale};

use super::{PluginRenderer, panel, title};

pub const KNOB_GAIN: usize = 0;

const HEADER_H: f32 = 26.0;
const PRESET_H: f32 = 18.0;
const METER_W: f32 = 14.0;
const SCALE_W: f32 = 26.0;
const MARGIN: f32 = 10.0;

/// Gain: one big knob, in/out meters, mute tag.
pub struct GainRenderer {
    knobs: Vec<Knob>,
    preset_bar: PresetBar,
    meter_in: Rect,
    meter_out: Rect,
}

impl Default for GainRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl GainRenderer {
    pub fn new() -> Self {
        Self {
            knobs: vec![
                Knob::new("GAIN", -24.0, 24.0)
                    .with_style(KnobStyle::Bipolar)
                    .with_format(ValueFormat::Db)
                    .with_default(0.0),
            ],
            preset_bar: PresetBar::new(),
            meter_in: Rect::NOTHING,
            meter_out: Rect::NOTHING,
        }
    }

    fn layout(&mut self, rect: Rect) {
        let body = Rect::from_min_max(
            rect.min + vec2(MARGIN, HEADER_H),
            rect.max - vec2(MARGIN, PRESET_H + MARGIN),
        );

        self.meter_out = Rect::from_min_size(
            pos2(body.max.x - METER_W, body.min.y + 4.0),
            vec2(METER_W, body.height() - 16.0),
        );
        self.meter_in = self.meter_out.translate(vec2(-(METER_W + 4.0), 0.0));

        let knob_r = (body.height() / 2.0 - 22.0).clamp(18.0, 34.0);
        let knob_x = (body.min.x + self.meter_in.min.x - SCALE_W) / 2.0;
        self.knobs[KNOB_GAIN].place(pos2(knob_x, body.center().y), knob_r);

        self.preset_bar.layout(
            Rect::from_min_size(
                pos2(rect.min.x + MARGIN, rect.max.y - PRESET_H - 4.0),
                vec2(rect.width() - 2.0 * MARGIN, PRESET_H),
            ),
            4,
        );
    }
}

impl PluginRenderer for GainRenderer {
    type State = GainState;

    fn preferred_size(&self) -> Vec2 {
        vec2(260.0, 190.0)
    }

    fn render(&mut self, painter: &Painter, rect: Rect, _pixels_per_point: f32, state: &GainState) {
        self.layout(rect);
        panel(painter, rect);
        title(painter, rect, "Gain", state.bypass);

        self.knobs[KNOB_GAIN].paint(painter, state.gain_db, !state.bypass);

        let scale_rect = Rect::from_min_max(
            pos2(self.meter_in.min.x - SCALE_W, self.meter_in.min.y),
            pos2(self.meter_in.min.x - 2.0, self.meter_in.max.y),
        );
        meter_scale(painter, scale_rect);
        level_meter(painter, self.meter_in, state.input_db);
        level_meter(painter, self.meter_out, state.output_db);
        for (label, meter) in [("IN", self.meter_in), ("OUT", self.meter_out)] {
            painter.text(
                pos2(meter.center().x, meter.max.y + 2.0),
                Align2::CENTER_TOP,
                label,
                FontId::proportional(7.0),
                theme::TEXT_DIM,
            );
        }

        if state.mute {
            painter.text(
                pos2(rect.max.x - MARGIN, rect.min.y + 8.0),
                Align2::RIGHT_TOP,
                "MUTE",
                FontId::proportional(10.0),
                theme::BYPASS,
            );
        }

        self.preset_bar.paint(painter, None, state.bypass);
    }

    fn hit_test(&self, pos: Pos2) -> HitRegion {
        if self.knobs[KNOB_GAIN].hit_test(pos) {
            return HitRegion::Knob(KNOB_GAIN);
        }
        if self.meter_in.contains(pos) || self.meter_out.contains(pos) {
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
    fn hit_test_after_layout() {
        let mut r = GainRenderer::new();
        r.layout(Rect::from_min_size(pos2(0.0, 0.0), r.preferred_size()));

        let knob = r.knobs[KNOB_GAIN].center;
        assert_eq!(r.hit_test(knob), HitRegion::Knob(KNOB_GAIN));
        assert_eq!(r.hit_test(r.meter_in.center()), HitRegion::Meter);
        assert_eq!(r.hit_test(pos2(-20.0, -20.0)), HitRegion::None);
    }
}
