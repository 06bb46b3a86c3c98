//! Sidechain Tap plugin surface: tap gain, level and the envelope strip.

use egui::{Align2, FontId, Painter, Pos2, Rect, Vec2, pos2, vec2};
use voxrack_types::state::SidechainState;

use crate::interaction::HitRegion;
use crate::theme;
use crate::widgets::{Knob, KnobStyle, PresetBar, ValueFormat, draw_waveform, level_meter, meter_scale};

use super::{PluginRenderer, panel, title};

pub const KNOB_TAP_GAIN: usize = 0;

const HEADER_H: f32 = 26.0;
const PRESET_H: f32 = 18.0;
const STRIP_H: f32 = 64.0;
const METER_W: f32 = 12.0;
const SCALE_W: f32 = 26.0;
const MARGIN: f32 = 10.0;

pub struct SidechainRenderer {
    knobs: Vec<Knob>,
    preset_bar: PresetBar,
    strip: Rect,
    meter: Rect,
}

impl Default for SidechainRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SidechainRenderer {
    pub fn new() -> Self {
        Self {
            knobs: vec![
                Knob::new("TAP", -24.0, 24.0)
                    .with_style(KnobStyle::Bipolar)
                    .with_format(ValueFormat::Db)
                    .with_default(0.0),
            ],
            preset_bar: PresetBar::new(),
            strip: Rect::NOTHING,
            meter: Rect::NOTHING,
        }
    }

    fn layout(&mut self, rect: Rect) {
        self.strip = Rect::from_min_size(
            pos2(rect.min.x + MARGIN, rect.min.y + HEADER_H),
            vec2(rect.width() - 2.0 * MARGIN, STRIP_H),
        );

        let below = Rect::from_min_max(
            pos2(rect.min.x + MARGIN, self.strip.max.y + MARGIN),
            rect.max - vec2(MARGIN, PRESET_H + MARGIN),
        );
        self.meter = Rect::from_min_size(
            pos2(below.max.x - METER_W, below.min.y),
            vec2(METER_W, below.height()),
        );
        let knob_x = (below.min.x + self.meter.min.x - SCALE_W) / 2.0;
        self.knobs[KNOB_TAP_GAIN].place(pos2(knob_x, below.center().y), 18.0);

        self.preset_bar.layout(
            Rect::from_min_size(
                pos2(rect.min.x + MARGIN, rect.max.y - PRESET_H - 4.0),
                vec2(rect.width() - 2.0 * MARGIN, PRESET_H),
            ),
            4,
        );
    }
}

impl PluginRenderer for SidechainRenderer {
    type State = SidechainState;

    fn preferred_size(&self) -> Vec2 {
        vec2(320.0, 260.0)
    }

    fn render(
        &mut self,
        painter: &Painter,
        rect: Rect,
        _pixels_per_point: f32,
        state: &SidechainState,
    ) {
        self.layout(rect);
        panel(painter, rect);
        title(painter, rect, "Sidechain Tap", state.bypass);

        match (state.waveform_min.as_deref(), state.waveform_max.as_deref()) {
            (Some(min), Some(max)) => draw_waveform(painter, self.strip, min, max),
            _ => {
                draw_waveform(painter, self.strip, &[], &[]);
                painter.text(
                    self.strip.center(),
                    Align2::CENTER_CENTER,
                    "no signal",
                    FontId::proportional(10.0),
                    theme::TEXT_DIM,
                );
            }
        }

        let scale_rect = Rect::from_min_max(
            pos2(self.meter.min.x - SCALE_W, self.meter.min.y),
            pos2(self.meter.min.x - 2.0, self.meter.max.y),
        );
        meter_scale(painter, scale_rect);
        level_meter(painter, self.meter, state.level_db);

        self.knobs[KNOB_TAP_GAIN].paint(painter, state.tap_gain_db, !state.bypass);

        self.preset_bar.paint(painter, None, state.bypass);
    }

    fn hit_test(&self, pos: Pos2) -> HitRegion {
        if self.knobs[KNOB_TAP_GAIN].hit_test(pos) {
            return HitRegion::Knob(KNOB_TAP_GAIN);
        }
        if self.strip.contains(pos) {
            return HitRegion::WaveformStrip;
        }
        if self.meter.contains(pos) {
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
    fn strip_and_knob_hits() {
        let mut r = SidechainRenderer::new();
        r.layout(Rect::from_min_size(pos2(0.0, 0.0), r.preferred_size()));

        assert_eq!(r.hit_test(r.strip.center()), HitRegion::WaveformStrip);
        assert_eq!(
            r.hit_test(r.knobs[KNOB_TAP_GAIN].center),
            HitRegion::Knob(KNOB_TAP_GAIN)
        );
        assert_eq!(r.hit_test(r.meter.center()), HitRegion::Meter);
    }
}
