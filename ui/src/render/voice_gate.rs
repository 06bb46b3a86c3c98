//! Voice Gate plugin surface: input meter with threshold marker, open/closed
//! lamp and the voice-activity bar.

use egui::{Align2, FontId, Painter, Pos2, Rect, Stroke, Vec2, pos2, vec2};
use voxrack_types::defaults::{DB_CEIL, DB_FLOOR};
use voxrack_types::state::VoiceGateState;

use crate::curves::gate_transfer_db;
use crate::interaction::HitRegion;
use crate::theme;
use crate::util::db_to_y;
use crate::widgets::{
    GateLight, Knob, KnobStyle, PresetBar, Taper, ValueFormat, VadMeter, level_meter, meter_scale,
    reduction_meter,
};

use super::{PluginRenderer, db_grid, panel, title, well};

pub const KNOB_THRESHOLD: usize = 0;
pub const KNOB_ATTACK: usize = 1;
pub const KNOB_RELEASE: usize = 2;
pub const KNOB_RANGE: usize = 3;

const HEADER_H: f32 = 26.0;
const PRESET_H: f32 = 18.0;
const KNOB_ROW_H: f32 = 78.0;
const METER_W: f32 = 14.0;
const SCALE_W: f32 = 26.0;
const VAD_H: f32 = 12.0;
const MARGIN: f32 = 10.0;
const CURVE_SAMPLES: usize = 96;

pub struct VoiceGateRenderer {
    knobs: Vec<Knob>,
    preset_bar: PresetBar,
    light: GateLight,
    vad: VadMeter,
    curve_rect: Rect,
    in_meter: Rect,
    gr_meter: Rect,
    vad_rect: Rect,
    lamp_center: Pos2,
    lamp_radius: f32,
}

impl Default for VoiceGateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceGateRenderer {
    pub fn new() -> Self {
        Self {
            knobs: vec![
                Knob::new("THRESH", -60.0, 0.0)
                    .with_format(ValueFormat::Db)
                    .with_default(-40.0),
                Knob::new("ATTACK", 0.1, 50.0)
                    .with_taper(Taper::Log)
                    .with_format(ValueFormat::Ms)
                    .with_default(5.0),
                Knob::new("RELEASE", 10.0, 1000.0)
                    .with_taper(Taper::Log)
                    .with_format(ValueFormat::Ms)
                    .with_default(100.0),
                Knob::new("RANGE", -80.0, 0.0)
                    .with_style(KnobStyle::FromStart)
                    .with_format(ValueFormat::Db)
                    .with_default(-40.0),
            ],
            preset_bar: PresetBar::new(),
            light: GateLight::new(),
            vad: VadMeter::new(),
            curve_rect: Rect::NOTHING,
            in_meter: Rect::NOTHING,
            gr_meter: Rect::NOTHING,
            vad_rect: Rect::NOTHING,
            lamp_center: Pos2::ZERO,
            lamp_radius: 7.0,
        }
    }

    fn layout(&mut self, rect: Rect) {
        let body = Rect::from_min_max(
            rect.min + vec2(MARGIN, HEADER_H),
            rect.max - vec2(MARGIN, PRESET_H + KNOB_ROW_H + VAD_H + 2.0 * MARGIN),
        );

        self.gr_meter = Rect::from_min_size(
            pos2(body.max.x - METER_W, body.min.y),
            vec2(METER_W, body.height()),
        );
        self.in_meter = self.gr_meter.translate(vec2(-(METER_W + 4.0), 0.0));
        self.curve_rect = Rect::from_min_max(
            body.min,
            pos2(self.in_meter.min.x - SCALE_W - 6.0, body.max.y),
        );

        self.lamp_center = pos2(rect.max.x - MARGIN - 40.0, rect.min.y + 13.0);

        self.vad_rect = Rect::from_min_size(
            pos2(rect.min.x + MARGIN, body.max.y + 6.0),
            vec2(rect.width() - 2.0 * MARGIN, VAD_H),
        );

        let row_y = rect.max.y - PRESET_H - KNOB_ROW_H / 2.0 - 6.0;
        let count = self.knobs.len();
        let step = (rect.width() - 2.0 * MARGIN) / count as f32;
        for (i, knob) in self.knobs.iter_mut().enumerate() {
            knob.place(
                pos2(rect.min.x + MARGIN + (i as f32 + 0.5) * step, row_y),
                15.0,
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

    fn curve_point(&self, input_db: f32, output_db: f32) -> Pos2 {
        let span = DB_CEIL - DB_FLOOR;
        let tx = ((input_db - DB_FLOOR) / span).clamp(0.0, 1.0);
        let ty = ((output_db - DB_FLOOR) / span).clamp(0.0, 1.0);
        pos2(
            self.curve_rect.min.x + tx * self.curve_rect.width(),
            self.curve_rect.max.y - ty * self.curve_rect.height(),
        )
    }

    fn draw_curve(&self, painter: &Painter, state: &VoiceGateState) {
        well(painter, self.curve_rect);
        db_grid(
            painter,
            self.curve_rect,
            &[0.0, -12.0, -24.0, -36.0, -48.0],
            DB_FLOOR,
            DB_CEIL,
        );

        let color = if state.bypass {
            theme::TEXT_DIM
        } else {
            theme::ACCENT
        };
        let mut prev: Option<Pos2> = None;
        for i in 0..=CURVE_SAMPLES {
            let input = DB_FLOOR + (DB_CEIL - DB_FLOOR) * i as f32 / CURVE_SAMPLES as f32;
            let output = gate_transfer_db(input, state.threshold_db, state.range_db);
            let p = self.curve_point(input, output);
            if let Some(q) = prev {
                painter.line_segment([q, p], Stroke::new(1.5, color));
            }
            prev = Some(p);
        }

        // Threshold marker.
        let tx = self.curve_point(state.threshold_db, DB_FLOOR).x;
        painter.line_segment(
            [
                pos2(tx, self.curve_rect.min.y),
                pos2(tx, self.curve_rect.max.y),
            ],
            Stroke::new(1.0, theme::ACCENT_WARM.gamma_multiply(0.7)),
        );
    }
}

impl PluginRenderer for VoiceGateRenderer {
    type State = VoiceGateState;

    fn preferred_size(&self) -> Vec2 {
        vec2(440.0, 380.0)
    }

    fn render(
        &mut self,
        painter: &Painter,
        rect: Rect,
        _pixels_per_point: f32,
        state: &VoiceGateState,
    ) {
        self.layout(rect);
        panel(painter, rect);
        title(painter, rect, "Voice Gate", state.bypass);

        self.draw_curve(painter, state);

        let scale_rect = Rect::from_min_max(
            pos2(self.in_meter.min.x - SCALE_W, self.in_meter.min.y),
            pos2(self.in_meter.min.x - 2.0, self.in_meter.max.y),
        );
        meter_scale(painter, scale_rect);
        level_meter(painter, self.in_meter, state.input_db);
        reduction_meter(painter, self.gr_meter, state.reduction_db, -60.0);

        // Threshold marker across the input meter.
        let ty = db_to_y(state.threshold_db, self.in_meter.min.y, self.in_meter.max.y);
        painter.line_segment(
            [
                pos2(self.in_meter.min.x - 2.0, ty),
                pos2(self.in_meter.max.x + 2.0, ty),
            ],
            Stroke::new(1.5, theme::ACCENT_WARM),
        );

        self.light.update(state.open && !state.bypass);
        self.light
            .paint(painter, self.lamp_center, self.lamp_radius, state.open);
        painter.text(
            self.lamp_center + vec2(12.0, 0.0),
            Align2::LEFT_CENTER,
            if state.open { "OPEN" } else { "CLOSED" },
            FontId::proportional(9.0),
            theme::TEXT_DIM,
        );

        self.vad.update(state.vad_probability);
        self.vad
            .paint(painter, self.vad_rect, state.open && !state.bypass);
        painter.text(
            pos2(self.vad_rect.min.x + 4.0, self.vad_rect.center().y),
            Align2::LEFT_CENTER,
            "VAD",
            FontId::proportional(7.0),
            theme::TEXT_DIM,
        );

        let values = [
            state.threshold_db,
            state.attack_ms,
            state.release_ms,
            state.range_db,
        ];
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
        if (pos - self.lamp_center).length() <= self.lamp_radius + 2.0 {
            return HitRegion::GateLamp;
        }
        if self.curve_rect.contains(pos) {
            return HitRegion::TransferCurve;
        }
        if self.in_meter.contains(pos) || self.gr_meter.contains(pos) {
            return HitRegion::Meter;
        }
        if self.vad_rect.contains(pos) {
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
    fn knob_lamp_and_area_hits() {
        let mut r = VoiceGateRenderer::new();
        r.layout(Rect::from_min_size(pos2(0.0, 0.0), r.preferred_size()));

        assert_eq!(r.hit_test(r.knobs[KNOB_RANGE].center), HitRegion::Knob(KNOB_RANGE));
        assert_eq!(r.hit_test(r.lamp_center), HitRegion::GateLamp);
        assert_eq!(r.hit_test(r.curve_rect.center()), HitRegion::TransferCurve);
        assert_eq!(r.hit_test(r.vad_rect.center()), HitRegion::Meter);
        assert_eq!(r.hit_test(pos2(1.0, 1.0)), HitRegion::None);
    }
}
