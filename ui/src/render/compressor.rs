//! Compressor plugin surface: soft-knee transfer curve, gain-reduction
//! meter and the parameter knob row.

use egui::{Align2, FontId, Painter, Pos2, Rect, Stroke, Vec2, pos2, vec2};
use voxrack_types::defaults::{DB_CEIL, DB_FLOOR};
use voxrack_types::state::CompressorState;

use crate::curves::comp_transfer_db;
use crate::interaction::HitRegion;
use crate::theme;
use crate::util::format_db;
use crate::widgets::{Knob, PresetBar, Taper, ValueFormat, reduction_meter};

use super::{PluginRenderer, db_grid, panel, title, well};

pub const KNOB_THRESHOLD: usize = 0;
pub const KNOB_RATIO: usize = 1;
pub const KNOB_KNEE: usize = 2;
pub const KNOB_ATTACK: usize = 3;
pub const KNOB_RELEASE: usize = 4;
pub const KNOB_MAKEUP: usize = 5;

const HEADER_H: f32 = 26.0;
const PRESET_H: f32 = 18.0;
const KNOB_ROW_H: f32 = 78.0;
const GR_METER_W: f32 = 14.0;
const MARGIN: f32 = 10.0;
const CURVE_SAMPLES: usize = 96;

pub struct CompressorRenderer {
    knobs: Vec<Knob>,
    preset_bar: PresetBar,
    curve_rect: Rect,
    gr_meter: Rect,
}

impl Default for CompressorRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressorRenderer {
    pub fn new() -> Self {
        Self {
            knobs: vec![
                Knob::new("THRESH", -60.0, 0.0)
                    .with_format(ValueFormat::Db)
                    .with_default(-20.0),
                Knob::new("RATIO", 1.0, 20.0)
                    .with_taper(Taper::Log)
                    .with_format(ValueFormat::Ratio)
                    .with_default(4.0),
                Knob::new("KNEE", 0.0, 24.0)
                    .with_format(ValueFormat::Db)
                    .with_default(6.0),
                Knob::new("ATTACK", 0.1, 100.0)
                    .with_taper(Taper::Log)
                    .with_format(ValueFormat::Ms)
                    .with_default(10.0),
                Knob::new("RELEASE", 10.0, 1000.0)
                    .with_taper(Taper::Log)
                    .with_format(ValueFormat::Ms)
                    .with_default(100.0),
                Knob::new("MAKEUP", 0.0, 24.0)
                    .with_format(ValueFormat::Db)
                    .with_default(0.0),
            ],
            preset_bar: PresetBar::new(),
            curve_rect: Rect::NOTHING,
            gr_meter: Rect::NOTHING,
        }
    }

    fn layout(&mut self, rect: Rect) {
        let body = Rect::from_min_max(
            rect.min + vec2(MARGIN, HEADER_H),
            rect.max - vec2(MARGIN, PRESET_H + KNOB_ROW_H + MARGIN),
        );

        self.gr_meter = Rect::from_min_size(
            pos2(body.max.x - GR_METER_W, body.min.y + 10.0),
            vec2(GR_METER_W, body.height() - 20.0),
        );
        self.curve_rect = Rect::from_min_max(
            body.min,
            pos2(self.gr_meter.min.x - 8.0, body.max.y),
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

    /// In/out dB to curve-well coordinates. Both axes span the meter range.
    fn curve_point(&self, input_db: f32, output_db: f32) -> Pos2 {
        let span = DB_CEIL - DB_FLOOR;
        let tx = ((input_db - DB_FLOOR) / span).clamp(0.0, 1.0);
        let ty = ((output_db - DB_FLOOR) / span).clamp(0.0, 1.0);
        pos2(
            self.curve_rect.min.x + tx * self.curve_rect.width(),
            self.curve_rect.max.y - ty * self.curve_rect.height(),
        )
    }

    fn draw_curve(&self, painter: &Painter, state: &CompressorState) {
        well(painter, self.curve_rect);
        db_grid(
            painter,
            self.curve_rect,
            &[0.0, -12.0, -24.0, -36.0, -48.0],
            DB_FLOOR,
            DB_CEIL,
        );

        // Unity diagonal for reference.
        painter.line_segment(
            [
                self.curve_point(DB_FLOOR, DB_FLOOR),
                self.curve_point(DB_CEIL, DB_CEIL),
            ],
            Stroke::new(1.0, theme::GRID),
        );

        let color = if state.bypass {
            theme::TEXT_DIM
        } else {
            theme::ACCENT
        };
        let mut prev: Option<Pos2> = None;
        for i in 0..=CURVE_SAMPLES {
            let input = DB_FLOOR + (DB_CEIL - DB_FLOOR) * i as f32 / CURVE_SAMPLES as f32;
            let output =
                comp_transfer_db(input, state.threshold_db, state.ratio, state.knee_db)
                    + state.makeup_db;
            let p = self.curve_point(input, output);
            if let Some(q) = prev {
                painter.line_segment([q, p], Stroke::new(1.5, color));
            }
            prev = Some(p);
        }

        // Operating point at the current input level.
        if state.input_db.is_finite() && state.input_db > DB_FLOOR {
            let output =
                comp_transfer_db(state.input_db, state.threshold_db, state.ratio, state.knee_db)
                    + state.makeup_db;
            painter.circle_filled(
                self.curve_point(state.input_db, output),
                3.0,
                theme::ACCENT_WARM,
            );
        }
    }
}

impl PluginRenderer for CompressorRenderer {
    type State = CompressorState;

    fn preferred_size(&self) -> Vec2 {
        vec2(460.0, 360.0)
    }

    fn render(
        &mut self,
        painter: &Painter,
        rect: Rect,
        _pixels_per_point: f32,
        state: &CompressorState,
    ) {
        self.layout(rect);
        panel(painter, rect);
        title(painter, rect, "Compressor", state.bypass);

        self.draw_curve(painter, state);

        reduction_meter(painter, self.gr_meter, state.reduction_db, -24.0);
        painter.text(
            pos2(self.gr_meter.center().x, self.gr_meter.max.y + 2.0),
            Align2::CENTER_TOP,
            "GR",
            FontId::proportional(7.0),
            theme::TEXT_DIM,
        );
        painter.text(
            pos2(rect.max.x - MARGIN, rect.min.y + 8.0),
            Align2::RIGHT_TOP,
            format_db(state.reduction_db),
            FontId::monospace(10.0),
            theme::ACCENT_WARM,
        );

        let values = [
            state.threshold_db,
            state.ratio,
            state.knee_db,
            state.attack_ms,
            state.release_ms,
            state.makeup_db,
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
        if self.curve_rect.contains(pos) {
            return HitRegion::TransferCurve;
        }
        if self.gr_meter.contains(pos) {
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
    fn knob_and_area_hits() {
        let mut r = CompressorRenderer::new();
        r.layout(Rect::from_min_size(pos2(0.0, 0.0), r.preferred_size()));

        for i in 0..r.knobs.len() {
            assert_eq!(r.hit_test(r.knobs[i].center), HitRegion::Knob(i));
        }
        assert_eq!(r.hit_test(r.curve_rect.center()), HitRegion::TransferCurve);
        assert_eq!(r.hit_test(r.gr_meter.center()), HitRegion::Meter);
        assert_eq!(r.hit_test(pos2(1.0, 1.0)), HitRegion::None);
    }

    #[test]
    fn curve_point_is_monotonic_in_both_axes() {
        let mut r = CompressorRenderer::new();
        r.layout(Rect::from_min_size(pos2(0.0, 0.0), r.preferred_size()));

        let a = r.curve_point(-40.0, -40.0);
        let b = r.curve_point(-10.0, -20.0);
        assert!(b.x > a.x);
        assert!(b.y < a.y);
    }
}
