//! Parametric EQ plugin surface.
//!
//! Band count is taken from the state record, so one renderer serves every
//! EQ variant the engine runs. The response well shows the combined curve
//! plus a handle per band; the knob row edits the selected band.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, Vec2, pos2, vec2};
use voxrack_types::defaults::{EQ_FREQ_MAX, EQ_FREQ_MIN, EQ_GAIN_RANGE};
use voxrack_types::display::FreqScale;
use voxrack_types::state::{EqBand, EqState};

use crate::curves::{band_response_db, eq_response_db, freq_to_norm};
use crate::interaction::HitRegion;
use crate::theme;
use crate::widgets::{Knob, KnobStyle, PresetBar, Taper, ValueFormat, level_meter};

use super::{FreqAxis, PluginRenderer, panel, title, well};

pub const KNOB_FREQ: usize = 0;
pub const KNOB_GAIN: usize = 1;
pub const KNOB_Q: usize = 2;

const HEADER_H: f32 = 26.0;
const PRESET_H: f32 = 18.0;
const KNOB_ROW_H: f32 = 78.0;
const AXIS_H: f32 = 12.0;
const METER_W: f32 = 12.0;
const MARGIN: f32 = 10.0;
const HANDLE_R: f32 = 5.0;
const CURVE_SAMPLES: usize = 128;

const BAND_COLORS: [Color32; 6] = [
    Color32::from_rgb(0xe8, 0x8a, 0x4a),
    Color32::from_rgb(0x5a, 0xa0, 0xe8),
    Color32::from_rgb(0x50, 0xc8, 0x60),
    Color32::from_rgb(0xe8, 0xd0, 0x60),
    Color32::from_rgb(0xd8, 0x70, 0xc8),
    Color32::from_rgb(0x48, 0xd8, 0xc0),
];

pub struct EqRenderer {
    knobs: Vec<Knob>,
    preset_bar: PresetBar,
    axis: FreqAxis,
    curve_rect: Rect,
    in_meter: Rect,
    out_meter: Rect,
    /// Band handle positions recorded during the last render.
    handles: Vec<Pos2>,
}

impl Default for EqRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl EqRenderer {
    pub fn new() -> Self {
        Self {
            knobs: vec![
                Knob::new("FREQ", EQ_FREQ_MIN, EQ_FREQ_MAX)
                    .with_taper(Taper::Log)
                    .with_format(ValueFormat::Hz)
                    .with_default(1000.0),
                Knob::new("GAIN", -EQ_GAIN_RANGE, EQ_GAIN_RANGE)
                    .with_style(KnobStyle::Bipolar)
                    .with_format(ValueFormat::Db)
                    .with_default(0.0),
                Knob::new("Q", 0.1, 10.0)
                    .with_taper(Taper::Log)
                    .with_format(ValueFormat::Raw)
                    .with_default(1.0),
            ],
            preset_bar: PresetBar::new(),
            axis: FreqAxis::default(),
            curve_rect: Rect::NOTHING,
            in_meter: Rect::NOTHING,
            out_meter: Rect::NOTHING,
            handles: Vec::new(),
        }
    }

    /// Band handle under the pointer, nearest first.
    pub fn band_at(&self, pos: Pos2) -> Option<usize> {
        let r = HANDLE_R + 3.0;
        self.handles
            .iter()
            .enumerate()
            .filter(|(_, h)| (pos - **h).length_sq() <= r * r)
            .min_by(|(_, a), (_, b)| {
                let da = (pos - **a).length_sq();
                let db = (pos - **b).length_sq();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
    }

    fn layout(&mut self, rect: Rect) {
        let body = Rect::from_min_max(
            rect.min + vec2(MARGIN, HEADER_H),
            rect.max - vec2(MARGIN, PRESET_H + KNOB_ROW_H + AXIS_H + MARGIN),
        );

        self.out_meter = Rect::from_min_size(
            pos2(body.max.x - METER_W, body.min.y),
            vec2(METER_W, body.height()),
        );
        self.in_meter = self.out_meter.translate(vec2(-(METER_W + 4.0), 0.0));
        self.curve_rect = Rect::from_min_max(
            body.min,
            pos2(self.in_meter.min.x - 8.0, body.max.y),
        );

        let row_y = rect.max.y - PRESET_H - KNOB_ROW_H / 2.0 - 6.0;
        let count = self.knobs.len();
        let step = (rect.width() * 0.6) / count as f32;
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

    fn curve_point(&self, freq: f32, gain_db: f32) -> Pos2 {
        let tx = freq_to_norm(freq, EQ_FREQ_MIN, EQ_FREQ_MAX, FreqScale::Logarithmic);
        let ty = ((gain_db + EQ_GAIN_RANGE) / (2.0 * EQ_GAIN_RANGE)).clamp(0.0, 1.0);
        pos2(
            self.curve_rect.min.x + tx * self.curve_rect.width(),
            self.curve_rect.max.y - ty * self.curve_rect.height(),
        )
    }

    fn draw_response(&mut self, painter: &Painter, state: &EqState) {
        well(painter, self.curve_rect);
        self.axis.draw(
            painter,
            self.curve_rect,
            EQ_FREQ_MIN,
            EQ_FREQ_MAX,
            FreqScale::Logarithmic,
        );

        // Zero line.
        let zero = self.curve_point(EQ_FREQ_MIN, 0.0).y;
        painter.line_segment(
            [
                pos2(self.curve_rect.min.x, zero),
                pos2(self.curve_rect.max.x, zero),
            ],
            Stroke::new(1.0, theme::GRID),
        );

        // Per-band curves, dimmed, for the selected band only.
        if let Some(sel) = state.selected_band {
            if let Some(band) = state.bands.get(sel) {
                self.draw_band_curve(painter, band, BAND_COLORS[sel % BAND_COLORS.len()]);
            }
        }

        // Combined response.
        let color = if state.bypass {
            theme::TEXT_DIM
        } else {
            theme::ACCENT
        };
        let mut prev: Option<Pos2> = None;
        for i in 0..=CURVE_SAMPLES {
            let t = i as f32 / CURVE_SAMPLES as f32;
            let freq = EQ_FREQ_MIN * (EQ_FREQ_MAX / EQ_FREQ_MIN).powf(t);
            let p = self.curve_point(freq, eq_response_db(&state.bands, freq));
            if let Some(q) = prev {
                painter.line_segment([q, p], Stroke::new(1.5, color));
            }
            prev = Some(p);
        }

        // Band handles.
        self.handles.clear();
        for (i, band) in state.bands.iter().enumerate() {
            let p = self.curve_point(band.freq, band.gain_db);
            self.handles.push(p);
            let c = BAND_COLORS[i % BAND_COLORS.len()];
            let c = if band.enabled { c } else { c.gamma_multiply(0.35) };
            painter.circle_filled(p, HANDLE_R, c);
            if state.selected_band == Some(i) {
                painter.circle_stroke(p, HANDLE_R + 2.0, Stroke::new(1.5, theme::TEXT));
            }
        }
    }

    fn draw_band_curve(&self, painter: &Painter, band: &EqBand, color: Color32) {
        let mut prev: Option<Pos2> = None;
        for i in 0..=CURVE_SAMPLES {
            let t = i as f32 / CURVE_SAMPLES as f32;
            let freq = EQ_FREQ_MIN * (EQ_FREQ_MAX / EQ_FREQ_MIN).powf(t);
            let p = self.curve_point(freq, band_response_db(band, freq));
            if let Some(q) = prev {
                painter.line_segment([q, p], Stroke::new(1.0, color.gamma_multiply(0.5)));
            }
            prev = Some(p);
        }
    }
}

impl PluginRenderer for EqRenderer {
    type State = EqState;

    fn preferred_size(&self) -> Vec2 {
        vec2(560.0, 380.0)
    }

    fn render(&mut self, painter: &Painter, rect: Rect, _pixels_per_point: f32, state: &EqState) {
        self.layout(rect);
        panel(painter, rect);
        title(painter, rect, "EQ", state.bypass);

        self.draw_response(painter, state);

        level_meter(painter, self.in_meter, state.input_db);
        level_meter(painter, self.out_meter, state.output_db);

        let selected = state
            .selected_band
            .and_then(|i| state.bands.get(i).copied());
        if let Some(band) = selected {
            let values = [band.freq, band.gain_db, band.q];
            for (knob, value) in self.knobs.iter().zip(values) {
                knob.paint(painter, value, band.enabled && !state.bypass);
            }
            painter.text(
                pos2(rect.max.x - MARGIN, rect.max.y - PRESET_H - KNOB_ROW_H + 4.0),
                Align2::RIGHT_TOP,
                format!(
                    "BAND {} {}",
                    state.selected_band.map(|i| i + 1).unwrap_or(0),
                    band.shape.label()
                ),
                FontId::proportional(9.0),
                theme::TEXT_DIM,
            );
        } else {
            painter.text(
                pos2(rect.min.x + MARGIN, rect.max.y - PRESET_H - KNOB_ROW_H / 2.0),
                Align2::LEFT_CENTER,
                "select a band",
                FontId::proportional(10.0),
                theme::TEXT_DIM,
            );
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
            return HitRegion::EqCurve;
        }
        if self.in_meter.contains(pos) || self.out_meter.contains(pos) {
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
    use voxrack_types::defaults::DEFAULT_EQ_BANDS;

    fn laid_out() -> EqRenderer {
        let mut r = EqRenderer::new();
        r.layout(Rect::from_min_size(pos2(0.0, 0.0), r.preferred_size()));
        r
    }

    #[test]
    fn curve_area_and_knob_hits() {
        let r = laid_out();
        assert_eq!(r.hit_test(r.curve_rect.center()), HitRegion::EqCurve);
        assert_eq!(r.hit_test(r.knobs[KNOB_Q].center), HitRegion::Knob(KNOB_Q));
        assert_eq!(r.hit_test(pos2(1.0, 1.0)), HitRegion::None);
    }

    #[test]
    fn handles_follow_band_count() {
        let mut r = laid_out();
        for count in [3usize, 5] {
            r.handles.clear();
            let bands: Vec<EqBand> = DEFAULT_EQ_BANDS[..count.min(DEFAULT_EQ_BANDS.len())]
                .iter()
                .map(|&(shape, freq, gain, q)| EqBand::new(shape, freq, gain, q))
                .collect();
            for band in &bands {
                let p = r.curve_point(band.freq, band.gain_db);
                r.handles.push(p);
            }
            assert_eq!(r.handles.len(), bands.len());
            assert_eq!(r.band_at(r.handles[0]), Some(0));
        }
    }

    #[test]
    fn curve_point_maps_extremes_to_well_edges() {
        let r = laid_out();
        let lo = r.curve_point(EQ_FREQ_MIN, -EQ_GAIN_RANGE);
        let hi = r.curve_point(EQ_FREQ_MAX, EQ_GAIN_RANGE);
        assert!((lo.x - r.curve_rect.min.x).abs() < 0.5);
        assert!((lo.y - r.curve_rect.max.y).abs() < 0.5);
        assert!((hi.x - r.curve_rect.max.x).abs() < 0.5);
        assert!((hi.y - r.curve_rect.min.y).abs() < 0.5);
    }
}
