//! Room Tone plugin surface: ambience-fill controls and the captured noise
//! profile curve.

use egui::{Align2, FontId, Painter, Pos2, Rect, Stroke, Vec2, pos2, vec2};
use voxrack_types::state::RoomToneState;

use crate::interaction::HitRegion;
use crate::theme;
use crate::widgets::{Knob, KnobStyle, PresetBar, ValueFormat, level_meter};

use super::{PluginRenderer, panel, title, well};

pub const KNOB_AMOUNT: usize = 0;
pub const KNOB_TILT: usize = 1;

const HEADER_H: f32 = 26.0;
const PRESET_H: f32 = 18.0;
const KNOB_ROW_H: f32 = 78.0;
const METER_W: f32 = 12.0;
const MARGIN: f32 = 10.0;

pub struct RoomToneRenderer {
    knobs: Vec<Knob>,
    preset_bar: PresetBar,
    profile_rect: Rect,
    meter: Rect,
}

impl Default for RoomToneRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomToneRenderer {
    pub fn new() -> Self {
        Self {
            knobs: vec![
                Knob::new("AMOUNT", 0.0, 1.0)
                    .with_format(ValueFormat::Percent)
                    .with_default(0.2),
                Knob::new("TILT", -1.0, 1.0)
                    .with_style(KnobStyle::Bipolar)
                    .with_format(ValueFormat::Raw)
                    .with_default(0.0),
            ],
            preset_bar: PresetBar::new(),
            profile_rect: Rect::NOTHING,
            meter: Rect::NOTHING,
        }
    }

    fn layout(&mut self, rect: Rect) {
        let body = Rect::from_min_max(
            rect.min + vec2(MARGIN, HEADER_H),
            rect.max - vec2(MARGIN, PRESET_H + KNOB_ROW_H + MARGIN),
        );

        self.meter = Rect::from_min_size(
            pos2(body.max.x - METER_W, body.min.y),
            vec2(METER_W, body.height()),
        );
        self.profile_rect = Rect::from_min_max(
            body.min,
            pos2(self.meter.min.x - 8.0, body.max.y),
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

    /// Captured per-band noise profile as a filled curve. Nothing to draw
    /// until the engine has learned a profile.
    fn draw_profile(&self, painter: &Painter, state: &RoomToneState) {
        well(painter, self.profile_rect);

        let Some(profile) = state.profile.as_deref() else {
            painter.text(
                self.profile_rect.center(),
                Align2::CENTER_CENTER,
                if state.learning { "learning..." } else { "no profile" },
                FontId::proportional(10.0),
                theme::TEXT_DIM,
            );
            return;
        };
        if profile.len() < 2 {
            return;
        }

        let inner = self.profile_rect.shrink(2.0);
        let step = inner.width() / (profile.len() - 1) as f32;
        let mut prev: Option<Pos2> = None;
        for (i, &v) in profile.iter().enumerate() {
            if !v.is_finite() {
                prev = None;
                continue;
            }
            let x = inner.min.x + i as f32 * step;
            let y = inner.max.y - v.clamp(0.0, 1.0) * inner.height();
            let p = pos2(x, y);
            painter.line_segment(
                [pos2(x, inner.max.y), p],
                Stroke::new(step.max(1.0), theme::ACCENT.gamma_multiply(0.25)),
            );
            if let Some(q) = prev {
                painter.line_segment([q, p], Stroke::new(1.5, theme::ACCENT));
            }
            prev = Some(p);
        }

        if state.learning {
            painter.text(
                pos2(inner.max.x - 4.0, inner.min.y + 4.0),
                Align2::RIGHT_TOP,
                "LEARNING",
                FontId::proportional(9.0),
                theme::ACCENT_WARM,
            );
        }
    }
}

impl PluginRenderer for RoomToneRenderer {
    type State = RoomToneState;

    fn preferred_size(&self) -> Vec2 {
        vec2(360.0, 300.0)
    }

    fn render(
        &mut self,
        painter: &Painter,
        rect: Rect,
        _pixels_per_point: f32,
        state: &RoomToneState,
    ) {
        self.layout(rect);
        panel(painter, rect);
        title(painter, rect, "Room Tone", state.bypass);

        self.draw_profile(painter, state);
        level_meter(painter, self.meter, state.level_db);

        let values = [state.amount, state.tilt];
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
        if self.profile_rect.contains(pos) {
            return HitRegion::TransferCurve;
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
    fn hits_after_layout() {
        let mut r = RoomToneRenderer::new();
        r.layout(Rect::from_min_size(pos2(0.0, 0.0), r.preferred_size()));

        assert_eq!(r.hit_test(r.knobs[KNOB_TILT].center), HitRegion::Knob(KNOB_TILT));
        assert_eq!(r.hit_test(r.profile_rect.center()), HitRegion::TransferCurve);
        assert_eq!(r.hit_test(pos2(1.0, 1.0)), HitRegion::None);
    }
}
