//! Rotary knob widget.

use egui::{Align2, Color32, FontId, Painter, Pos2, Stroke, vec2};
use voxrack_types::defaults::{KNOB_ANGLE_START, KNOB_ANGLE_SWEEP, KNOB_HIT_PADDING};

use crate::theme;
use crate::util::{format_db, format_hz};

/// How the value arc is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnobStyle {
    /// Arc fills from the sweep start (unipolar parameters).
    FromStart,
    /// Arc fills from the sweep center (cut/boost parameters).
    Bipolar,
}

/// Value-to-angle mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Taper {
    Linear,
    /// Logarithmic; requires `min > 0` (frequencies, ratios).
    Log,
}

/// Readout formatting for the value text under the knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    Db,
    Hz,
    Ms,
    Ratio,
    Percent,
    Raw,
}

impl ValueFormat {
    pub fn format(&self, v: f32) -> String {
        match self {
            ValueFormat::Db => format_db(v),
            ValueFormat::Hz => format_hz(v),
            ValueFormat::Ms => format!("{:.0} ms", v),
            ValueFormat::Ratio => format!("{:.1}:1", v),
            ValueFormat::Percent => format!("{:.0}%", v * 100.0),
            ValueFormat::Raw => format!("{:.2}", v),
        }
    }
}

/// A rotary knob: fixed geometry and range, painted fresh each frame with
/// the current value from the state record.
#[derive(Debug, Clone)]
pub struct Knob {
    pub center: Pos2,
    pub radius: f32,
    pub min: f32,
    pub max: f32,
    /// Double-click reset target; falls back to `min` when unset.
    pub default: Option<f32>,
    pub label: &'static str,
    pub style: KnobStyle,
    pub taper: Taper,
    pub format: ValueFormat,
}

impl Knob {
    pub fn new(label: &'static str, min: f32, max: f32) -> Self {
        Self {
            center: Pos2::ZERO,
            radius: 16.0,
            min,
            max,
            default: None,
            label,
            style: KnobStyle::FromStart,
            taper: Taper::Linear,
            format: ValueFormat::Raw,
        }
    }

    pub fn with_style(mut self, style: KnobStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_taper(mut self, taper: Taper) -> Self {
        self.taper = taper;
        self
    }

    pub fn with_format(mut self, format: ValueFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_default(mut self, default: f32) -> Self {
        self.default = Some(default);
        self
    }

    /// Place the knob; called by the renderer during layout.
    pub fn place(&mut self, center: Pos2, radius: f32) {
        self.center = center;
        self.radius = radius;
    }

    /// Reset target for double-click.
    pub fn reset_value(&self) -> f32 {
        self.default.unwrap_or(self.min)
    }

    /// Map a parameter value to 0..1.
    pub fn normalize(&self, v: f32) -> f32 {
        let v = v.clamp(self.min.min(self.max), self.max.max(self.min));
        let t = match self.taper {
            Taper::Log if self.min > 0.0 => (v / self.min).ln() / (self.max / self.min).ln(),
            _ => (v - self.min) / (self.max - self.min),
        };
        if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 }
    }

    /// Inverse of [`normalize`](Self::normalize).
    pub fn denormalize(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self.taper {
            Taper::Log if self.min > 0.0 => self.min * (self.max / self.min).powf(t),
            _ => self.min + (self.max - self.min) * t,
        }
    }

    /// Padded circular containment check.
    pub fn hit_test(&self, pos: Pos2) -> bool {
        let r = self.radius + KNOB_HIT_PADDING;
        (pos - self.center).length_sq() <= r * r
    }

    fn angle_at(&self, t: f32) -> f32 {
        (KNOB_ANGLE_START + t * KNOB_ANGLE_SWEEP).to_radians()
    }

    fn point_at(&self, t: f32, r: f32) -> Pos2 {
        let a = self.angle_at(t);
        self.center + vec2(a.cos(), a.sin()) * r
    }

    fn draw_arc(&self, painter: &Painter, from_t: f32, to_t: f32, r: f32, stroke: Stroke) {
        let (from_t, to_t) = if from_t <= to_t {
            (from_t, to_t)
        } else {
            (to_t, from_t)
        };
        let span = to_t - from_t;
        if span < 0.003 {
            return;
        }
        let segments = ((span * 36.0).ceil() as usize).max(4);
        for i in 0..segments {
            let t0 = from_t + span * i as f32 / segments as f32;
            let t1 = from_t + span * (i + 1) as f32 / segments as f32;
            painter.line_segment([self.point_at(t0, r), self.point_at(t1, r)], stroke);
        }
    }

    /// Draw the knob with the given parameter value.
    pub fn paint(&self, painter: &Painter, value: f32, active: bool) {
        let t = self.normalize(value);
        let arc_r = self.radius - 2.0;

        // Body disc
        painter.circle_filled(self.center, self.radius, theme::KNOB_BODY);

        // Background track arc
        self.draw_arc(
            painter,
            0.0,
            1.0,
            arc_r,
            Stroke::new(2.0, theme::KNOB_TRACK),
        );

        // Value arc
        let arc_color = if active {
            theme::ACCENT
        } else {
            theme::ACCENT.gamma_multiply(0.75)
        };
        let from = match self.style {
            KnobStyle::FromStart => 0.0,
            KnobStyle::Bipolar => 0.5,
        };
        self.draw_arc(painter, from, t, arc_r, Stroke::new(2.5, arc_color));

        // Inner gradient disc, light toward the center
        let inner = self.radius * 0.62;
        for i in 0..4 {
            let f = i as f32 / 4.0;
            let shade = Color32::from_gray((0x30 as f32 + 0x16 as f32 * f) as u8);
            painter.circle_filled(self.center, inner * (1.0 - f * 0.55), shade);
        }

        // Pointer line
        let a = self.angle_at(t);
        let dir = vec2(a.cos(), a.sin());
        painter.line_segment(
            [
                self.center + dir * (self.radius * 0.3),
                self.center + dir * (self.radius - 3.0),
            ],
            Stroke::new(1.8, Color32::WHITE),
        );

        // Border
        let border = if active { theme::ACCENT } else { theme::OUTLINE };
        painter.circle_stroke(self.center, self.radius, Stroke::new(1.0, border));

        // Label above, value below
        if !self.label.is_empty() {
            painter.text(
                self.center - vec2(0.0, self.radius + 8.0),
                Align2::CENTER_CENTER,
                self.label,
                FontId::proportional(9.0),
                theme::TEXT_DIM,
            );
        }
        painter.text(
            self.center + vec2(0.0, self.radius + 9.0),
            Align2::CENTER_CENTER,
            self.format.format(value),
            FontId::monospace(9.0),
            theme::TEXT,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn linear_knob() -> Knob {
        let mut k = Knob::new("GAIN", -24.0, 24.0).with_style(KnobStyle::Bipolar);
        k.place(pos2(50.0, 50.0), 16.0);
        k
    }

    fn log_knob() -> Knob {
        let mut k = Knob::new("FREQ", 20.0, 20_000.0).with_taper(Taper::Log);
        k.place(pos2(50.0, 50.0), 16.0);
        k
    }

    #[test]
    fn linear_roundtrip() {
        let k = linear_knob();
        for v in [-24.0f32, -12.5, 0.0, 3.2, 24.0] {
            let back = k.denormalize(k.normalize(v));
            assert!((back - v).abs() < 1e-3, "{} -> {}", v, back);
        }
    }

    #[test]
    fn log_roundtrip() {
        let k = log_knob();
        for v in [20.0f32, 80.0, 440.0, 3000.0, 20_000.0] {
            let back = k.denormalize(k.normalize(v));
            assert!((back / v - 1.0).abs() < 1e-4, "{} -> {}", v, back);
        }
    }

    #[test]
    fn log_midpoint_is_geometric_mean() {
        let k = log_knob();
        let mid = k.denormalize(0.5);
        assert!((mid - (20.0f32 * 20_000.0).sqrt()).abs() < 1.0);
    }

    #[test]
    fn normalize_clamps_out_of_range() {
        let k = linear_knob();
        assert_eq!(k.normalize(-100.0), 0.0);
        assert_eq!(k.normalize(100.0), 1.0);
    }

    #[test]
    fn hit_test_uses_padded_radius() {
        let k = linear_knob();
        assert!(k.hit_test(pos2(50.0, 50.0)));
        // Just inside the padded radius
        assert!(k.hit_test(pos2(50.0 + 16.0 + KNOB_HIT_PADDING - 0.5, 50.0)));
        // Just outside it
        assert!(!k.hit_test(pos2(50.0 + 16.0 + KNOB_HIT_PADDING + 0.5, 50.0)));
    }

    #[test]
    fn reset_value_falls_back_to_min() {
        let k = Knob::new("X", 0.0, 1.0);
        assert_eq!(k.reset_value(), 0.0);
        let k = Knob::new("X", 0.0, 1.0).with_default(0.5);
        assert_eq!(k.reset_value(), 0.5);
    }

    #[test]
    fn value_formats() {
        assert_eq!(ValueFormat::Ratio.format(4.0), "4.0:1");
        assert_eq!(ValueFormat::Percent.format(0.25), "25%");
        assert_eq!(ValueFormat::Hz.format(250.0), "250 Hz");
        assert_eq!(ValueFormat::Hz.format(2500.0), "2.50 kHz");
        assert_eq!(ValueFormat::Db.format(-6.0), "-6.0 dB");
    }
}
