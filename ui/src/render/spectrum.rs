//! Frequency Analyzer plugin surface: instantaneous spectrum with peak-hold.

use egui::{Align2, FontId, Painter, Pos2, Rect, Stroke, Vec2, pos2, vec2};
use voxrack_types::state::SpectrumState;

use crate::curves::norm_to_freq;
use crate::interaction::HitRegion;
use crate::theme;
use crate::widgets::PresetBar;
use voxrack_types::display::SpectrumMode;

use super::{FreqAxis, PluginRenderer, panel, title, well};

const HEADER_H: f32 = 26.0;
const PRESET_H: f32 = 18.0;
const AXIS_H: f32 = 12.0;
const MARGIN: f32 = 10.0;
const BAR_W: f32 = 3.0;
const MIN_FREQ: f32 = 20.0;

pub struct SpectrumRenderer {
    preset_bar: PresetBar,
    axis: FreqAxis,
    spectrum_rect: Rect,
}

impl Default for SpectrumRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrumRenderer {
    pub fn new() -> Self {
        Self {
            preset_bar: PresetBar::new(),
            axis: FreqAxis::default(),
            spectrum_rect: Rect::NOTHING,
        }
    }

    fn layout(&mut self, rect: Rect) {
        self.spectrum_rect = Rect::from_min_max(
            rect.min + vec2(MARGIN, HEADER_H),
            rect.max - vec2(MARGIN, PRESET_H + AXIS_H + MARGIN),
        );

        self.preset_bar.layout(
            Rect::from_min_size(
                pos2(rect.min.x + MARGIN, rect.max.y - PRESET_H - 4.0),
                vec2(rect.width() - 2.0 * MARGIN, PRESET_H),
            ),
            4,
        );
    }

    /// Peak magnitude over the bin range a display column covers. The bitmap
    /// of bins is linear in frequency; the display axis may be log.
    fn column_value(data: &[f32], nyquist: f32, f0: f32, f1: f32) -> Option<f32> {
        if data.is_empty() || nyquist <= 0.0 {
            return None;
        }
        let bins = data.len();
        let b0 = ((f0 / nyquist) * bins as f32).floor().max(0.0) as usize;
        let b1 = (((f1 / nyquist) * bins as f32).ceil() as usize).min(bins);
        if b0 >= b1 {
            return data.get(b0.min(bins - 1)).copied().filter(|v| v.is_finite());
        }
        data[b0..b1]
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<f32>, v| Some(acc.map_or(v, |a| a.max(v))))
    }

    fn draw_spectrum(&self, painter: &Painter, state: &SpectrumState) {
        let Some(spectrum) = state.spectrum.as_deref() else {
            return;
        };
        if spectrum.len() < 2 || state.sample_rate <= 0.0 {
            return;
        }
        let nyquist = state.sample_rate / 2.0;
        let peaks = state
            .peaks
            .as_deref()
            .filter(|p| p.len() == spectrum.len());

        let inner = self.spectrum_rect.shrink(2.0);
        let cols = (inner.width() / BAR_W).floor().max(1.0) as usize;
        let color = if state.bypass {
            theme::TEXT_DIM
        } else {
            theme::ACCENT
        };

        let mut prev_line: Option<Pos2> = None;
        for c in 0..cols {
            let t0 = c as f32 / cols as f32;
            let t1 = (c + 1) as f32 / cols as f32;
            let f0 = norm_to_freq(t0, MIN_FREQ, nyquist, state.freq_scale);
            let f1 = norm_to_freq(t1, MIN_FREQ, nyquist, state.freq_scale);

            let Some(mag) = Self::column_value(spectrum, nyquist, f0, f1) else {
                continue;
            };
            let x = inner.min.x + (t0 + (t1 - t0) * 0.5) * inner.width();
            let y = inner.max.y - mag.clamp(0.0, 1.0) * inner.height();

            match state.mode {
                SpectrumMode::Bars => {
                    painter.line_segment(
                        [pos2(x, inner.max.y), pos2(x, y)],
                        Stroke::new(BAR_W - 1.0, color.gamma_multiply(0.85)),
                    );
                }
                SpectrumMode::Line => {
                    let p = pos2(x, y);
                    if let Some(q) = prev_line {
                        painter.line_segment([q, p], Stroke::new(1.5, color));
                    }
                    prev_line = Some(p);
                }
            }

            if let Some(peaks) = peaks {
                if let Some(peak) = Self::column_value(peaks, nyquist, f0, f1) {
                    let py = inner.max.y - peak.clamp(0.0, 1.0) * inner.height();
                    painter.line_segment(
                        [pos2(x - BAR_W / 2.0, py), pos2(x + BAR_W / 2.0, py)],
                        Stroke::new(1.0, theme::ACCENT_WARM),
                    );
                }
            }
        }
    }
}

impl PluginRenderer for SpectrumRenderer {
    type State = SpectrumState;

    fn preferred_size(&self) -> Vec2 {
        vec2(520.0, 300.0)
    }

    fn render(
        &mut self,
        painter: &Painter,
        rect: Rect,
        _pixels_per_point: f32,
        state: &SpectrumState,
    ) {
        self.layout(rect);
        panel(painter, rect);
        title(painter, rect, "Frequency Analyzer", state.bypass);

        well(painter, self.spectrum_rect);
        if state.sample_rate > 0.0 {
            self.axis.draw(
                painter,
                self.spectrum_rect,
                MIN_FREQ,
                state.sample_rate / 2.0,
                state.freq_scale,
            );
        }
        self.draw_spectrum(painter, state);

        painter.text(
            pos2(rect.max.x - MARGIN, rect.min.y + 8.0),
            Align2::RIGHT_TOP,
            match state.mode {
                SpectrumMode::Bars => "BARS",
                SpectrumMode::Line => "LINE",
            },
            FontId::proportional(9.0),
            theme::TEXT_DIM,
        );

        self.preset_bar.paint(painter, None, state.bypass);
    }

    fn hit_test(&self, pos: Pos2) -> HitRegion {
        if self.spectrum_rect.contains(pos) {
            return HitRegion::Spectrum;
        }
        self.preset_bar.hit_test(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_hit() {
        let mut r = SpectrumRenderer::new();
        r.layout(Rect::from_min_size(pos2(0.0, 0.0), r.preferred_size()));
        assert_eq!(r.hit_test(r.spectrum_rect.center()), HitRegion::Spectrum);
        assert_eq!(r.hit_test(pos2(1.0, 1.0)), HitRegion::None);
    }

    #[test]
    fn column_value_takes_range_peak() {
        let data = [0.1, 0.9, 0.2, 0.3];
        // Whole range: the peak bin wins.
        let v = SpectrumRenderer::column_value(&data, 1000.0, 0.0, 1000.0);
        assert_eq!(v, Some(0.9));
        // Narrow range inside one bin.
        let v = SpectrumRenderer::column_value(&data, 1000.0, 510.0, 520.0);
        assert_eq!(v, Some(0.2));
    }

    #[test]
    fn column_value_skips_non_finite() {
        let data = [f32::NAN, 0.4];
        let v = SpectrumRenderer::column_value(&data, 1000.0, 0.0, 1000.0);
        assert_eq!(v, Some(0.4));
        let v = SpectrumRenderer::column_value(&[f32::NAN], 1000.0, 0.0, 1000.0);
        assert_eq!(v, None);
    }
}
