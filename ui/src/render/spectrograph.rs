//! Vocal Spectrograph plugin surface.
//!
//! Scrolling spectrogram with pitch, harmonic and formant overlays plus the
//! voice-quality readouts (note name, HNR, CPP). Overlay arrays are aligned
//! with the spectrogram window; undetected frames carry non-positive or
//! non-finite values and are skipped.

use egui::{Align2, FontId, Painter, Pos2, Rect, Stroke, Vec2, pos2, vec2};
use voxrack_types::state::SpectrographState;

use crate::interaction::HitRegion;
use crate::spectrogram::{FrameSignature, SpectrogramImage};
use crate::theme;
use crate::util::{format_db, note_name};
use crate::widgets::PresetBar;

use super::{PluginRenderer, panel, snap_to_pixels, title, well};

const HEADER_H: f32 = 26.0;
const PRESET_H: f32 = 18.0;
const READOUT_W: f32 = 96.0;
const AXIS_W: f32 = 34.0;
const MARGIN: f32 = 10.0;

pub struct SpectrographRenderer {
    spectro: SpectrogramImage,
    spectro_rect: Rect,
    readout_rect: Rect,
    preset_bar: PresetBar,
}

impl Default for SpectrographRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrographRenderer {
    pub fn new() -> Self {
        Self {
            spectro: SpectrogramImage::new(),
            spectro_rect: Rect::NOTHING,
            readout_rect: Rect::NOTHING,
            preset_bar: PresetBar::new(),
        }
    }

    pub fn spectrogram(&self) -> &SpectrogramImage {
        &self.spectro
    }

    fn layout(&mut self, rect: Rect) {
        let body = Rect::from_min_max(
            rect.min + vec2(MARGIN, HEADER_H),
            rect.max - vec2(MARGIN, PRESET_H + MARGIN + 12.0),
        );

        self.readout_rect = Rect::from_min_size(
            pos2(body.max.x - READOUT_W, body.min.y),
            vec2(READOUT_W, body.height()),
        );
        self.spectro_rect = Rect::from_min_max(
            pos2(body.min.x + AXIS_W, body.min.y),
            pos2(self.readout_rect.min.x - 6.0, body.max.y),
        );

        self.preset_bar.layout(
            Rect::from_min_size(
                pos2(rect.min.x + MARGIN, rect.max.y - PRESET_H - 4.0),
                vec2(rect.width() - 2.0 * MARGIN, PRESET_H),
            ),
            4,
        );
    }

    /// X center of a visible frame column inside the spectrogram well.
    fn frame_x(&self, frame: usize, frame_count: usize) -> f32 {
        self.spectro_rect.min.x
            + (frame as f32 + 0.5) / frame_count.max(1) as f32 * self.spectro_rect.width()
    }

    /// Y position of a frequency; the bitmap rows are linear in Hz over the
    /// display range.
    fn freq_y(&self, freq: f32, state: &SpectrographState) -> Option<f32> {
        let span = state.max_freq - state.min_freq;
        if !freq.is_finite() || freq <= 0.0 || span <= 0.0 {
            return None;
        }
        let t = ((freq - state.min_freq) / span).clamp(0.0, 1.0);
        Some(self.spectro_rect.max.y - t * self.spectro_rect.height())
    }

    fn draw_freq_axis(&self, painter: &Painter, state: &SpectrographState) {
        let span = state.max_freq - state.min_freq;
        if span <= 0.0 {
            return;
        }
        // Round tick step so 0..5 kHz gets 1 kHz ticks, wider ranges coarser.
        let step = if span > 10_000.0 { 5000.0 } else { 1000.0 };
        let mut freq = (state.min_freq / step).ceil() * step;
        while freq <= state.max_freq {
            if let Some(y) = self.freq_y(freq.max(1.0), state) {
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
            freq += step;
        }
    }

    fn draw_pitch(&self, painter: &Painter, state: &SpectrographState) {
        let Some(pitch) = state.pitch_track.as_deref() else {
            return;
        };
        let frames = state.window.frame_count.min(pitch.len());
        let confidence = state.pitch_confidence.as_deref();

        let mut prev: Option<Pos2> = None;
        for i in 0..frames {
            let Some(y) = self.freq_y(pitch[i], state) else {
                prev = None;
                continue;
            };
            let p = pos2(self.frame_x(i, state.window.frame_count), y);
            if let Some(q) = prev {
                let alpha = confidence
                    .and_then(|c| c.get(i).copied())
                    .filter(|c| c.is_finite())
                    .map_or(1.0, |c| c.clamp(0.2, 1.0));
                painter.line_segment(
                    [q, p],
                    Stroke::new(1.5, theme::PITCH_TRACK.gamma_multiply(alpha)),
                );
            }
            prev = Some(p);
        }
    }

    fn draw_harmonics(&self, painter: &Painter, state: &SpectrographState) {
        let per = state.harmonics_per_frame;
        let (Some(freqs), Some(mags)) = (
            state.harmonic_freqs.as_deref(),
            state.harmonic_mags.as_deref(),
        ) else {
            return;
        };
        if per == 0 || freqs.len() != mags.len() {
            return;
        }
        let frames = state.window.frame_count.min(freqs.len() / per);
        for i in 0..frames {
            let x = self.frame_x(i, state.window.frame_count);
            for h in 0..per {
                let idx = i * per + h;
                let Some(y) = self.freq_y(freqs[idx], state) else {
                    continue;
                };
                let mag = mags[idx];
                if !mag.is_finite() || mag <= 0.0 {
                    continue;
                }
                painter.circle_filled(
                    pos2(x, y),
                    1.0,
                    theme::HARMONIC.gamma_multiply(mag.clamp(0.1, 1.0)),
                );
            }
        }
    }

    fn draw_formants(&self, painter: &Painter, state: &SpectrographState) {
        let per = state.formants_per_frame;
        let Some(freqs) = state.formant_freqs.as_deref() else {
            return;
        };
        if per == 0 {
            return;
        }
        let bandwidths = state
            .formant_bandwidths
            .as_deref()
            .filter(|b| b.len() == freqs.len());
        let frames = state.window.frame_count.min(freqs.len() / per);

        // One polyline per formant index across the window.
        for f in 0..per {
            let mut prev: Option<Pos2> = None;
            for i in 0..frames {
                let idx = i * per + f;
                let Some(y) = self.freq_y(freqs[idx], state) else {
                    prev = None;
                    continue;
                };
                let p = pos2(self.frame_x(i, state.window.frame_count), y);
                if let Some(q) = prev {
                    painter.line_segment(
                        [q, p],
                        Stroke::new(1.2, theme::FORMANT.gamma_multiply(0.8)),
                    );
                }
                // Bandwidth shading around the formant center.
                if let Some(bw) = bandwidths.and_then(|b| b.get(idx).copied()) {
                    if bw.is_finite() && bw > 0.0 {
                        let half = bw / 2.0;
                        if let (Some(y0), Some(y1)) = (
                            self.freq_y(freqs[idx] + half, state),
                            self.freq_y(freqs[idx] - half, state),
                        ) {
                            painter.line_segment(
                                [pos2(p.x, y0), pos2(p.x, y1)],
                                Stroke::new(1.0, theme::FORMANT.gamma_multiply(0.15)),
                            );
                        }
                    }
                }
                prev = Some(p);
            }
        }
    }

    fn latest_track_value(track: Option<&[f32]>, frames: usize) -> Option<f32> {
        let track = track?;
        let n = frames.min(track.len());
        track[..n]
            .iter()
            .rev()
            .copied()
            .find(|v| v.is_finite() && *v > 0.0)
    }

    fn draw_readouts(&self, painter: &Painter, state: &SpectrographState) {
        well(painter, self.readout_rect);
        let frames = state.window.frame_count;

        let pitch = Self::latest_track_value(state.pitch_track.as_deref(), frames);
        let hnr = state
            .hnr_track
            .as_deref()
            .and_then(|t| t.last().copied())
            .filter(|v| v.is_finite());
        let cpp = state
            .cpp_track
            .as_deref()
            .and_then(|t| t.last().copied())
            .filter(|v| v.is_finite());

        let rows: [(&str, String); 4] = [
            ("NOTE", pitch.map_or_else(|| "--".to_string(), note_name)),
            (
                "PITCH",
                pitch.map_or_else(|| "--".to_string(), |f| format!("{:.1} Hz", f)),
            ),
            ("HNR", hnr.map_or_else(|| "--".to_string(), format_db)),
            ("CPP", cpp.map_or_else(|| "--".to_string(), format_db)),
        ];

        let mut y = self.readout_rect.min.y + 8.0;
        for (label, value) in rows {
            painter.text(
                pos2(self.readout_rect.min.x + 6.0, y),
                Align2::LEFT_TOP,
                label,
                FontId::proportional(8.0),
                theme::TEXT_DIM,
            );
            painter.text(
                pos2(self.readout_rect.max.x - 6.0, y + 10.0),
                Align2::RIGHT_TOP,
                value,
                FontId::monospace(11.0),
                theme::TEXT,
            );
            y += 30.0;
        }
    }
}

impl PluginRenderer for SpectrographRenderer {
    type State = SpectrographState;

    fn preferred_size(&self) -> Vec2 {
        vec2(620.0, 380.0)
    }

    fn render(
        &mut self,
        painter: &Painter,
        rect: Rect,
        pixels_per_point: f32,
        state: &SpectrographState,
    ) {
        self.layout(rect);
        panel(painter, rect);
        title(painter, rect, "Vocal Spectrograph", state.bypass);

        let sig = FrameSignature::of(&state.window, state.palette, state.tone);
        self.spectro.update(sig, state.window.spectrogram.as_deref());

        well(painter, self.spectro_rect);
        let blit = snap_to_pixels(self.spectro_rect.shrink(1.0), pixels_per_point);
        self.spectro.paint(painter, blit, false);

        self.draw_freq_axis(painter, state);
        if state.show_formants {
            self.draw_formants(painter, state);
        }
        if state.show_harmonics {
            self.draw_harmonics(painter, state);
        }
        if state.show_pitch {
            self.draw_pitch(painter, state);
        }

        self.draw_readouts(painter, state);
        self.preset_bar.paint(painter, None, state.bypass);
    }

    fn hit_test(&self, pos: Pos2) -> HitRegion {
        if self.spectro_rect.contains(pos) {
            return HitRegion::Spectrogram;
        }
        self.preset_bar.hit_test(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn laid_out() -> SpectrographRenderer {
        let mut r = SpectrographRenderer::new();
        r.layout(Rect::from_min_size(pos2(0.0, 0.0), r.preferred_size()));
        r
    }

    fn state() -> SpectrographState {
        SpectrographState {
            min_freq: 0.0,
            max_freq: 5000.0,
            ..Default::default()
        }
    }

    #[test]
    fn freq_y_spans_the_well() {
        let r = laid_out();
        let s = state();
        let low = r.freq_y(1.0, &s).unwrap();
        let high = r.freq_y(5000.0, &s).unwrap();
        assert!(low > high);
        assert!((high - r.spectro_rect.min.y).abs() < 1.0);
    }

    #[test]
    fn freq_y_rejects_undetected_frames() {
        let r = laid_out();
        let s = state();
        assert_eq!(r.freq_y(0.0, &s), None);
        assert_eq!(r.freq_y(-1.0, &s), None);
        assert_eq!(r.freq_y(f32::NAN, &s), None);
    }

    #[test]
    fn latest_track_value_skips_trailing_gaps() {
        let track = [110.0f32, 220.0, 0.0, f32::NAN];
        assert_eq!(
            SpectrographRenderer::latest_track_value(Some(&track), 4),
            Some(220.0)
        );
        assert_eq!(SpectrographRenderer::latest_track_value(None, 4), None);
        assert_eq!(
            SpectrographRenderer::latest_track_value(Some(&[]), 4),
            None
        );
    }

    #[test]
    fn spectrogram_area_hit() {
        let r = laid_out();
        assert_eq!(r.hit_test(r.spectro_rect.center()), HitRegion::Spectrogram);
        assert_eq!(r.hit_test(pos2(1.0, 1.0)), HitRegion::None);
    }
}
