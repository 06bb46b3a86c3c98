//! Scrolling spectrogram bitmap pipeline.
//!
//! Maintains a false-colored `ColorImage` of the visible analysis window
//! without reallocating or repainting every frame. Columns live in a ring:
//! the column for visible frame `i` (0 = oldest) is `(i + ring_start) %
//! width`, so a new frame only recolors one column and bumps `ring_start`
//! instead of shifting pixel memory. Presentation splits the texture into two
//! side-by-side sub-rectangle draws when the ring start is non-zero.

use std::sync::Arc;

use egui::{Color32, ColorImage, Painter, Rect, TextureHandle, TextureOptions, pos2};
use voxrack_types::display::{SpectroPalette, ToneCurve};
use voxrack_types::state::SpectroWindow;

use crate::palette::{PaletteCache, PaletteLut, ToneLut, build_tone_lut};

/// Everything the bitmap depends on, compared by value to decide whether any
/// repaint work is needed at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSignature {
    pub frame_count: usize,
    pub bins: usize,
    pub palette: SpectroPalette,
    pub tone: ToneCurve,
    pub latest_frame: u64,
    pub available: usize,
}

impl FrameSignature {
    pub fn of(window: &SpectroWindow, palette: SpectroPalette, tone: ToneCurve) -> Self {
        Self {
            frame_count: window.frame_count,
            bins: window.bins,
            palette,
            tone,
            latest_frame: window.latest_frame,
            available: window.available,
        }
    }

    fn display_params_match(&self, other: &FrameSignature) -> bool {
        self.frame_count == other.frame_count
            && self.bins == other.bins
            && self.palette == other.palette
            && self.tone == other.tone
    }
}

/// What an [`SpectrogramImage::update`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectroUpdate {
    /// Signature unchanged since last call; nothing touched.
    Unchanged,
    /// Magnitude array missing or shorter than frames x bins.
    NotReady,
    /// No frames available; buffer cleared to transparent.
    Cleared,
    /// Every column repainted.
    Full,
    /// Only the newest `n` columns repainted.
    Incremental(usize),
}

/// Ring-buffered spectrogram bitmap plus its lookup tables and texture.
pub struct SpectrogramImage {
    image: ColorImage,
    ring_start: usize,
    last_sig: Option<FrameSignature>,

    palettes: PaletteCache,
    palette_lut: Arc<PaletteLut>,
    palette_key: Option<SpectroPalette>,
    tone_lut: ToneLut,
    tone_key: Option<ToneCurve>,

    texture: Option<TextureHandle>,
    texture_dirty: bool,
}

impl Default for SpectrogramImage {
    fn default() -> Self {
        Self::new()
    }
}

impl SpectrogramImage {
    pub fn new() -> Self {
        let mut palettes = PaletteCache::new();
        let palette_lut = palettes.get(SpectroPalette::default());
        Self {
            image: ColorImage::filled([0, 0], Color32::TRANSPARENT),
            ring_start: 0,
            last_sig: None,
            palettes,
            palette_lut,
            palette_key: None,
            tone_lut: build_tone_lut(&ToneCurve::default()),
            tone_key: Some(ToneCurve::default()),
            texture: None,
            texture_dirty: false,
        }
    }

    pub fn width(&self) -> usize {
        self.image.width()
    }

    pub fn bins(&self) -> usize {
        self.image.height()
    }

    pub fn ring_start(&self) -> usize {
        self.ring_start
    }

    /// Backing pixels, row-major, for tests and the bloom pass.
    pub fn image(&self) -> &ColorImage {
        &self.image
    }

    /// Color the current palette and tone curve assign to a normalized
    /// magnitude. Used by colorbar legends.
    pub fn sample(&self, magnitude: f32) -> Color32 {
        self.color_of(magnitude)
    }

    /// Physical column index holding visible frame `i` (0 = oldest).
    pub fn column_for(&self, visible: usize) -> usize {
        let w = self.image.width().max(1);
        (visible + self.ring_start) % w
    }

    /// Pixels of one visible column, bottom bin first.
    pub fn column_pixels(&self, visible: usize) -> Vec<Color32> {
        let w = self.image.width();
        let h = self.image.height();
        if w == 0 {
            return Vec::new();
        }
        let col = self.column_for(visible);
        (0..h)
            .map(|bin| self.image.pixels[(h - 1 - bin) * w + col])
            .collect()
    }

    fn ensure_luts(&mut self, palette: SpectroPalette, tone: &ToneCurve) {
        if self.palette_key != Some(palette) {
            self.palette_lut = self.palettes.get(palette);
            self.palette_key = Some(palette);
        }
        if self.tone_key.as_ref() != Some(tone) {
            self.tone_lut = build_tone_lut(tone);
            self.tone_key = Some(*tone);
        }
    }

    fn color_of(&self, magnitude: f32) -> Color32 {
        let mag = if magnitude.is_finite() {
            magnitude.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let q = (mag * 255.0) as u8;
        self.palette_lut[self.tone_lut[q as usize] as usize]
    }

    /// Recolor one visible column from the magnitude window. Columns holding
    /// frames the engine hasn't produced yet are cleared instead.
    fn paint_column(&mut self, visible: usize, sig: &FrameSignature, data: &[f32]) {
        let w = sig.frame_count;
        let h = sig.bins;
        let col = self.column_for(visible);
        let empty = visible < w.saturating_sub(sig.available);

        for bin in 0..h {
            let color = if empty {
                Color32::TRANSPARENT
            } else {
                self.color_of(data[visible * h + bin])
            };
            self.image.pixels[(h - 1 - bin) * w + col] = color;
        }
    }

    fn clear(&mut self) {
        for px in &mut self.image.pixels {
            *px = Color32::TRANSPARENT;
        }
        self.ring_start = 0;
    }

    /// Bring the bitmap up to date with the engine window. All work is gated
    /// on the signature; an unchanged signature returns immediately.
    pub fn update(&mut self, sig: FrameSignature, data: Option<&[f32]>) -> SpectroUpdate {
        if self.last_sig == Some(sig) {
            return SpectroUpdate::Unchanged;
        }
        if sig.frame_count == 0 || sig.bins == 0 {
            return SpectroUpdate::NotReady;
        }

        self.ensure_luts(sig.palette, &sig.tone);

        let resized = self.image.width() != sig.frame_count || self.image.height() != sig.bins;
        if resized {
            self.image = ColorImage::filled([sig.frame_count, sig.bins], Color32::TRANSPARENT);
            self.ring_start = 0;
        }

        if sig.available == 0 {
            self.clear();
            self.last_sig = Some(sig);
            self.texture_dirty = true;
            return SpectroUpdate::Cleared;
        }

        let data = match data {
            Some(d) if d.len() >= sig.frame_count * sig.bins => d,
            _ => {
                // Engine hasn't filled the window yet; keep what we have.
                return SpectroUpdate::NotReady;
            }
        };

        let incremental_delta = self.last_sig.as_ref().and_then(|prev| {
            if resized || !prev.display_params_match(&sig) {
                return None; // size or display parameters changed
            }
            if sig.latest_frame < prev.latest_frame {
                return None; // engine reset / seek backwards
            }
            let delta = (sig.latest_frame - prev.latest_frame) as usize;
            if delta == 0 || delta >= sig.frame_count {
                return None;
            }
            // Frame continuity also requires the fill level to have advanced
            // in step; anything else gets the full repaint.
            let expected = (prev.available + delta).min(sig.frame_count);
            if sig.available != expected {
                return None;
            }
            Some(delta)
        });

        let update = match incremental_delta {
            Some(delta) => {
                self.ring_start = (self.ring_start + delta) % sig.frame_count;
                for visible in (sig.frame_count - delta)..sig.frame_count {
                    self.paint_column(visible, &sig, data);
                }
                tracing::trace!(delta, ring_start = self.ring_start, "spectrogram scroll");
                SpectroUpdate::Incremental(delta)
            }
            None => {
                self.ring_start = 0;
                for visible in 0..sig.frame_count {
                    self.paint_column(visible, &sig, data);
                }
                tracing::debug!(
                    frames = sig.frame_count,
                    bins = sig.bins,
                    "spectrogram full rebuild"
                );
                SpectroUpdate::Full
            }
        };

        self.last_sig = Some(sig);
        self.texture_dirty = true;
        update
    }

    /// Upload (if dirty) and blit into `rect`. The ring split becomes two
    /// sub-rectangle draws with matching UV windows; pixel memory is never
    /// shifted.
    pub fn paint(&mut self, painter: &Painter, rect: Rect, bloom: bool) {
        let w = self.image.width();
        if w == 0 || self.image.height() == 0 {
            return;
        }

        if self.texture.is_none() {
            self.texture = Some(painter.ctx().load_texture(
                "spectrogram",
                self.image.clone(),
                TextureOptions::LINEAR,
            ));
            self.texture_dirty = false;
        } else if self.texture_dirty {
            if let Some(texture) = &mut self.texture {
                texture.set(self.image.clone(), TextureOptions::LINEAR);
            }
            self.texture_dirty = false;
        }

        self.blit(painter, rect, Color32::WHITE);
        if bloom {
            // Cheap bloom: translucent additive re-draws, slightly inflated.
            for (expand, alpha) in [(1.5, 0.20), (3.0, 0.10)] {
                self.blit(painter, rect.expand(expand), Color32::WHITE.gamma_multiply(alpha));
            }
        }
    }

    fn blit(&self, painter: &Painter, rect: Rect, tint: Color32) {
        let Some(texture) = &self.texture else {
            return;
        };
        let w = self.image.width() as f32;
        let split = self.ring_start as f32 / w;

        if self.ring_start == 0 {
            painter.image(
                texture.id(),
                rect,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                tint,
            );
            return;
        }

        // Oldest frames live at texture columns [ring_start, w); they occupy
        // the left part of the destination.
        let left_frac = 1.0 - split;
        let mid_x = rect.min.x + rect.width() * left_frac;
        let left_dst = Rect::from_min_max(rect.min, pos2(mid_x, rect.max.y));
        let right_dst = Rect::from_min_max(pos2(mid_x, rect.min.y), rect.max);

        painter.image(
            texture.id(),
            left_dst,
            Rect::from_min_max(pos2(split, 0.0), pos2(1.0, 1.0)),
            tint,
        );
        painter.image(
            texture.id(),
            right_dst,
            Rect::from_min_max(pos2(0.0, 0.0), pos2(split, 1.0)),
            tint,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::build_palette_lut;

    const W: usize = 8;
    const BINS: usize = 4;

    /// Deterministic magnitude for a global frame id and bin.
    fn magnitude(frame: u64, bin: usize) -> f32 {
        (((frame as usize * 31 + bin * 7) % 256) as f32) / 255.0
    }

    /// Build the visible window ending at `latest`.
    fn window_data(latest: u64) -> Vec<f32> {
        let mut data = vec![0.0f32; W * BINS];
        for i in 0..W {
            let frame = latest - (W - 1 - i) as u64;
            for bin in 0..BINS {
                data[i * BINS + bin] = magnitude(frame, bin);
            }
        }
        data
    }

    fn sig(latest: u64, available: usize) -> FrameSignature {
        FrameSignature {
            frame_count: W,
            bins: BINS,
            palette: SpectroPalette::Grayscale,
            tone: ToneCurve::default(),
            latest_frame: latest,
            available,
        }
    }

    fn expected_color(frame: u64, bin: usize) -> Color32 {
        let lut = build_palette_lut(SpectroPalette::Grayscale);
        let q = (magnitude(frame, bin).clamp(0.0, 1.0) * 255.0) as u8;
        lut[q as usize]
    }

    #[test]
    fn zero_available_clears_and_resets_ring() {
        let mut spectro = SpectrogramImage::new();
        assert_eq!(
            spectro.update(sig(100, W), Some(&window_data(100))),
            SpectroUpdate::Full
        );

        let result = spectro.update(sig(100, 0), None);
        assert_eq!(result, SpectroUpdate::Cleared);
        assert_eq!(spectro.ring_start(), 0);
        assert!(spectro.image().pixels.iter().all(|&p| p == Color32::TRANSPARENT));
    }

    #[test]
    fn short_array_is_not_ready() {
        let mut spectro = SpectrogramImage::new();
        let short = vec![0.5f32; W * BINS - 1];
        assert_eq!(spectro.update(sig(10, W), Some(&short)), SpectroUpdate::NotReady);
        assert_eq!(spectro.update(sig(10, W), None), SpectroUpdate::NotReady);
    }

    #[test]
    fn full_rebuild_paints_every_column() {
        let mut spectro = SpectrogramImage::new();
        let latest = 50u64;
        spectro.update(sig(latest, W), Some(&window_data(latest)));

        assert_eq!(spectro.ring_start(), 0);
        for i in 0..W {
            let frame = latest - (W - 1 - i) as u64;
            let column = spectro.column_pixels(i);
            for bin in 0..BINS {
                assert_eq!(column[bin], expected_color(frame, bin), "col {} bin {}", i, bin);
            }
        }
    }

    #[test]
    fn unchanged_signature_short_circuits() {
        let mut spectro = SpectrogramImage::new();
        let data = window_data(42);
        spectro.update(sig(42, W), Some(&data));
        let before = spectro.image().pixels.clone();
        let ring = spectro.ring_start();

        assert_eq!(spectro.update(sig(42, W), Some(&data)), SpectroUpdate::Unchanged);
        assert_eq!(spectro.image().pixels, before);
        assert_eq!(spectro.ring_start(), ring);
    }

    #[test]
    fn incremental_touches_exactly_delta_columns() {
        let mut spectro = SpectrogramImage::new();
        let first = 100u64;
        spectro.update(sig(first, W), Some(&window_data(first)));
        let before = spectro.image().pixels.clone();

        let delta = 3usize;
        let latest = first + delta as u64;
        let result = spectro.update(sig(latest, W), Some(&window_data(latest)));
        assert_eq!(result, SpectroUpdate::Incremental(delta));
        assert_eq!(spectro.ring_start(), delta % W);

        // The delta newest visible columns were recolored in place; their
        // physical columns are exactly the ones that changed.
        let mut repainted: Vec<usize> = ((W - delta)..W).map(|i| spectro.column_for(i)).collect();
        repainted.sort_unstable();

        let w = spectro.width();
        let h = spectro.bins();
        for col in 0..w {
            let changed = (0..h).any(|row| spectro.image().pixels[row * w + col] != before[row * w + col]);
            if repainted.contains(&col) {
                assert!(changed, "column {} should have been repainted", col);
            } else {
                assert!(!changed, "column {} must be bit-identical", col);
            }
        }

        // And the visible content matches the advanced window.
        for i in 0..W {
            let frame = latest - (W - 1 - i) as u64;
            let column = spectro.column_pixels(i);
            for bin in 0..BINS {
                assert_eq!(column[bin], expected_color(frame, bin));
            }
        }
    }

    #[test]
    fn ring_start_stays_in_range_across_many_updates() {
        let mut spectro = SpectrogramImage::new();
        let mut latest = 10u64;
        spectro.update(sig(latest, W), Some(&window_data(latest)));

        for step in [1u64, 2, 3, 5, 7, 1, 6, 4, 2, 3] {
            latest += step;
            spectro.update(sig(latest, W), Some(&window_data(latest)));
            assert!(spectro.ring_start() < W);
            // Newest column always holds the latest frame.
            let newest = spectro.column_pixels(W - 1);
            assert_eq!(newest[0], expected_color(latest, 0));
        }
    }

    #[test]
    fn backward_jump_forces_full_rebuild() {
        let mut spectro = SpectrogramImage::new();
        spectro.update(sig(100, W), Some(&window_data(100)));
        spectro.update(sig(103, W), Some(&window_data(103)));
        assert_ne!(spectro.ring_start(), 0);

        let result = spectro.update(sig(90, W), Some(&window_data(90)));
        assert_eq!(result, SpectroUpdate::Full);
        assert_eq!(spectro.ring_start(), 0);
    }

    #[test]
    fn large_delta_forces_full_rebuild() {
        let mut spectro = SpectrogramImage::new();
        spectro.update(sig(100, W), Some(&window_data(100)));
        let result = spectro.update(sig(100 + W as u64, W), Some(&window_data(100 + W as u64)));
        assert_eq!(result, SpectroUpdate::Full);
    }

    #[test]
    fn display_param_change_forces_full_rebuild() {
        let mut spectro = SpectrogramImage::new();
        spectro.update(sig(100, W), Some(&window_data(100)));
        spectro.update(sig(102, W), Some(&window_data(102)));

        let mut changed = sig(103, W);
        changed.tone.gamma = 0.5;
        let result = spectro.update(changed, Some(&window_data(103)));
        assert_eq!(result, SpectroUpdate::Full);
        assert_eq!(spectro.ring_start(), 0);
    }

    #[test]
    fn partially_available_window_leaves_old_columns_transparent() {
        let mut spectro = SpectrogramImage::new();
        let available = 3usize;
        spectro.update(sig(2, available), Some(&window_data(W as u64)));

        for i in 0..(W - available) {
            let column = spectro.column_pixels(i);
            assert!(column.iter().all(|&p| p == Color32::TRANSPARENT), "col {}", i);
        }
        for i in (W - available)..W {
            let column = spectro.column_pixels(i);
            assert!(column.iter().any(|&p| p != Color32::TRANSPARENT), "col {}", i);
        }
    }

    #[test]
    fn column_mapping_matches_invariant() {
        let mut spectro = SpectrogramImage::new();
        spectro.update(sig(100, W), Some(&window_data(100)));
        spectro.update(sig(105, W), Some(&window_data(105)));
        let ring = spectro.ring_start();
        for i in 0..W {
            assert_eq!(spectro.column_for(i), (i + ring) % W);
        }
    }
}
