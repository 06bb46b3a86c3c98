//! False-color palette tables for the spectrogram displays.
//!
//! A palette is described by a handful of RGB stops; the 256-entry table is
//! interpolated between them in OKLAB space so the ramp stays perceptually
//! even. Tables are built once per palette and memoized in an explicit cache
//! owned by the renderer, not in process-wide static state.

use std::collections::HashMap;
use std::sync::Arc;

use egui::Color32;
use voxrack_types::display::{SpectroPalette, ToneCurve};

/// 256-entry magnitude-to-color table.
pub type PaletteLut = [Color32; 256];
/// 256-entry tone-curve table applied to the 8-bit magnitude first.
pub type ToneLut = [u8; 256];

/// RGB gradient stops per palette, dark to bright.
fn stops(palette: SpectroPalette) -> &'static [[u8; 3]] {
    match palette {
        SpectroPalette::Ember => &[
            [0, 0, 4],
            [64, 10, 60],
            [150, 40, 60],
            [230, 120, 40],
            [252, 230, 160],
        ],
        SpectroPalette::Glacier => &[
            [2, 4, 10],
            [20, 40, 90],
            [30, 110, 170],
            [90, 190, 220],
            [230, 250, 255],
        ],
        SpectroPalette::Moss => &[
            [0, 4, 2],
            [12, 60, 40],
            [40, 130, 70],
            [140, 200, 90],
            [245, 252, 210],
        ],
        SpectroPalette::Violet => &[
            [4, 0, 8],
            [60, 16, 100],
            [140, 50, 160],
            [220, 110, 190],
            [255, 225, 245],
        ],
        SpectroPalette::Grayscale => &[[0, 0, 0], [255, 255, 255]],
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// sRGB 0..255 to OKLAB.
fn rgb_to_oklab(rgb: [u8; 3]) -> [f32; 3] {
    let r = srgb_to_linear(rgb[0] as f32 / 255.0);
    let g = srgb_to_linear(rgb[1] as f32 / 255.0);
    let b = srgb_to_linear(rgb[2] as f32 / 255.0);

    let l = (0.412_221_47 * r + 0.536_332_54 * g + 0.051_445_995 * b).cbrt();
    let m = (0.211_903_5 * r + 0.680_699_55 * g + 0.107_396_96 * b).cbrt();
    let s = (0.088_302_46 * r + 0.281_718_84 * g + 0.629_978_7 * b).cbrt();

    [
        0.210_454_26 * l + 0.793_617_8 * m - 0.004_072_047 * s,
        1.977_998_5 * l - 2.428_592_2 * m + 0.450_593_7 * s,
        0.025_904_037 * l + 0.782_771_77 * m - 0.808_675_77 * s,
    ]
}

/// OKLAB to sRGB 0..255, gamut-clamped.
fn oklab_to_rgb(lab: [f32; 3]) -> [u8; 3] {
    let l = lab[0] + 0.396_337_78 * lab[1] + 0.215_803_76 * lab[2];
    let m = lab[0] - 0.105_561_346 * lab[1] - 0.063_854_17 * lab[2];
    let s = lab[0] - 0.089_484_18 * lab[1] - 1.291_485_5 * lab[2];

    let l = l * l * l;
    let m = m * m * m;
    let s = s * s * s;

    let r = 4.076_741_7 * l - 3.307_711_6 * m + 0.230_759_05 * s;
    let g = -1.268_438 * l + 2.609_757_4 * m - 0.341_319_38 * s;
    let b = -0.004_196_086_3 * l - 0.703_418_6 * m + 1.707_614_7 * s;

    [
        (linear_to_srgb(r.clamp(0.0, 1.0)) * 255.0).round() as u8,
        (linear_to_srgb(g.clamp(0.0, 1.0)) * 255.0).round() as u8,
        (linear_to_srgb(b.clamp(0.0, 1.0)) * 255.0).round() as u8,
    ]
}

/// Build the 256-entry table for a palette.
pub fn build_palette_lut(palette: SpectroPalette) -> PaletteLut {
    let stops = stops(palette);
    let labs: Vec<[f32; 3]> = stops.iter().map(|&rgb| rgb_to_oklab(rgb)).collect();
    let segments = labs.len() - 1;

    let mut lut = [Color32::BLACK; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        let t = i as f32 / 255.0;
        let scaled = t * segments as f32;
        let seg = (scaled as usize).min(segments - 1);
        let frac = scaled - seg as f32;

        let a = labs[seg];
        let b = labs[seg + 1];
        let lab = [
            a[0] + (b[0] - a[0]) * frac,
            a[1] + (b[1] - a[1]) * frac,
            a[2] + (b[2] - a[2]) * frac,
        ];
        let rgb = oklab_to_rgb(lab);
        *entry = Color32::from_rgb(rgb[0], rgb[1], rgb[2]);
    }
    lut
}

/// Build the tone-curve table: brightness multiply, gamma power, contrast
/// around the 0.5 pivot, then level quantization.
pub fn build_tone_lut(tone: &ToneCurve) -> ToneLut {
    let levels = tone.levels.clamp(2, 256);
    let gamma = if tone.gamma > 0.0 { tone.gamma } else { 1.0 };

    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        let mut v = i as f32 / 255.0;
        v = (v * tone.brightness).clamp(0.0, 1.0);
        v = v.powf(gamma);
        v = ((v - 0.5) * tone.contrast + 0.5).clamp(0.0, 1.0);
        v = (v * (levels - 1) as f32).round() / (levels - 1) as f32;
        *entry = (v * 255.0).round() as u8;
    }
    lut
}

/// Memoized palette tables, owned by whoever draws spectrograms.
#[derive(Default)]
pub struct PaletteCache {
    tables: HashMap<SpectroPalette, Arc<PaletteLut>>,
}

impl PaletteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the table for a palette, building it on first use.
    pub fn get(&mut self, palette: SpectroPalette) -> Arc<PaletteLut> {
        self.tables
            .entry(palette)
            .or_insert_with(|| Arc::new(build_palette_lut(palette)))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_lut_endpoints_match_stops() {
        for palette in SpectroPalette::ALL {
            let lut = build_palette_lut(palette);
            let stops = stops(palette);
            let first = stops[0];
            let last = stops[stops.len() - 1];
            // Round-tripping through OKLAB may move a channel by a couple of
            // 8-bit steps.
            let close = |c: Color32, rgb: [u8; 3]| {
                (c.r() as i32 - rgb[0] as i32).abs() <= 2
                    && (c.g() as i32 - rgb[1] as i32).abs() <= 2
                    && (c.b() as i32 - rgb[2] as i32).abs() <= 2
            };
            assert!(close(lut[0], first), "{:?} low endpoint", palette);
            assert!(close(lut[255], last), "{:?} high endpoint", palette);
        }
    }

    #[test]
    fn grayscale_is_monotonic() {
        let lut = build_palette_lut(SpectroPalette::Grayscale);
        for i in 1..256 {
            assert!(lut[i].r() >= lut[i - 1].r());
        }
    }

    #[test]
    fn identity_tone_lut_is_identity() {
        let lut = build_tone_lut(&ToneCurve::default());
        for (i, &v) in lut.iter().enumerate() {
            assert_eq!(v as usize, i);
        }
    }

    #[test]
    fn identity_tone_curve_reproduces_palette_lut() {
        let palette = build_palette_lut(SpectroPalette::Ember);
        let tone = build_tone_lut(&ToneCurve::default());
        for i in 0..256 {
            assert_eq!(palette[tone[i] as usize], palette[i]);
        }
    }

    #[test]
    fn tone_lut_quantizes_levels() {
        let tone = ToneCurve {
            levels: 4,
            ..ToneCurve::default()
        };
        let lut = build_tone_lut(&tone);
        let mut distinct: Vec<u8> = lut.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        assert_eq!(distinct.len(), 4);
    }

    #[test]
    fn tone_lut_brightness_saturates() {
        let tone = ToneCurve {
            brightness: 2.0,
            ..ToneCurve::default()
        };
        let lut = build_tone_lut(&tone);
        assert_eq!(lut[128], 255);
        assert_eq!(lut[255], 255);
        assert_eq!(lut[0], 0);
    }

    #[test]
    fn cache_returns_shared_table() {
        let mut cache = PaletteCache::new();
        let a = cache.get(SpectroPalette::Glacier);
        let b = cache.get(SpectroPalette::Glacier);
        assert!(Arc::ptr_eq(&a, &b));
    }
}
