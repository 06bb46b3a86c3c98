//! Display-mode enums and view settings.
//!
//! These are the persisted per-window view preferences; serde derives let the
//! host save them with its window layout.

use serde::{Deserialize, Serialize};

use crate::defaults;

/// False-color palette for spectrogram displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpectroPalette {
    #[default]
    Ember,
    Glacier,
    Moss,
    Violet,
    Grayscale,
}

impl SpectroPalette {
    pub const ALL: [SpectroPalette; 5] = [
        SpectroPalette::Ember,
        SpectroPalette::Glacier,
        SpectroPalette::Moss,
        SpectroPalette::Violet,
        SpectroPalette::Grayscale,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SpectroPalette::Ember => "Ember",
            SpectroPalette::Glacier => "Glacier",
            SpectroPalette::Moss => "Moss",
            SpectroPalette::Violet => "Violet",
            SpectroPalette::Grayscale => "Grayscale",
        }
    }
}

/// Frequency axis scale for analyzer displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FreqScale {
    #[default]
    Logarithmic,
    Linear,
}

/// Filter shape of one EQ band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EqBandShape {
    LowShelf,
    Bell,
    HighShelf,
}

impl EqBandShape {
    pub fn label(&self) -> &'static str {
        match self {
            EqBandShape::LowShelf => "LOW SHELF",
            EqBandShape::Bell => "BELL",
            EqBandShape::HighShelf => "HIGH SHELF",
        }
    }
}

/// Drawing mode for the instantaneous spectrum view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpectrumMode {
    #[default]
    Bars,
    Line,
}

/// Tone-curve parameters applied to spectrogram magnitudes before the palette
/// lookup. Compared by value to decide whether the lookup table needs a
/// rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneCurve {
    /// Linear multiplier applied first.
    pub brightness: f32,
    /// Power applied after brightness.
    pub gamma: f32,
    /// Slope around the 0.5 pivot.
    pub contrast: f32,
    /// Number of quantization levels (256 = no visible quantization).
    pub levels: u32,
}

impl Default for ToneCurve {
    fn default() -> Self {
        Self {
            brightness: defaults::DEFAULT_BRIGHTNESS,
            gamma: defaults::DEFAULT_GAMMA,
            contrast: defaults::DEFAULT_CONTRAST,
            levels: defaults::DEFAULT_LEVELS,
        }
    }
}

impl ToneCurve {
    /// True when the curve is the identity mapping on 8-bit values.
    pub fn is_identity(&self) -> bool {
        self.brightness == 1.0 && self.gamma == 1.0 && self.contrast == 1.0 && self.levels >= 256
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_curve_default_is_identity() {
        assert!(ToneCurve::default().is_identity());
    }

    #[test]
    fn palette_roundtrips_through_serde() {
        for palette in SpectroPalette::ALL {
            let json = serde_json::to_string(&palette).unwrap();
            let back: SpectroPalette = serde_json::from_str(&json).unwrap();
            assert_eq!(palette, back);
        }
    }
}
