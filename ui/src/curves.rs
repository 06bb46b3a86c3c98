//! Closed-form response curves for the EQ, compressor and gate displays.
//!
//! These are visualization approximations evaluated per drawn sample, not
//! live filters. The engine runs the real filters; the curves here only have
//! to look right and hit the exact threshold/ratio/knee arithmetic.

use voxrack_types::display::{EqBandShape, FreqScale};
use voxrack_types::state::EqBand;

/// Downward expansion slope used for the gate transfer display.
const GATE_EXPANSION_RATIO: f32 = 4.0;

/// Soft-knee compressor transfer function: output dB for an input dB.
///
/// Below `threshold - knee/2` the curve is unity; above `threshold + knee/2`
/// it has slope `1/ratio`; inside the knee it is the standard quadratic blend.
pub fn comp_transfer_db(input_db: f32, threshold_db: f32, ratio: f32, knee_db: f32) -> f32 {
    let ratio = ratio.max(1.0);
    let knee = knee_db.max(0.0);
    let over = input_db - threshold_db;

    if 2.0 * over < -knee {
        input_db
    } else if 2.0 * over.abs() <= knee && knee > 0.0 {
        let t = over + knee / 2.0;
        input_db + (1.0 / ratio - 1.0) * t * t / (2.0 * knee)
    } else {
        threshold_db + over / ratio
    }
}

/// Gain reduction in dB (negative or zero) for an input level.
pub fn comp_reduction_db(input_db: f32, threshold_db: f32, ratio: f32, knee_db: f32) -> f32 {
    comp_transfer_db(input_db, threshold_db, ratio, knee_db) - input_db
}

/// Gate transfer function: hard downward expansion below threshold, limited
/// to `range_db` of attenuation (range is negative).
pub fn gate_transfer_db(input_db: f32, threshold_db: f32, range_db: f32) -> f32 {
    if input_db >= threshold_db {
        input_db
    } else {
        let expanded = threshold_db + (input_db - threshold_db) * GATE_EXPANSION_RATIO;
        expanded.max(input_db + range_db.min(0.0))
    }
}

/// Magnitude response of a single EQ band at `freq`, in dB.
pub fn band_response_db(band: &EqBand, freq: f32) -> f32 {
    if !band.enabled || !freq.is_finite() || freq <= 0.0 || band.freq <= 0.0 {
        return 0.0;
    }
    let q = band.q.max(0.1);
    // Distance from the band center in octaves.
    let octaves = (freq / band.freq).ln() / std::f32::consts::LN_2;
    match band.shape {
        EqBandShape::Bell => {
            let x = octaves * 2.0 * q;
            band.gain_db / (1.0 + x * x)
        }
        EqBandShape::LowShelf => {
            // Full gain well below the corner, zero well above.
            let x = octaves * 2.0 * q;
            band.gain_db * (1.0 - sigmoid(x))
        }
        EqBandShape::HighShelf => {
            let x = octaves * 2.0 * q;
            band.gain_db * sigmoid(x)
        }
    }
}

/// Combined response of all enabled bands at `freq`, in dB.
pub fn eq_response_db(bands: &[EqBand], freq: f32) -> f32 {
    bands.iter().map(|b| band_response_db(b, freq)).sum()
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Map a frequency to 0..1 across the display axis.
pub fn freq_to_norm(freq: f32, min: f32, max: f32, scale: FreqScale) -> f32 {
    if !freq.is_finite() || min <= 0.0 || max <= min {
        return 0.0;
    }
    let t = match scale {
        FreqScale::Logarithmic => (freq / min).ln() / (max / min).ln(),
        FreqScale::Linear => (freq - min) / (max - min),
    };
    t.clamp(0.0, 1.0)
}

/// Inverse of [`freq_to_norm`].
pub fn norm_to_freq(t: f32, min: f32, max: f32, scale: FreqScale) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match scale {
        FreqScale::Logarithmic => min * (max / min).powf(t),
        FreqScale::Linear => min + (max - min) * t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxrack_types::display::EqBandShape;

    #[test]
    fn comp_unity_below_knee() {
        let out = comp_transfer_db(-40.0, -20.0, 4.0, 6.0);
        assert!((out - -40.0).abs() < 1e-6);
    }

    #[test]
    fn comp_slope_above_knee() {
        // -10 dB input, threshold -20, ratio 4: 10 dB over, compressed to 2.5.
        let out = comp_transfer_db(-10.0, -20.0, 4.0, 6.0);
        assert!((out - -17.5).abs() < 1e-4, "got {}", out);
        assert!((comp_reduction_db(-10.0, -20.0, 4.0, 6.0) - -7.5).abs() < 1e-4);
    }

    #[test]
    fn comp_knee_is_continuous() {
        // Values just inside and outside both knee edges should line up.
        let (t, r, k) = (-20.0, 4.0, 6.0);
        for edge in [t - k / 2.0, t + k / 2.0] {
            let below = comp_transfer_db(edge - 0.001, t, r, k);
            let above = comp_transfer_db(edge + 0.001, t, r, k);
            assert!((below - above).abs() < 0.01, "discontinuity at {}", edge);
        }
    }

    #[test]
    fn comp_hard_knee() {
        let out = comp_transfer_db(-15.0, -20.0, 2.0, 0.0);
        assert!((out - -17.5).abs() < 1e-6);
    }

    #[test]
    fn gate_passes_above_threshold() {
        assert_eq!(gate_transfer_db(-20.0, -40.0, -40.0), -20.0);
    }

    #[test]
    fn gate_attenuation_is_range_limited() {
        let out = gate_transfer_db(-60.0, -40.0, -30.0);
        assert!((out - -90.0).abs() < 1e-6);
    }

    #[test]
    fn bell_peaks_at_center() {
        let band = EqBand::new(EqBandShape::Bell, 1000.0, 6.0, 1.0);
        assert!((band_response_db(&band, 1000.0) - 6.0).abs() < 1e-5);
        assert!(band_response_db(&band, 100.0).abs() < 0.2);
        assert!(band_response_db(&band, 10_000.0).abs() < 0.2);
    }

    #[test]
    fn shelves_approach_full_gain() {
        let low = EqBand::new(EqBandShape::LowShelf, 200.0, -9.0, 0.7);
        assert!((band_response_db(&low, 20.0) - -9.0).abs() < 0.1);
        assert!(band_response_db(&low, 10_000.0).abs() < 0.1);

        let high = EqBand::new(EqBandShape::HighShelf, 8000.0, 4.0, 0.7);
        assert!((band_response_db(&high, 20_000.0) - 4.0).abs() < 0.7);
        assert!(band_response_db(&high, 100.0).abs() < 0.1);
    }

    #[test]
    fn disabled_band_is_flat() {
        let mut band = EqBand::new(EqBandShape::Bell, 1000.0, 6.0, 1.0);
        band.enabled = false;
        assert_eq!(band_response_db(&band, 1000.0), 0.0);
    }

    #[test]
    fn response_sums_bands() {
        let bands = [
            EqBand::new(EqBandShape::Bell, 1000.0, 6.0, 1.0),
            EqBand::new(EqBandShape::Bell, 1000.0, -2.0, 1.0),
        ];
        assert!((eq_response_db(&bands, 1000.0) - 4.0).abs() < 1e-5);
    }

    #[test]
    fn freq_norm_roundtrip() {
        for scale in [FreqScale::Logarithmic, FreqScale::Linear] {
            for freq in [20.0f32, 100.0, 1000.0, 9500.0, 20_000.0] {
                let t = freq_to_norm(freq, 20.0, 20_000.0, scale);
                let back = norm_to_freq(t, 20.0, 20_000.0, scale);
                assert!((back / freq - 1.0).abs() < 1e-4, "{:?} {}", scale, freq);
            }
        }
    }

    #[test]
    fn freq_norm_guards_bad_input() {
        assert_eq!(
            freq_to_norm(f32::NAN, 20.0, 20_000.0, FreqScale::Logarithmic),
            0.0
        );
        assert_eq!(
            freq_to_norm(1000.0, 0.0, 20_000.0, FreqScale::Logarithmic),
            0.0
        );
    }
}
