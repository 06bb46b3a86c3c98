//! Utility functions for dB/linear conversions, value mapping and formatting.

use egui::Color32;
use voxrack_types::defaults::{DB_CEIL, DB_FLOOR};

/// Convert dB to a 0..1 level against the shared meter scale.
pub fn db_to_level(db: f32) -> f32 {
    if !db.is_finite() {
        return 0.0;
    }
    ((db - DB_FLOOR) / (DB_CEIL - DB_FLOOR)).clamp(0.0, 1.0)
}

/// Map a dB value to a y-coordinate within a vertical range.
/// Meters and scales share this mapping so ticks line up.
pub fn db_to_y(db: f32, y_min: f32, y_max: f32) -> f32 {
    let db = if db.is_finite() { db } else { DB_FLOOR };
    let normalized = ((db - DB_FLOOR) / (DB_CEIL - DB_FLOOR)).clamp(0.0, 1.0);
    y_max - normalized * (y_max - y_min)
}

/// Convert linear amplitude to dB, clamped to the meter floor.
pub fn linear_to_db(linear: f32) -> f32 {
    if !linear.is_finite() || linear <= 0.001 {
        DB_FLOOR
    } else {
        20.0 * linear.log10()
    }
}

/// Convert dB to linear amplitude.
pub fn db_to_linear(db: f32) -> f32 {
    if !db.is_finite() || db <= DB_FLOOR {
        0.0
    } else {
        10.0_f32.powf(db / 20.0)
    }
}

/// Format a dB value for readouts.
pub fn format_db(db: f32) -> String {
    if !db.is_finite() || db <= DB_FLOOR {
        "-inf dB".to_string()
    } else {
        format!("{:.1} dB", db)
    }
}

/// Format a frequency for readouts (Hz below 1 kHz, kHz above).
pub fn format_hz(freq: f32) -> String {
    if !freq.is_finite() || freq <= 0.0 {
        "--".to_string()
    } else if freq < 1000.0 {
        format!("{:.0} Hz", freq)
    } else {
        format!("{:.2} kHz", freq / 1000.0)
    }
}

/// Level-meter gradient: green through yellow to red.
pub fn level_to_color(level: f32) -> Color32 {
    if level < 0.7 {
        Color32::from_rgb(0, 200, 0)
    } else if level < 0.85 {
        Color32::from_rgb(255, 220, 0)
    } else if level < 0.9 {
        Color32::from_rgb(255, 165, 0)
    } else {
        Color32::from_rgb(255, 0, 0)
    }
}

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Format a frequency as the nearest note name with cent offset.
/// Returns "--" when the frequency is unusable.
pub fn note_name(freq: f32) -> String {
    if !freq.is_finite() || freq <= 0.0 {
        return "--".to_string();
    }
    let midi = 69.0 + 12.0 * (freq / 440.0).log2();
    if !midi.is_finite() || midi < 0.0 || midi > 127.0 {
        return "--".to_string();
    }
    let nearest = midi.round();
    let cents = ((midi - nearest) * 100.0).round() as i32;
    let note = NOTE_NAMES[(nearest as usize) % 12];
    let octave = (nearest as i32) / 12 - 1;
    if cents == 0 {
        format!("{}{}", note, octave)
    } else {
        format!("{}{} {:+}¢", note, octave, cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_to_level_bounds() {
        assert_eq!(db_to_level(DB_FLOOR), 0.0);
        assert_eq!(db_to_level(DB_CEIL), 1.0);
        assert_eq!(db_to_level(f32::NAN), 0.0);
        assert_eq!(db_to_level(f32::NEG_INFINITY), 0.0);
    }

    #[test]
    fn db_linear_roundtrip() {
        for db in [-40.0f32, -20.0, -6.0, 0.0, 6.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 0.01, "{} -> {}", db, back);
        }
    }

    #[test]
    fn db_to_y_is_monotonic() {
        let top = db_to_y(0.0, 10.0, 110.0);
        let bottom = db_to_y(-40.0, 10.0, 110.0);
        assert!(top < bottom);
        assert_eq!(db_to_y(f32::NAN, 10.0, 110.0), 110.0);
    }

    #[test]
    fn note_name_reference_pitches() {
        assert_eq!(note_name(440.0), "A4");
        assert_eq!(note_name(261.6256), "C4");
        assert_eq!(note_name(0.0), "--");
        assert_eq!(note_name(f32::NAN), "--");
    }

    #[test]
    fn note_name_cents_offset() {
        // 443 Hz is A4 plus ~12 cents.
        let name = note_name(443.0);
        assert!(name.starts_with("A4 +"), "{}", name);
    }
}
