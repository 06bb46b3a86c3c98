//! Default values for the plugin control surfaces.
//!
//! Single source of truth shared by the engine and the UI layer.

use crate::display::EqBandShape;

// ── Metering ────────────────────────────────────────────────────────
/// Bottom of every dB scale (meters, transfer curves, spectrogram floor).
pub const DB_FLOOR: f32 = -60.0;
/// Top of the level-meter scale.
pub const DB_CEIL: f32 = 6.0;
/// One-pole smoothing factor applied to the VAD meter per UI tick.
pub const VAD_SMOOTHING: f32 = 0.15;

// ── Knob geometry / feel ────────────────────────────────────────────
/// Knob sweep start angle in degrees (screen coordinates, y down).
pub const KNOB_ANGLE_START: f32 = 135.0;
/// Knob sweep in degrees (135° -> 405°, 90° gap at the bottom).
pub const KNOB_ANGLE_SWEEP: f32 = 270.0;
/// Normalized value change per pixel of vertical drag.
pub const KNOB_DRAG_SENSITIVITY: f32 = 0.005;
/// Sensitivity multiplier while the fine-adjust modifier is held.
pub const KNOB_FINE_FACTOR: f32 = 0.1;
/// Minimum normalized delta before a value-changed event is emitted.
pub const KNOB_CHANGE_EPSILON: f32 = 1e-4;
/// Extra hit-test padding around the knob radius, in points.
pub const KNOB_HIT_PADDING: f32 = 4.0;

// ── Compressor ──────────────────────────────────────────────────────
pub const DEFAULT_COMP_THRESHOLD: f32 = -20.0;
pub const DEFAULT_COMP_RATIO: f32 = 4.0;
pub const DEFAULT_COMP_KNEE: f32 = 6.0;
pub const DEFAULT_COMP_ATTACK: f32 = 10.0;
pub const DEFAULT_COMP_RELEASE: f32 = 100.0;
pub const DEFAULT_COMP_MAKEUP: f32 = 0.0;

// ── Voice gate ──────────────────────────────────────────────────────
pub const DEFAULT_GATE_THRESHOLD: f32 = -40.0;
pub const DEFAULT_GATE_ATTACK: f32 = 5.0;
pub const DEFAULT_GATE_RELEASE: f32 = 100.0;
pub const DEFAULT_GATE_RANGE: f32 = -40.0;

// ── EQ bands: (shape, freq Hz, gain dB, Q) ──────────────────────────
pub const DEFAULT_EQ_BANDS: [(EqBandShape, f32, f32, f32); 5] = [
    (EqBandShape::LowShelf, 80.0, 0.0, 0.7),
    (EqBandShape::Bell, 250.0, 0.0, 1.0),
    (EqBandShape::Bell, 1000.0, 0.0, 1.0),
    (EqBandShape::Bell, 4000.0, 0.0, 1.0),
    (EqBandShape::HighShelf, 10000.0, 0.0, 0.7),
];
/// Frequency axis range for response curves, Hz.
pub const EQ_FREQ_MIN: f32 = 20.0;
pub const EQ_FREQ_MAX: f32 = 20_000.0;
/// Gain axis range for response curves, dB.
pub const EQ_GAIN_RANGE: f32 = 18.0;

// ── Spectrogram tone curve ──────────────────────────────────────────
pub const DEFAULT_BRIGHTNESS: f32 = 1.0;
pub const DEFAULT_GAMMA: f32 = 1.0;
pub const DEFAULT_CONTRAST: f32 = 1.0;
pub const DEFAULT_LEVELS: u32 = 256;

// ── Air exciter / room tone ─────────────────────────────────────────
pub const DEFAULT_EXCITER_DRIVE: f32 = 0.3;
pub const DEFAULT_EXCITER_MIX: f32 = 0.25;
pub const DEFAULT_EXCITER_FREQ: f32 = 3000.0;
pub const DEFAULT_ROOM_TONE_AMOUNT: f32 = 0.2;
