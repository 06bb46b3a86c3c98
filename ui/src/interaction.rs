//! Hit-test results and knob drag plumbing.
//!
//! `hit_test` on a renderer is a pure function of the rectangles recorded
//! during the most recent `render` call; the host feeds the result straight
//! into its input dispatcher.

use voxrack_types::defaults::{KNOB_CHANGE_EPSILON, KNOB_DRAG_SENSITIVITY, KNOB_FINE_FACTOR};

/// Region of a plugin surface under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HitRegion {
    /// Outside every interactive rectangle.
    #[default]
    None,
    /// A knob, by index into the renderer's knob list.
    Knob(usize),
    /// The scrolling spectrogram well.
    Spectrogram,
    /// The instantaneous spectrum well.
    Spectrum,
    /// A compressor/gate transfer-curve well.
    TransferCurve,
    /// The EQ response-curve well.
    EqCurve,
    /// A level / reduction meter.
    Meter,
    /// The sidechain waveform strip.
    WaveformStrip,
    /// A preset slot, by index.
    PresetSlot(usize),
    /// The bypass button.
    Bypass,
    /// The gate open/closed lamp.
    GateLamp,
    /// The palette colorbar next to a spectrogram.
    Colorbar,
}

/// Active knob drag: captures the normalized value and pointer y at
/// mouse-down, then maps vertical motion to value changes.
#[derive(Debug, Clone, Copy)]
pub struct KnobDrag {
    /// Index of the dragged knob.
    pub knob: usize,
    start_norm: f32,
    start_y: f32,
    last_norm: f32,
}

impl KnobDrag {
    pub fn begin(knob: usize, start_norm: f32, start_y: f32) -> Self {
        Self {
            knob,
            start_norm: start_norm.clamp(0.0, 1.0),
            start_y,
            last_norm: start_norm.clamp(0.0, 1.0),
        }
    }

    /// Update from the current pointer y. Returns the new normalized value
    /// only when it moved more than the change epsilon since the last emit,
    /// so hosts don't see a stream of no-op value events.
    pub fn update(&mut self, pointer_y: f32, fine: bool) -> Option<f32> {
        let sensitivity = if fine {
            KNOB_DRAG_SENSITIVITY * KNOB_FINE_FACTOR
        } else {
            KNOB_DRAG_SENSITIVITY
        };
        let norm = (self.start_norm + (self.start_y - pointer_y) * sensitivity).clamp(0.0, 1.0);
        if (norm - self.last_norm).abs() > KNOB_CHANGE_EPSILON {
            self.last_norm = norm;
            Some(norm)
        } else {
            None
        }
    }

    /// Latest emitted normalized value.
    pub fn current(&self) -> f32 {
        self.last_norm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_up_increases_value() {
        let mut drag = KnobDrag::begin(0, 0.5, 100.0);
        let v = drag.update(60.0, false).expect("should emit");
        assert!(v > 0.5);
        assert!((v - (0.5 + 40.0 * KNOB_DRAG_SENSITIVITY)).abs() < 1e-6);
    }

    #[test]
    fn drag_clamps_to_unit_range() {
        let mut drag = KnobDrag::begin(0, 0.9, 100.0);
        assert_eq!(drag.update(-10_000.0, false), Some(1.0));
        let mut drag = KnobDrag::begin(0, 0.1, 100.0);
        assert_eq!(drag.update(10_000.0, false), Some(0.0));
    }

    #[test]
    fn tiny_motion_is_suppressed() {
        let mut drag = KnobDrag::begin(0, 0.5, 100.0);
        // Well under epsilon / sensitivity.
        assert_eq!(drag.update(99.99, false), None);
        // And no event when returning to the start either.
        assert_eq!(drag.update(100.0, false), None);
    }

    #[test]
    fn repeated_updates_emit_once_per_change() {
        let mut drag = KnobDrag::begin(0, 0.5, 100.0);
        assert!(drag.update(80.0, false).is_some());
        assert_eq!(drag.update(80.0, false), None);
        assert!(drag.update(60.0, false).is_some());
    }

    #[test]
    fn fine_modifier_scales_sensitivity() {
        let mut coarse = KnobDrag::begin(0, 0.5, 100.0);
        let mut fine = KnobDrag::begin(0, 0.5, 100.0);
        let vc = coarse.update(50.0, false).unwrap();
        let vf = fine.update(50.0, true).unwrap();
        let dc = vc - 0.5;
        let df = vf - 0.5;
        assert!((df / dc - KNOB_FINE_FACTOR).abs() < 1e-4);
    }
}
