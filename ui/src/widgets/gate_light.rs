//! Gate open/closed indicator lamp.

use egui::{Painter, Pos2, Stroke};

use crate::theme;

/// Per-tick decay of the glow halo after the gate closes.
const GLOW_DECAY: f32 = 0.85;

/// Indicator lamp with a short afterglow so fast gate chatter stays visible.
#[derive(Debug, Default)]
pub struct GateLight {
    glow: f32,
}

impl GateLight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the gate state for this tick.
    pub fn update(&mut self, open: bool) {
        if open {
            self.glow = 1.0;
        } else {
            self.glow *= GLOW_DECAY;
        }
    }

    pub fn paint(&self, painter: &Painter, center: Pos2, radius: f32, open: bool) {
        // Afterglow halo
        if self.glow > 0.05 {
            painter.circle_filled(
                center,
                radius * (1.0 + self.glow * 0.8),
                theme::LAMP_OPEN.gamma_multiply(self.glow * 0.35),
            );
        }

        let fill = if open {
            theme::LAMP_OPEN
        } else {
            theme::LAMP_CLOSED
        };
        painter.circle_filled(center, radius, fill);
        painter.circle_stroke(center, radius, Stroke::new(1.0, theme::OUTLINE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glow_decays_after_close() {
        let mut light = GateLight::new();
        light.update(true);
        assert_eq!(light.glow, 1.0);
        light.update(false);
        assert!((light.glow - GLOW_DECAY).abs() < 1e-6);
        for _ in 0..40 {
            light.update(false);
        }
        assert!(light.glow < 0.01);
    }
}
