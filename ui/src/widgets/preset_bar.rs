//! Preset slot bar with bypass button.

use egui::epaint::StrokeKind;
use egui::{Align2, CornerRadius, FontId, Painter, Pos2, Rect, Stroke, pos2, vec2};

use crate::interaction::HitRegion;
use crate::theme;

const SLOT_GAP: f32 = 4.0;
const BYPASS_W: f32 = 52.0;

/// Horizontal row of preset slots plus a bypass button at the right edge.
/// Rectangles are recorded during `layout` for later hit-testing.
#[derive(Debug)]
pub struct PresetBar {
    slots: Vec<Rect>,
    bypass: Rect,
}

impl Default for PresetBar {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            bypass: Rect::ZERO,
        }
    }
}

impl PresetBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute slot rectangles for this frame.
    pub fn layout(&mut self, rect: Rect, slot_count: usize) {
        self.bypass = Rect::from_min_size(
            pos2(rect.max.x - BYPASS_W, rect.min.y),
            vec2(BYPASS_W, rect.height()),
        );
        self.slots.clear();
        if slot_count == 0 {
            return;
        }
        let avail = rect.width() - BYPASS_W - SLOT_GAP;
        let slot_w = (avail - SLOT_GAP * (slot_count.saturating_sub(1)) as f32) / slot_count as f32;
        if slot_w <= 0.0 {
            return;
        }
        for i in 0..slot_count {
            let x = rect.min.x + i as f32 * (slot_w + SLOT_GAP);
            self.slots
                .push(Rect::from_min_size(pos2(x, rect.min.y), vec2(slot_w, rect.height())));
        }
    }

    /// Draw the bar. `selected` highlights one slot; `bypassed` lights the
    /// bypass button.
    pub fn paint(&self, painter: &Painter, selected: Option<usize>, bypassed: bool) {
        for (i, slot) in self.slots.iter().enumerate() {
            let fill = if selected == Some(i) {
                theme::ACCENT.gamma_multiply(0.4)
            } else {
                theme::SLOT_BG
            };
            painter.rect_filled(*slot, CornerRadius::same(3), fill);
            painter.rect_stroke(
                *slot,
                CornerRadius::same(3),
                Stroke::new(1.0, theme::OUTLINE),
                StrokeKind::Inside,
            );
            painter.text(
                slot.center(),
                Align2::CENTER_CENTER,
                format!("P{}", i + 1),
                FontId::proportional(9.0),
                theme::TEXT_DIM,
            );
        }

        let fill = if bypassed {
            theme::BYPASS
        } else {
            theme::SLOT_BG
        };
        painter.rect_filled(self.bypass, CornerRadius::same(3), fill);
        painter.rect_stroke(
            self.bypass,
            CornerRadius::same(3),
            Stroke::new(1.0, theme::OUTLINE),
            StrokeKind::Inside,
        );
        painter.text(
            self.bypass.center(),
            Align2::CENTER_CENTER,
            "BYP",
            FontId::proportional(9.0),
            if bypassed {
                theme::TEXT
            } else {
                theme::TEXT_DIM
            },
        );
    }

    /// Resolve a pointer position against the slot and bypass rectangles.
    pub fn hit_test(&self, pos: Pos2) -> HitRegion {
        if self.bypass.contains(pos) {
            return HitRegion::Bypass;
        }
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.contains(pos) {
                return HitRegion::PresetSlot(i);
            }
        }
        HitRegion::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_and_hit_test() {
        let mut bar = PresetBar::new();
        bar.layout(
            Rect::from_min_size(pos2(0.0, 0.0), vec2(300.0, 20.0)),
            4,
        );

        assert_eq!(bar.slots.len(), 4);
        assert_eq!(bar.hit_test(bar.slots[2].center()), HitRegion::PresetSlot(2));
        assert_eq!(bar.hit_test(bar.bypass.center()), HitRegion::Bypass);
        assert_eq!(bar.hit_test(pos2(-5.0, 10.0)), HitRegion::None);
        assert_eq!(bar.hit_test(pos2(150.0, 50.0)), HitRegion::None);
    }

    #[test]
    fn zero_slots_keeps_bypass() {
        let mut bar = PresetBar::new();
        bar.layout(Rect::from_min_size(pos2(0.0, 0.0), vec2(120.0, 20.0)), 0);
        assert!(bar.slots.is_empty());
        assert_eq!(bar.hit_test(bar.bypass.center()), HitRegion::Bypass);
    }
}
