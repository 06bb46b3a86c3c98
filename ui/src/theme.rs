//! Color constants and window chrome for the plugin surfaces.
//!
//! Dark studio theme used by every renderer.

use egui::{Color32, Stroke, Visuals};

/// Panel background behind every plugin surface.
pub const PANEL_BG: Color32 = Color32::from_rgb(0x1c, 0x1e, 0x24);
/// Recessed display wells (curves, spectrograms, meters).
pub const WELL_BG: Color32 = Color32::from_rgb(0x12, 0x13, 0x18);
/// Subtle outline around wells and strips.
pub const OUTLINE: Color32 = Color32::from_rgb(0x34, 0x38, 0x44);
/// Grid lines inside display wells.
pub const GRID: Color32 = Color32::from_rgb(0x2a, 0x2e, 0x38);
/// Primary text.
pub const TEXT: Color32 = Color32::from_rgb(0xc8, 0xcd, 0xd8);
/// Secondary text (axis labels, units).
pub const TEXT_DIM: Color32 = Color32::from_rgb(0x78, 0x7e, 0x8c);
/// Accent for value arcs and active curves.
pub const ACCENT: Color32 = Color32::from_rgb(0x5a, 0xa0, 0xe8);
/// Accent for warning states (reduction, clipping).
pub const ACCENT_WARM: Color32 = Color32::from_rgb(0xe8, 0x8a, 0x4a);
/// Gate open lamp.
pub const LAMP_OPEN: Color32 = Color32::from_rgb(0x50, 0xc8, 0x60);
/// Gate closed lamp.
pub const LAMP_CLOSED: Color32 = Color32::from_rgb(0x60, 0x34, 0x30);
/// Bypass highlight.
pub const BYPASS: Color32 = Color32::from_rgb(0xc8, 0x50, 0x46);
/// Knob body fill.
pub const KNOB_BODY: Color32 = Color32::from_rgb(0x28, 0x2b, 0x33);
/// Knob track arc.
pub const KNOB_TRACK: Color32 = Color32::from_rgb(0x3c, 0x41, 0x4e);
/// Preset slot fill.
pub const SLOT_BG: Color32 = Color32::from_rgb(0x23, 0x26, 0x2e);

/// Pitch overlay stroke on the spectrograph.
pub const PITCH_TRACK: Color32 = Color32::from_rgb(0x48, 0xd8, 0xc0);
/// Harmonic overlay dots.
pub const HARMONIC: Color32 = Color32::from_rgb(0xe8, 0xd0, 0x60);
/// Formant overlay bands.
pub const FORMANT: Color32 = Color32::from_rgb(0xd8, 0x70, 0xc8);

/// Visuals for the host window chrome around the plugin surfaces.
pub fn studio_dark() -> Visuals {
    let mut visuals = Visuals::dark();

    visuals.window_fill = PANEL_BG;
    visuals.panel_fill = PANEL_BG;
    visuals.faint_bg_color = WELL_BG;
    visuals.extreme_bg_color = WELL_BG;

    visuals.override_text_color = Some(TEXT);

    visuals.selection.bg_fill = Color32::from_rgb(0x2e, 0x44, 0x60);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    visuals.widgets.noninteractive.bg_fill = WELL_BG;
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, OUTLINE);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, TEXT);

    visuals.widgets.inactive.bg_fill = SLOT_BG;
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, OUTLINE);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT);

    visuals.widgets.hovered.bg_fill = KNOB_TRACK;
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT);

    visuals.widgets.active.bg_fill = ACCENT;
    visuals.widgets.active.bg_stroke = Stroke::new(1.0, ACCENT);
    visuals.widgets.active.fg_stroke = Stroke::new(2.0, PANEL_BG);

    visuals.window_stroke = Stroke::new(1.0, OUTLINE);

    visuals
}
