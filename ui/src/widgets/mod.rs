//! Primitive widgets composed by the per-plugin renderers.

mod gate_light;
mod knob;
mod meter;
mod preset_bar;
mod tooltip;
mod waveform;

pub use gate_light::GateLight;
pub use knob::{Knob, KnobStyle, Taper, ValueFormat};
pub use meter::{level_meter, meter_scale, reduction_meter, VadMeter};
pub use preset_bar::PresetBar;
pub use tooltip::draw_tooltip;
pub use waveform::draw_waveform;
