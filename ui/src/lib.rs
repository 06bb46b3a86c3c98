//! VoxRack plugin surfaces.
//!
//! Immediate-mode renderers for the VoxRack audio plugin windows. The host
//! hands each renderer a flat state snapshot once per UI tick; renderers draw
//! into an `egui::Painter`, keep their own caches (spectrogram bitmaps,
//! lookup tables, axis layers) and report pointer hits through
//! [`interaction::HitRegion`].

#![warn(clippy::all, rust_2018_idioms)]

pub mod curves;
pub mod interaction;
pub mod overlay;
pub mod palette;
pub mod render;
pub mod spectrogram;
pub mod theme;
pub mod util;
pub mod widgets;

pub use interaction::{HitRegion, KnobDrag};
pub use render::PluginRenderer;
pub use spectrogram::{FrameSignature, SpectroUpdate, SpectrogramImage};
