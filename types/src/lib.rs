//! Shared types for the VoxRack plugin host.
//!
//! This crate contains the per-renderer state records and display settings
//! shared between the DSP engine and the UI layer. The engine fills a state
//! record once per UI tick; the renderers read it and never write back.

pub mod defaults;
pub mod display;
pub mod state;

// Re-export commonly used types
pub use display::{EqBandShape, FreqScale, SpectroPalette, SpectrumMode, ToneCurve};
pub use state::{
    AirExciterState, AnalyzerState, CompressorState, EqBand, EqState, GainState, RoomToneState,
    SidechainState, SpectroWindow, SpectrographState, SpectrumState, VoiceGateState,
};
