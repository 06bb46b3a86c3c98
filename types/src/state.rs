//! Per-renderer state records.
//!
//! One flat, immutable snapshot per plugin window, built by the host from the
//! live engine once per UI tick and handed to the renderer by reference.
//! Array fields are shared slices produced by the analysis engine; the UI
//! never writes to them. A missing or short array means "nothing to draw yet".

use std::sync::Arc;

use crate::display::{EqBandShape, FreqScale, SpectroPalette, SpectrumMode, ToneCurve};

/// One parametric EQ band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqBand {
    pub shape: EqBandShape,
    /// Center / corner frequency in Hz.
    pub freq: f32,
    /// Gain in dB.
    pub gain_db: f32,
    /// Quality factor (bandwidth).
    pub q: f32,
    pub enabled: bool,
}

impl EqBand {
    pub fn new(shape: EqBandShape, freq: f32, gain_db: f32, q: f32) -> Self {
        Self {
            shape,
            freq,
            gain_db,
            q,
            enabled: true,
        }
    }
}

/// Shared bookkeeping for the scrolling spectrogram displays.
///
/// `spectrogram` holds the visible window: `frame_count * bins` magnitudes in
/// row-major frame order (oldest frame first), pre-normalized to 0..1.
#[derive(Debug, Clone, Default)]
pub struct SpectroWindow {
    /// Visible window width in analysis frames.
    pub frame_count: usize,
    /// Frequency bins per frame.
    pub bins: usize,
    /// Monotonic id of the newest frame in the window. Backward jumps signal
    /// an engine reset and force a full repaint.
    pub latest_frame: u64,
    /// Frames actually filled by the engine so far (0 = nothing to draw).
    pub available: usize,
    /// Magnitudes, row-major frames x bins, 0..1.
    pub spectrogram: Option<Arc<[f32]>>,
}

/// State for the Analyzer plugin (scrolling spectrogram + level readout).
#[derive(Debug, Clone, Default)]
pub struct AnalyzerState {
    pub window: SpectroWindow,
    pub palette: SpectroPalette,
    pub tone: ToneCurve,
    pub freq_scale: FreqScale,
    pub bloom: bool,
    pub sample_rate: f32,
    pub input_db: f32,
    pub bypass: bool,
}

/// State for the EQ plugin. Band count is whatever the engine runs with.
#[derive(Debug, Clone, Default)]
pub struct EqState {
    pub bands: Vec<EqBand>,
    pub selected_band: Option<usize>,
    pub input_db: f32,
    pub output_db: f32,
    pub bypass: bool,
}

/// State for the Gain plugin.
#[derive(Debug, Clone, Default)]
pub struct GainState {
    pub gain_db: f32,
    pub input_db: f32,
    pub output_db: f32,
    pub mute: bool,
    pub bypass: bool,
}

/// State for the Compressor plugin.
#[derive(Debug, Clone)]
pub struct CompressorState {
    pub threshold_db: f32,
    pub ratio: f32,
    pub knee_db: f32,
    pub attack_ms: f32,
    pub release_ms: f32,
    pub makeup_db: f32,
    pub input_db: f32,
    pub output_db: f32,
    /// Current gain reduction in dB (negative or zero).
    pub reduction_db: f32,
    pub bypass: bool,
}

impl Default for CompressorState {
    fn default() -> Self {
        use crate::defaults::*;
        Self {
            threshold_db: DEFAULT_COMP_THRESHOLD,
            ratio: DEFAULT_COMP_RATIO,
            knee_db: DEFAULT_COMP_KNEE,
            attack_ms: DEFAULT_COMP_ATTACK,
            release_ms: DEFAULT_COMP_RELEASE,
            makeup_db: DEFAULT_COMP_MAKEUP,
            input_db: DB_FLOOR,
            output_db: DB_FLOOR,
            reduction_db: 0.0,
            bypass: false,
        }
    }
}

/// State for the Voice Gate plugin.
#[derive(Debug, Clone)]
pub struct VoiceGateState {
    pub threshold_db: f32,
    pub attack_ms: f32,
    pub release_ms: f32,
    /// Attenuation applied while closed, dB (negative).
    pub range_db: f32,
    pub input_db: f32,
    /// Current attenuation, dB (negative or zero).
    pub reduction_db: f32,
    /// Voice-activity probability from the detector, 0..1.
    pub vad_probability: f32,
    pub open: bool,
    pub bypass: bool,
}

impl Default for VoiceGateState {
    fn default() -> Self {
        use crate::defaults::*;
        Self {
            threshold_db: DEFAULT_GATE_THRESHOLD,
            attack_ms: DEFAULT_GATE_ATTACK,
            release_ms: DEFAULT_GATE_RELEASE,
            range_db: DEFAULT_GATE_RANGE,
            input_db: DB_FLOOR,
            reduction_db: 0.0,
            vad_probability: 0.0,
            open: false,
            bypass: false,
        }
    }
}

/// State for the Room Tone plugin (ambience fill).
#[derive(Debug, Clone, Default)]
pub struct RoomToneState {
    /// Fill amount, 0..1.
    pub amount: f32,
    /// Spectral tilt of the generated tone, -1..1.
    pub tilt: f32,
    pub level_db: f32,
    /// Captured per-band noise profile (0..1 per band), drawn as a curve.
    pub profile: Option<Arc<[f32]>>,
    /// True while the engine is capturing a new profile.
    pub learning: bool,
    pub bypass: bool,
}

/// State for the Air Exciter plugin.
#[derive(Debug, Clone)]
pub struct AirExciterState {
    /// Harmonic drive, 0..1.
    pub drive: f32,
    /// Wet/dry mix, 0..1.
    pub mix: f32,
    /// Corner frequency above which harmonics are generated, Hz.
    pub freq_hz: f32,
    /// Level of the generated harmonics, dB.
    pub harmonics_db: f32,
    pub input_db: f32,
    pub bypass: bool,
}

impl Default for AirExciterState {
    fn default() -> Self {
        use crate::defaults::*;
        Self {
            drive: DEFAULT_EXCITER_DRIVE,
            mix: DEFAULT_EXCITER_MIX,
            freq_hz: DEFAULT_EXCITER_FREQ,
            harmonics_db: DB_FLOOR,
            input_db: DB_FLOOR,
            bypass: false,
        }
    }
}

/// State for the Sidechain Tap plugin.
#[derive(Debug, Clone, Default)]
pub struct SidechainState {
    pub tap_gain_db: f32,
    pub level_db: f32,
    /// Per-display-column envelope minima, -1..1.
    pub waveform_min: Option<Arc<[f32]>>,
    /// Per-display-column envelope maxima, -1..1.
    pub waveform_max: Option<Arc<[f32]>>,
    pub bypass: bool,
}

/// State for the Vocal Spectrograph plugin.
///
/// Track arrays are per-frame scalars aligned with `window`; harmonic and
/// formant arrays are row-major frames x per-frame counts. Non-finite or
/// non-positive frequencies mean "not detected for this frame".
#[derive(Debug, Clone, Default)]
pub struct SpectrographState {
    pub window: SpectroWindow,
    pub palette: SpectroPalette,
    pub tone: ToneCurve,
    pub sample_rate: f32,
    /// Display frequency range, Hz.
    pub min_freq: f32,
    pub max_freq: f32,

    /// Fundamental frequency per frame, Hz.
    pub pitch_track: Option<Arc<[f32]>>,
    /// Pitch confidence per frame, 0..1.
    pub pitch_confidence: Option<Arc<[f32]>>,
    /// Harmonics-to-noise ratio per frame, dB.
    pub hnr_track: Option<Arc<[f32]>>,
    /// Cepstral peak prominence per frame, dB.
    pub cpp_track: Option<Arc<[f32]>>,

    pub harmonics_per_frame: usize,
    pub harmonic_freqs: Option<Arc<[f32]>>,
    pub harmonic_mags: Option<Arc<[f32]>>,

    pub formants_per_frame: usize,
    pub formant_freqs: Option<Arc<[f32]>>,
    pub formant_bandwidths: Option<Arc<[f32]>>,

    pub show_pitch: bool,
    pub show_harmonics: bool,
    pub show_formants: bool,
    pub bypass: bool,
}

/// State for the Frequency Analyzer plugin (instantaneous spectrum).
#[derive(Debug, Clone, Default)]
pub struct SpectrumState {
    /// Current magnitudes per bin, 0..1.
    pub spectrum: Option<Arc<[f32]>>,
    /// Peak-hold magnitudes per bin, 0..1.
    pub peaks: Option<Arc<[f32]>>,
    pub bins: usize,
    pub sample_rate: f32,
    pub freq_scale: FreqScale,
    pub mode: SpectrumMode,
    pub bypass: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spectro_window_default_is_empty() {
        let w = SpectroWindow::default();
        assert_eq!(w.available, 0);
        assert!(w.spectrogram.is_none());
    }

    #[test]
    fn compressor_defaults_match_constants() {
        let s = CompressorState::default();
        assert_eq!(s.threshold_db, crate::defaults::DEFAULT_COMP_THRESHOLD);
        assert_eq!(s.ratio, crate::defaults::DEFAULT_COMP_RATIO);
        assert_eq!(s.knee_db, crate::defaults::DEFAULT_COMP_KNEE);
    }

    #[test]
    fn state_records_are_cheap_to_clone() {
        let data: Arc<[f32]> = vec![0.0f32; 1024].into();
        let state = AnalyzerState {
            window: SpectroWindow {
                frame_count: 8,
                bins: 128,
                latest_frame: 7,
                available: 8,
                spectrogram: Some(data.clone()),
            },
            ..Default::default()
        };
        let copy = state.clone();
        // Both snapshots share the same backing array.
        assert!(Arc::ptr_eq(
            state.window.spectrogram.as_ref().unwrap(),
            copy.window.spectrogram.as_ref().unwrap()
        ));
        assert_eq!(Arc::strong_count(&data), 3);
    }
}
