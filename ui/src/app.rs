//! Demo host application.
//!
//! Drives every plugin surface from a synthetic analysis engine so the
//! renderers can be exercised without live audio. The engine fills the same
//! state records the real host would; knob drags and clicks are routed back
//! into it through the renderer hit-tests.

use std::collections::VecDeque;
use std::sync::Arc;

use egui::{Pos2, Rect, vec2};
use serde::{Deserialize, Serialize};

use voxrack_types::display::{SpectroPalette, SpectrumMode, ToneCurve};
use voxrack_types::state::{
    AirExciterState, AnalyzerState, CompressorState, EqBand, EqState, GainState, RoomToneState,
    SidechainState, SpectrographState, SpectrumState, VoiceGateState,
};

use voxrack_ui::curves::{comp_reduction_db, gate_transfer_db};
use voxrack_ui::interaction::{HitRegion, KnobDrag};
use voxrack_ui::overlay::PhaseTimer;
use voxrack_ui::render::{
    AirExciterRenderer, AnalyzerRenderer, CompressorRenderer, EqRenderer, GainRenderer,
    PluginRenderer, RoomToneRenderer, SidechainRenderer, SpectrographRenderer, SpectrumRenderer,
    VoiceGateRenderer, air_exciter, compressor, eq, gain, room_tone, sidechain, voice_gate,
};
use voxrack_ui::util::format_hz;
use voxrack_ui::widgets::draw_tooltip;
use voxrack_ui::theme;

// Synthetic engine dimensions.
const FRAMES: usize = 240;
const BINS: usize = 96;
const SAMPLE_RATE: f32 = 8000.0;
const MAX_FREQ: f32 = SAMPLE_RATE / 2.0;
const WAVE_COLS: usize = 128;
const HARMONICS: usize = 6;
const FORMANTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Plugin {
    Analyzer,
    Eq,
    Gain,
    Compressor,
    VoiceGate,
    RoomTone,
    AirExciter,
    Sidechain,
    Spectrograph,
    Spectrum,
}

impl Plugin {
    const ALL: [Plugin; 10] = [
        Plugin::Analyzer,
        Plugin::Eq,
        Plugin::Gain,
        Plugin::Compressor,
        Plugin::VoiceGate,
        Plugin::RoomTone,
        Plugin::AirExciter,
        Plugin::Sidechain,
        Plugin::Spectrograph,
        Plugin::Spectrum,
    ];

    fn label(&self) -> &'static str {
        match self {
            Plugin::Analyzer => "Analyzer",
            Plugin::Eq => "EQ",
            Plugin::Gain => "Gain",
            Plugin::Compressor => "Compressor",
            Plugin::VoiceGate => "Voice Gate",
            Plugin::RoomTone => "Room Tone",
            Plugin::AirExciter => "Air Exciter",
            Plugin::Sidechain => "Sidechain Tap",
            Plugin::Spectrograph => "Vocal Spectrograph",
            Plugin::Spectrum => "Frequency Analyzer",
        }
    }
}

const SETTINGS_KEY: &str = "voxrack_view";

/// View preferences persisted with the window layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct ViewSettings {
    palette: SpectroPalette,
    tone: ToneCurve,
    bloom: bool,
    spectrum_mode: SpectrumMode,
    show_pitch: bool,
    show_harmonics: bool,
    show_formants: bool,
    show_overlay: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            palette: SpectroPalette::default(),
            tone: ToneCurve::default(),
            bloom: false,
            spectrum_mode: SpectrumMode::default(),
            show_pitch: true,
            show_harmonics: false,
            show_formants: true,
            show_overlay: false,
        }
    }
}

/// Small deterministic generator so the demo doesn't need an RNG crate.
struct Lcg(u64);

impl Lcg {
    fn next_f32(&mut self) -> f32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 40) & 0xff_ffff) as f32 / 16_777_216.0
    }

    fn next_signed(&mut self) -> f32 {
        self.next_f32() * 2.0 - 1.0
    }
}

/// Fills the plugin state records with a plausible vocal signal each tick.
struct SyntheticEngine {
    rng: Lcg,
    t: f32,
    frame_id: u64,
    frames: VecDeque<Vec<f32>>,
    pitch_hist: VecDeque<f32>,
    conf_hist: VecDeque<f32>,
    formant_hist: VecDeque<[f32; FORMANTS]>,
    peaks: Vec<f32>,
    wave_min: Vec<f32>,
    wave_max: Vec<f32>,

    analyzer: AnalyzerState,
    eq: EqState,
    gain: GainState,
    comp: CompressorState,
    gate: VoiceGateState,
    room: RoomToneState,
    exciter: AirExciterState,
    side: SidechainState,
    graph: SpectrographState,
    spectrum: SpectrumState,
}

impl SyntheticEngine {
    fn new() -> Self {
        let mut rng = Lcg(0x5eed_cafe);

        // Static learned room profile, smooth over bands.
        let profile: Vec<f32> = (0..48)
            .map(|i| {
                let t = i as f32 / 47.0;
                (0.55 - 0.4 * t + 0.05 * (t * 20.0).sin() + rng.next_f32() * 0.03).clamp(0.0, 1.0)
            })
            .collect();

        let eq = EqState {
            bands: voxrack_types::defaults::DEFAULT_EQ_BANDS
                .iter()
                .map(|&(shape, freq, gain_db, q)| EqBand::new(shape, freq, gain_db, q))
                .collect(),
            selected_band: Some(2),
            ..Default::default()
        };

        Self {
            rng,
            t: 0.0,
            frame_id: 0,
            frames: VecDeque::with_capacity(FRAMES),
            pitch_hist: VecDeque::with_capacity(FRAMES),
            conf_hist: VecDeque::with_capacity(FRAMES),
            formant_hist: VecDeque::with_capacity(FRAMES),
            peaks: vec![0.0; BINS],
            wave_min: vec![0.0; WAVE_COLS],
            wave_max: vec![0.0; WAVE_COLS],

            analyzer: AnalyzerState {
                sample_rate: SAMPLE_RATE,
                ..Default::default()
            },
            eq,
            gain: GainState::default(),
            comp: CompressorState::default(),
            gate: VoiceGateState::default(),
            room: RoomToneState {
                amount: voxrack_types::defaults::DEFAULT_ROOM_TONE_AMOUNT,
                profile: Some(profile.into()),
                ..Default::default()
            },
            exciter: AirExciterState::default(),
            side: SidechainState::default(),
            graph: SpectrographState {
                sample_rate: SAMPLE_RATE,
                min_freq: 0.0,
                max_freq: MAX_FREQ,
                harmonics_per_frame: HARMONICS,
                formants_per_frame: FORMANTS,
                show_pitch: true,
                show_harmonics: false,
                show_formants: true,
                ..Default::default()
            },
            spectrum: SpectrumState {
                bins: BINS,
                sample_rate: SAMPLE_RATE,
                ..Default::default()
            },
        }
    }

    fn push_capped<T>(queue: &mut VecDeque<T>, value: T) {
        if queue.len() == FRAMES {
            queue.pop_front();
        }
        queue.push_back(value);
    }

    /// Flatten a per-frame history into a window-aligned array, padding the
    /// not-yet-filled leading frames.
    fn window_array(hist: &VecDeque<f32>, pad: f32) -> Vec<f32> {
        let mut out = vec![pad; FRAMES];
        let offset = FRAMES - hist.len();
        for (i, v) in hist.iter().enumerate() {
            out[offset + i] = *v;
        }
        out
    }

    fn tick(&mut self, dt: f32) {
        self.t += dt.clamp(0.001, 0.1);
        self.frame_id += 1;
        let t = self.t;

        // Phrase envelope: mostly voiced with silent gaps.
        let voiced = (0.23 * t).sin() > -0.6;
        let f0 = 150.0 + 45.0 * (0.6 * t).sin() + self.rng.next_signed() * 3.0;
        let level = if voiced {
            0.5 + 0.3 * (1.3 * t).sin() + self.rng.next_signed() * 0.05
        } else {
            0.02
        };
        let level_db = if voiced {
            -18.0 + 8.0 * (1.3 * t).sin() + self.rng.next_signed() * 1.5
        } else {
            -55.0
        };

        // New analysis frame: harmonic stack over a noise floor.
        let mut frame = vec![0.0f32; BINS];
        for (b, mag) in frame.iter_mut().enumerate() {
            let freq = (b as f32 + 0.5) / BINS as f32 * MAX_FREQ;
            let mut v = 0.03 * self.rng.next_f32();
            if voiced {
                for h in 1..=10 {
                    let hf = h as f32 * f0;
                    let d = (freq - hf) / 55.0;
                    v += level * 0.9 / (h as f32).powf(0.7) * (-d * d).exp();
                }
            }
            *mag = v.clamp(0.0, 1.0);
        }

        // Peak hold for the spectrum view.
        for (peak, &v) in self.peaks.iter_mut().zip(&frame) {
            *peak = (*peak * 0.985).max(v);
        }

        Self::push_capped(&mut self.frames, frame);
        Self::push_capped(&mut self.pitch_hist, if voiced { f0 } else { f32::NAN });
        Self::push_capped(
            &mut self.conf_hist,
            if voiced {
                0.75 + self.rng.next_f32() * 0.25
            } else {
                0.1
            },
        );
        Self::push_capped(
            &mut self.formant_hist,
            if voiced {
                [
                    520.0 * (1.0 + 0.12 * (0.4 * t).sin()),
                    1480.0 * (1.0 + 0.08 * (0.3 * t).cos()),
                    2500.0 * (1.0 + 0.05 * (0.5 * t).sin()),
                ]
            } else {
                [f32::NAN; FORMANTS]
            },
        );

        // Waveform strip scrolls left.
        self.wave_min.rotate_left(1);
        self.wave_max.rotate_left(1);
        let amp = level.clamp(0.0, 1.0) * (0.7 + 0.3 * self.rng.next_f32());
        if let (Some(lo), Some(hi)) = (self.wave_min.last_mut(), self.wave_max.last_mut()) {
            *lo = -amp;
            *hi = amp * (0.8 + 0.2 * self.rng.next_f32());
        }

        // Shared spectrogram window.
        let available = self.frames.len();
        let mut window = vec![0.0f32; FRAMES * BINS];
        let offset = (FRAMES - available) * BINS;
        for (i, f) in self.frames.iter().enumerate() {
            window[offset + i * BINS..offset + (i + 1) * BINS].copy_from_slice(f);
        }
        let window: Arc<[f32]> = window.into();

        self.analyzer.window.frame_count = FRAMES;
        self.analyzer.window.bins = BINS;
        self.analyzer.window.latest_frame = self.frame_id;
        self.analyzer.window.available = available;
        self.analyzer.window.spectrogram = Some(window.clone());
        self.analyzer.input_db = level_db;

        self.graph.window = self.analyzer.window.clone();
        self.graph.pitch_track = Some(Self::window_array(&self.pitch_hist, f32::NAN).into());
        self.graph.pitch_confidence = Some(Self::window_array(&self.conf_hist, 0.0).into());

        // Harmonic grid follows the pitch track.
        let pitch_window = Self::window_array(&self.pitch_hist, f32::NAN);
        let mut harm_freqs = vec![f32::NAN; FRAMES * HARMONICS];
        let mut harm_mags = vec![0.0f32; FRAMES * HARMONICS];
        for (i, &p) in pitch_window.iter().enumerate() {
            if !p.is_finite() {
                continue;
            }
            for h in 0..HARMONICS {
                harm_freqs[i * HARMONICS + h] = p * (h + 1) as f32;
                harm_mags[i * HARMONICS + h] = (1.0 / (h + 1) as f32).max(0.15);
            }
        }
        self.graph.harmonic_freqs = Some(harm_freqs.into());
        self.graph.harmonic_mags = Some(harm_mags.into());

        let mut formant_freqs = vec![f32::NAN; FRAMES * FORMANTS];
        let offset = (FRAMES - self.formant_hist.len()) * FORMANTS;
        for (i, fs) in self.formant_hist.iter().enumerate() {
            formant_freqs[offset + i * FORMANTS..offset + (i + 1) * FORMANTS].copy_from_slice(fs);
        }
        self.graph.formant_freqs = Some(formant_freqs.into());
        self.graph.formant_bandwidths =
            Some(vec![160.0f32; FRAMES * FORMANTS].into());

        // Voice-quality tracks ride the phrase envelope.
        self.graph.hnr_track = Some(
            Self::window_array(&self.conf_hist, 0.0)
                .iter()
                .map(|c| c * 18.0)
                .collect::<Vec<_>>()
                .into(),
        );
        self.graph.cpp_track = Some(
            Self::window_array(&self.conf_hist, 0.0)
                .iter()
                .map(|c| 4.0 + c * 14.0)
                .collect::<Vec<_>>()
                .into(),
        );

        // Dynamics plugins share the input level.
        self.gain.input_db = level_db;
        self.gain.output_db = if self.gain.mute {
            f32::NEG_INFINITY
        } else {
            level_db + self.gain.gain_db
        };

        self.comp.input_db = level_db;
        self.comp.reduction_db =
            comp_reduction_db(level_db, self.comp.threshold_db, self.comp.ratio, self.comp.knee_db);
        self.comp.output_db = level_db + self.comp.reduction_db + self.comp.makeup_db;

        self.gate.input_db = level_db;
        self.gate.open = level_db >= self.gate.threshold_db;
        self.gate.reduction_db =
            gate_transfer_db(level_db, self.gate.threshold_db, self.gate.range_db) - level_db;
        self.gate.vad_probability = if voiced {
            0.8 + self.rng.next_f32() * 0.2
        } else {
            self.rng.next_f32() * 0.15
        };

        self.exciter.input_db = level_db;
        self.exciter.harmonics_db =
            level_db - 16.0 + self.exciter.drive * 10.0 + self.exciter.mix * 4.0;

        self.room.level_db = -46.0 + self.room.amount * 24.0;

        self.side.level_db = level_db + self.side.tap_gain_db;
        self.side.waveform_min = Some(self.wave_min.clone().into());
        self.side.waveform_max = Some(self.wave_max.clone().into());

        self.eq.input_db = level_db;
        self.eq.output_db = level_db
            + self
                .eq
                .bands
                .iter()
                .filter(|b| b.enabled)
                .map(|b| b.gain_db)
                .sum::<f32>()
                * 0.2;

        self.spectrum.spectrum = self.frames.back().map(|f| Arc::from(f.as_slice()));
        self.spectrum.peaks = Some(Arc::from(self.peaks.as_slice()));
    }
}

/// Pointer state sampled once per frame.
struct FrameInput {
    pos: Option<Pos2>,
    pressed: bool,
    down: bool,
    released: bool,
    double: bool,
    fine: bool,
}

/// Route pointer input to a renderer's knobs. `current` holds the value
/// behind each knob index; `set` writes one back. Returns a non-knob region
/// when the press landed elsewhere.
fn dispatch_knobs<R: PluginRenderer>(
    renderer: &R,
    input: &FrameInput,
    drag: &mut Option<KnobDrag>,
    current: &[f32],
    mut set: impl FnMut(usize, f32),
) -> Option<HitRegion> {
    let mut other = None;

    if let Some(pos) = input.pos {
        if input.pressed {
            match renderer.hit_test(pos) {
                HitRegion::Knob(i) if i < current.len() => {
                    let knob = &renderer.knobs()[i];
                    if input.double {
                        set(i, knob.reset_value());
                        *drag = None;
                    } else {
                        *drag = Some(KnobDrag::begin(i, knob.normalize(current[i]), pos.y));
                    }
                }
                region => other = Some(region),
            }
        } else if input.down {
            if let Some(d) = drag {
                if let Some(norm) = d.update(pos.y, input.fine) {
                    let knob = &renderer.knobs()[d.knob];
                    set(d.knob, knob.denormalize(norm));
                }
            }
        }
    }

    if input.released {
        *drag = None;
    }
    other
}

struct Renderers {
    analyzer: AnalyzerRenderer,
    eq: EqRenderer,
    gain: GainRenderer,
    comp: CompressorRenderer,
    gate: VoiceGateRenderer,
    room: RoomToneRenderer,
    exciter: AirExciterRenderer,
    side: SidechainRenderer,
    graph: SpectrographRenderer,
    spectrum: SpectrumRenderer,
}

pub struct VoxRackApp {
    engine: SyntheticEngine,
    renderers: Renderers,
    plugin: Plugin,
    drag: Option<KnobDrag>,
    timer: PhaseTimer,
    show_overlay: bool,
    paused: bool,
}

impl VoxRackApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(theme::studio_dark());

        let settings = cc
            .storage
            .and_then(|s| s.get_string(SETTINGS_KEY))
            .and_then(|json| match serde_json::from_str::<ViewSettings>(&json) {
                Ok(s) => Some(s),
                Err(err) => {
                    tracing::warn!(%err, "discarding unreadable view settings");
                    None
                }
            })
            .unwrap_or_default();

        let mut engine = SyntheticEngine::new();
        engine.analyzer.palette = settings.palette;
        engine.analyzer.tone = settings.tone;
        engine.analyzer.bloom = settings.bloom;
        engine.graph.palette = settings.palette;
        engine.graph.tone = settings.tone;
        engine.graph.show_pitch = settings.show_pitch;
        engine.graph.show_harmonics = settings.show_harmonics;
        engine.graph.show_formants = settings.show_formants;
        engine.spectrum.mode = settings.spectrum_mode;

        Self {
            engine,
            renderers: Renderers {
                analyzer: AnalyzerRenderer::new(),
                eq: EqRenderer::new(),
                gain: GainRenderer::new(),
                comp: CompressorRenderer::new(),
                gate: VoiceGateRenderer::new(),
                room: RoomToneRenderer::new(),
                exciter: AirExciterRenderer::new(),
                side: SidechainRenderer::new(),
                graph: SpectrographRenderer::new(),
                spectrum: SpectrumRenderer::new(),
            },
            plugin: Plugin::Analyzer,
            drag: None,
            timer: PhaseTimer::new(),
            show_overlay: settings.show_overlay,
            paused: false,
        }
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            egui::ComboBox::from_id_salt("plugin")
                .selected_text(self.plugin.label())
                .show_ui(ui, |ui| {
                    for plugin in Plugin::ALL {
                        ui.selectable_value(&mut self.plugin, plugin, plugin.label());
                    }
                });

            ui.checkbox(&mut self.paused, "pause");
            ui.checkbox(&mut self.show_overlay, "timings");

            ui.separator();
            match self.plugin {
                Plugin::Analyzer => {
                    let e = &mut self.engine;
                    egui::ComboBox::from_id_salt("palette")
                        .selected_text(e.analyzer.palette.label())
                        .show_ui(ui, |ui| {
                            for palette in SpectroPalette::ALL {
                                ui.selectable_value(
                                    &mut e.analyzer.palette,
                                    palette,
                                    palette.label(),
                                );
                            }
                        });
                    ui.checkbox(&mut e.analyzer.bloom, "bloom");
                    ui.add(
                        egui::Slider::new(&mut e.analyzer.tone.gamma, 0.3..=2.5).text("gamma"),
                    );
                }
                Plugin::Spectrograph => {
                    let g = &mut self.engine.graph;
                    ui.checkbox(&mut g.show_pitch, "pitch");
                    ui.checkbox(&mut g.show_harmonics, "harmonics");
                    ui.checkbox(&mut g.show_formants, "formants");
                }
                Plugin::Spectrum => {
                    let s = &mut self.engine.spectrum;
                    ui.selectable_value(&mut s.mode, SpectrumMode::Bars, "bars");
                    ui.selectable_value(&mut s.mode, SpectrumMode::Line, "line");
                }
                _ => {}
            }
        });
    }
}

impl eframe::App for VoxRackApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = ViewSettings {
            palette: self.engine.analyzer.palette,
            tone: self.engine.analyzer.tone,
            bloom: self.engine.analyzer.bloom,
            spectrum_mode: self.engine.spectrum.mode,
            show_pitch: self.engine.graph.show_pitch,
            show_harmonics: self.engine.graph.show_harmonics,
            show_formants: self.engine.graph.show_formants,
            show_overlay: self.show_overlay,
        };
        match serde_json::to_string(&settings) {
            Ok(json) => storage.set_string(SETTINGS_KEY, json),
            Err(err) => tracing::warn!(%err, "failed to serialize view settings"),
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.paused {
            let dt = ctx.input(|i| i.stable_dt);
            self.engine.tick(dt);
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("voxrack_bar").show(ctx, |ui| self.top_bar(ui));

        let input = ctx.input(|i| FrameInput {
            pos: i.pointer.interact_pos(),
            pressed: i.pointer.primary_pressed(),
            down: i.pointer.primary_down(),
            released: i.pointer.primary_released(),
            double: i.pointer.button_double_clicked(egui::PointerButton::Primary),
            fine: i.modifiers.shift,
        });

        let ppp = ctx.pixels_per_point();
        self.timer.reset();

        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_rect_before_wrap();
            let painter = ui.painter_at(avail);
            let engine = &mut self.engine;
            let renderers = &mut self.renderers;
            let drag = &mut self.drag;
            let timer = &mut self.timer;

            match self.plugin {
                Plugin::Analyzer => {
                    let r = &mut renderers.analyzer;
                    let rect = Rect::from_center_size(avail.center(), r.preferred_size());
                    timer.measure("analyzer", || {
                        r.render(&painter, rect, ppp, &engine.analyzer)
                    });

                    let hit = dispatch_knobs(r, &input, drag, &[], |_, _| {});
                    match hit {
                        Some(HitRegion::Colorbar) => {
                            // Click the colorbar to cycle palettes.
                            let all = SpectroPalette::ALL;
                            let at = all
                                .iter()
                                .position(|p| *p == engine.analyzer.palette)
                                .unwrap_or(0);
                            engine.analyzer.palette = all[(at + 1) % all.len()];
                        }
                        Some(HitRegion::Bypass) => engine.analyzer.bypass ^= true,
                        _ => {}
                    }

                    // Frequency readout under the pointer.
                    if let Some(pos) = input.pos {
                        if let Some(freq) = r.freq_at(pos, engine.analyzer.sample_rate) {
                            draw_tooltip(&painter, pos, rect, &format_hz(freq));
                        }
                    }
                }
                Plugin::Eq => {
                    let r = &mut renderers.eq;
                    let rect = Rect::from_center_size(avail.center(), r.preferred_size());
                    timer.measure("eq", || r.render(&painter, rect, ppp, &engine.eq));

                    let sel = engine.eq.selected_band;
                    let cur = sel
                        .and_then(|i| engine.eq.bands.get(i))
                        .map(|b| [b.freq, b.gain_db, b.q])
                        .unwrap_or([1000.0, 0.0, 1.0]);
                    let bands = &mut engine.eq.bands;
                    let hit = dispatch_knobs(r, &input, drag, &cur, |idx, v| {
                        if let Some(band) = sel.and_then(|i| bands.get_mut(i)) {
                            match idx {
                                eq::KNOB_FREQ => band.freq = v,
                                eq::KNOB_GAIN => band.gain_db = v,
                                eq::KNOB_Q => band.q = v,
                                _ => {}
                            }
                        }
                    });
                    match hit {
                        Some(HitRegion::EqCurve) => {
                            if let Some(pos) = input.pos {
                                if let Some(band) = r.band_at(pos) {
                                    engine.eq.selected_band = Some(band);
                                }
                            }
                        }
                        Some(HitRegion::Bypass) => engine.eq.bypass ^= true,
                        _ => {}
                    }
                }
                Plugin::Gain => {
                    let r = &mut renderers.gain;
                    let rect = Rect::from_center_size(avail.center(), r.preferred_size());
                    timer.measure("gain", || r.render(&painter, rect, ppp, &engine.gain));

                    let cur = [engine.gain.gain_db];
                    let g = &mut engine.gain;
                    let hit = dispatch_knobs(r, &input, drag, &cur, |idx, v| {
                        if idx == gain::KNOB_GAIN {
                            g.gain_db = v;
                        }
                    });
                    match hit {
                        Some(HitRegion::Bypass) => g.bypass ^= true,
                        Some(HitRegion::PresetSlot(slot)) => {
                            tracing::info!(slot, "gain preset");
                            g.gain_db = 0.0;
                            g.mute = false;
                        }
                        _ => {}
                    }
                }
                Plugin::Compressor => {
                    let r = &mut renderers.comp;
                    let rect = Rect::from_center_size(avail.center(), r.preferred_size());
                    timer.measure("compressor", || r.render(&painter, rect, ppp, &engine.comp));

                    let c = &mut engine.comp;
                    let cur = [
                        c.threshold_db,
                        c.ratio,
                        c.knee_db,
                        c.attack_ms,
                        c.release_ms,
                        c.makeup_db,
                    ];
                    let hit = dispatch_knobs(r, &input, drag, &cur, |idx, v| match idx {
                        compressor::KNOB_THRESHOLD => c.threshold_db = v,
                        compressor::KNOB_RATIO => c.ratio = v,
                        compressor::KNOB_KNEE => c.knee_db = v,
                        compressor::KNOB_ATTACK => c.attack_ms = v,
                        compressor::KNOB_RELEASE => c.release_ms = v,
                        compressor::KNOB_MAKEUP => c.makeup_db = v,
                        _ => {}
                    });
                    match hit {
                        Some(HitRegion::Bypass) => c.bypass ^= true,
                        Some(HitRegion::PresetSlot(slot)) => {
                            tracing::info!(slot, "compressor preset");
                            *c = CompressorState {
                                input_db: c.input_db,
                                ..Default::default()
                            };
                        }
                        _ => {}
                    }
                }
                Plugin::VoiceGate => {
                    let r = &mut renderers.gate;
                    let rect = Rect::from_center_size(avail.center(), r.preferred_size());
                    timer.measure("voice_gate", || r.render(&painter, rect, ppp, &engine.gate));

                    let g = &mut engine.gate;
                    let cur = [g.threshold_db, g.attack_ms, g.release_ms, g.range_db];
                    let hit = dispatch_knobs(r, &input, drag, &cur, |idx, v| match idx {
                        voice_gate::KNOB_THRESHOLD => g.threshold_db = v,
                        voice_gate::KNOB_ATTACK => g.attack_ms = v,
                        voice_gate::KNOB_RELEASE => g.release_ms = v,
                        voice_gate::KNOB_RANGE => g.range_db = v,
                        _ => {}
                    });
                    match hit {
                        Some(HitRegion::Bypass) => g.bypass ^= true,
                        Some(HitRegion::PresetSlot(slot)) => {
                            tracing::info!(slot, "gate preset");
                            *g = VoiceGateState {
                                input_db: g.input_db,
                                ..Default::default()
                            };
                        }
                        _ => {}
                    }
                }
                Plugin::RoomTone => {
                    let r = &mut renderers.room;
                    let rect = Rect::from_center_size(avail.center(), r.preferred_size());
                    timer.measure("room_tone", || r.render(&painter, rect, ppp, &engine.room));

                    let rm = &mut engine.room;
                    let cur = [rm.amount, rm.tilt];
                    let hit = dispatch_knobs(r, &input, drag, &cur, |idx, v| match idx {
                        room_tone::KNOB_AMOUNT => rm.amount = v,
                        room_tone::KNOB_TILT => rm.tilt = v,
                        _ => {}
                    });
                    match hit {
                        Some(HitRegion::Bypass) => rm.bypass ^= true,
                        Some(HitRegion::TransferCurve) => {
                            // Click the profile well to toggle a fake learn pass.
                            rm.learning = !rm.learning;
                        }
                        _ => {}
                    }
                }
                Plugin::AirExciter => {
                    let r = &mut renderers.exciter;
                    let rect = Rect::from_center_size(avail.center(), r.preferred_size());
                    timer.measure("air_exciter", || {
                        r.render(&painter, rect, ppp, &engine.exciter)
                    });

                    let x = &mut engine.exciter;
                    let cur = [x.drive, x.mix, x.freq_hz];
                    let hit = dispatch_knobs(r, &input, drag, &cur, |idx, v| match idx {
                        air_exciter::KNOB_DRIVE => x.drive = v,
                        air_exciter::KNOB_MIX => x.mix = v,
                        air_exciter::KNOB_FREQ => x.freq_hz = v,
                        _ => {}
                    });
                    if let Some(HitRegion::Bypass) = hit {
                        x.bypass ^= true;
                    }
                }
                Plugin::Sidechain => {
                    let r = &mut renderers.side;
                    let rect = Rect::from_center_size(avail.center(), r.preferred_size());
                    timer.measure("sidechain", || r.render(&painter, rect, ppp, &engine.side));

                    let s = &mut engine.side;
                    let cur = [s.tap_gain_db];
                    let hit = dispatch_knobs(r, &input, drag, &cur, |idx, v| {
                        if idx == sidechain::KNOB_TAP_GAIN {
                            s.tap_gain_db = v;
                        }
                    });
                    if let Some(HitRegion::Bypass) = hit {
                        s.bypass ^= true;
                    }
                }
                Plugin::Spectrograph => {
                    let r = &mut renderers.graph;
                    let rect = Rect::from_center_size(avail.center(), r.preferred_size());
                    timer.measure("spectrograph", || {
                        r.render(&painter, rect, ppp, &engine.graph)
                    });

                    let hit = dispatch_knobs(r, &input, drag, &[], |_, _| {});
                    if let Some(HitRegion::Bypass) = hit {
                        engine.graph.bypass ^= true;
                    }
                }
                Plugin::Spectrum => {
                    let r = &mut renderers.spectrum;
                    let rect = Rect::from_center_size(avail.center(), r.preferred_size());
                    timer.measure("spectrum", || {
                        r.render(&painter, rect, ppp, &engine.spectrum)
                    });

                    let hit = dispatch_knobs(r, &input, drag, &[], |_, _| {});
                    if let Some(HitRegion::Bypass) = hit {
                        engine.spectrum.bypass ^= true;
                    }
                }
            }

            if self.show_overlay {
                self.timer.draw(&painter, avail.min + vec2(6.0, 6.0));
            }
        });
    }
}
