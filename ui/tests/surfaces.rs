//! Scenario tests driving the plugin surfaces through a headless egui pass.

use egui::{Rect, pos2};

use voxrack_types::defaults::{DB_CEIL, DB_FLOOR};
use voxrack_types::state::{
    AirExciterState, AnalyzerState, CompressorState, EqBand, EqState, GainState, RoomToneState,
    SidechainState, SpectroWindow, SpectrographState, SpectrumState, VoiceGateState,
};
use voxrack_ui::curves::comp_transfer_db;
use voxrack_ui::interaction::{HitRegion, KnobDrag};
use voxrack_ui::render::{
    AirExciterRenderer, AnalyzerRenderer, CompressorRenderer, EqRenderer, GainRenderer,
    PluginRenderer, RoomToneRenderer, SidechainRenderer, SpectrographRenderer, SpectrumRenderer,
    VoiceGateRenderer,
};

/// Run one headless frame, handing the test a painter over the given rect.
fn run_frame(mut body: impl FnMut(&egui::Painter)) {
    let ctx = egui::Context::default();
    let _ = ctx.run(egui::RawInput::default(), |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| {
            let painter = ui.painter();
            body(painter);
        });
    });
}

#[test]
fn empty_analyzer_window_renders_transparent_and_stays_hit_testable() {
    let mut renderer = AnalyzerRenderer::new();
    let state = AnalyzerState {
        window: SpectroWindow {
            frame_count: 100,
            bins: 32,
            latest_frame: 0,
            available: 0,
            spectrogram: None,
        },
        sample_rate: 48_000.0,
        ..Default::default()
    };

    let rect = Rect::from_min_size(pos2(0.0, 0.0), renderer.preferred_size());
    run_frame(|painter| renderer.render(painter, rect, 1.0, &state));

    let image = renderer.spectrogram().image();
    assert_eq!(image.width(), 100);
    assert_eq!(image.height(), 32);
    assert!(
        image.pixels.iter().all(|&p| p == egui::Color32::TRANSPARENT),
        "empty window must render fully transparent"
    );
    assert_eq!(renderer.spectrogram().ring_start(), 0);

    // The well still reports as the spectrogram region for hover readouts.
    assert_eq!(renderer.hit_test(rect.center()), HitRegion::Spectrogram);
}

#[test]
fn compressor_curve_sampling_matches_closed_form() {
    let state = CompressorState {
        threshold_db: -20.0,
        ratio: 4.0,
        knee_db: 6.0,
        ..Default::default()
    };

    // Sample the transfer function the way the renderer sweeps it and pick
    // the sample nearest -10 dB input.
    let samples = 96;
    let mut nearest = (f32::MAX, 0.0f32);
    for i in 0..=samples {
        let input = DB_FLOOR + (DB_CEIL - DB_FLOOR) * i as f32 / samples as f32;
        let d = (input - -10.0).abs();
        if d < nearest.0 {
            nearest = (
                d,
                comp_transfer_db(input, state.threshold_db, state.ratio, state.knee_db),
            );
        }
    }
    // Above the knee the closed form is T + (in - T) / R; slope error from
    // the sampling grid stays inside the tolerance.
    let input = -10.0 + nearest.0;
    let expected = state.threshold_db + (input - state.threshold_db) / state.ratio;
    assert!(
        (nearest.1 - expected).abs() < 0.01 + nearest.0 / state.ratio,
        "sampled {} expected {}",
        nearest.1,
        expected
    );
}

#[test]
fn knob_drag_roundtrip_through_hit_test() {
    let mut renderer = CompressorRenderer::new();
    let state = CompressorState::default();
    let rect = Rect::from_min_size(pos2(0.0, 0.0), renderer.preferred_size());
    run_frame(|painter| renderer.render(painter, rect, 1.0, &state));

    let knob = &renderer.knobs()[0];
    let center = knob.center;
    assert_eq!(renderer.hit_test(center), HitRegion::Knob(0));

    let mut drag = KnobDrag::begin(0, knob.normalize(state.threshold_db), center.y);
    let norm = drag.update(center.y - 40.0, false).expect("drag must emit");
    let value = knob.denormalize(norm);
    assert!(value > state.threshold_db);
    assert!(value <= 0.0);
}

#[test]
fn every_surface_renders_default_state_without_panicking() {
    let mut analyzer = AnalyzerRenderer::new();
    let mut eq = EqRenderer::new();
    let mut gain = GainRenderer::new();
    let mut comp = CompressorRenderer::new();
    let mut gate = VoiceGateRenderer::new();
    let mut room = RoomToneRenderer::new();
    let mut exciter = AirExciterRenderer::new();
    let mut side = SidechainRenderer::new();
    let mut graph = SpectrographRenderer::new();
    let mut spectrum = SpectrumRenderer::new();

    let eq_state = EqState {
        bands: vec![EqBand::new(
            voxrack_types::display::EqBandShape::Bell,
            1000.0,
            3.0,
            1.0,
        )],
        selected_band: Some(0),
        ..Default::default()
    };

    run_frame(|painter| {
        let rect = |size: egui::Vec2| Rect::from_min_size(pos2(0.0, 0.0), size);
        analyzer.render(painter, rect(analyzer.preferred_size()), 1.0, &AnalyzerState::default());
        eq.render(painter, rect(eq.preferred_size()), 1.0, &eq_state);
        gain.render(painter, rect(gain.preferred_size()), 1.0, &GainState::default());
        comp.render(painter, rect(comp.preferred_size()), 1.0, &CompressorState::default());
        gate.render(painter, rect(gate.preferred_size()), 1.0, &VoiceGateState::default());
        room.render(painter, rect(room.preferred_size()), 1.0, &RoomToneState::default());
        exciter.render(painter, rect(exciter.preferred_size()), 1.0, &AirExciterState::default());
        side.render(painter, rect(side.preferred_size()), 1.0, &SidechainState::default());
        graph.render(painter, rect(graph.preferred_size()), 1.0, &SpectrographState::default());
        spectrum.render(painter, rect(spectrum.preferred_size()), 1.0, &SpectrumState::default());
    });
}

#[test]
fn short_spectrogram_array_keeps_previous_bitmap() {
    let mut renderer = SpectrographRenderer::new();
    let frames = 8usize;
    let bins = 4usize;
    let data: Vec<f32> = (0..frames * bins).map(|i| i as f32 / 32.0).collect();

    let full = SpectrographState {
        window: SpectroWindow {
            frame_count: frames,
            bins,
            latest_frame: 10,
            available: frames,
            spectrogram: Some(data.into()),
        },
        min_freq: 0.0,
        max_freq: 4000.0,
        ..Default::default()
    };
    let rect = Rect::from_min_size(pos2(0.0, 0.0), renderer.preferred_size());
    run_frame(|painter| renderer.render(painter, rect, 1.0, &full));
    let before = renderer.spectrogram().image().pixels.clone();
    assert!(before.iter().any(|&p| p != egui::Color32::TRANSPARENT));

    // Same window id but a truncated array: the bitmap must survive as-is.
    let short = SpectrographState {
        window: SpectroWindow {
            frame_count: frames,
            bins,
            latest_frame: 11,
            available: frames,
            spectrogram: Some(vec![0.5f32; frames * bins - 1].into()),
        },
        ..full.clone()
    };
    run_frame(|painter| renderer.render(painter, rect, 1.0, &short));
    assert_eq!(renderer.spectrogram().image().pixels, before);
}
