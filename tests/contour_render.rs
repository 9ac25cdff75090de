//! Contour-to-audio integration tests — shape generation → pointer pipeline
//! → conversion → offline synthesis → WAV, no audio hardware involved.

use melisma::app::{ApplicationState, EditCommand};
use melisma::config::AppConfig;
use melisma::convert::{generate_curve_shape, ConvertContext, CurveShape};
use melisma::pitch::NoteName;
use melisma::synth::{write_wav, SynthSink};
use melisma::track::PERMANENT_TRACK;

const SAMPLE_RATE: u32 = 44100;
const CHANNELS: u16 = 2;
const SEED: u64 = 42;

fn note(s: &str) -> NoteName {
    s.parse().unwrap()
}

/// Generate a contour and push it through the real pointer pipeline.
fn sketch_shape(app: &mut ApplicationState, shape: &CurveShape, start: &str, end: &str) {
    let ctx = ConvertContext {
        settings: *app.settings(),
        layout: app.layout(),
        range: app.pitch_range(),
    };
    let steps = app.settings().slot_count().max(2);
    let points = generate_curve_shape(shape, note(start), note(end), steps, &ctx)
        .expect("shape generation failed");

    let mut points = points.into_iter();
    let first = points.next().unwrap();
    app.dispatch(EditCommand::PointerDown {
        x: first.x,
        y: first.y,
        width: first.width,
    });
    for p in points {
        app.dispatch(EditCommand::PointerMove {
            x: p.x,
            y: p.y,
            width: p.width,
        });
    }
    app.dispatch(EditCommand::PointerUp);
}

fn render_mix(app: &ApplicationState, seed: u64) -> Vec<f32> {
    let mut sink = SynthSink::offline(SAMPLE_RATE, CHANNELS, seed);
    app.play_current(&mut sink);
    sink.take_mix()
}

// =============================================================================
// Test 1: a sketched contour renders audible audio
// =============================================================================

#[test]
fn linear_contour_produces_sound() {
    let mut app = ApplicationState::new(&AppConfig::default());
    sketch_shape(&mut app, &CurveShape::Linear, "C3", "C5");

    assert!(
        !app.tracks().get(PERMANENT_TRACK).unwrap().notes.is_empty(),
        "contour should convert to notes"
    );

    let mix = render_mix(&app, SEED);
    assert!(!mix.is_empty());
    let has_sound = mix.iter().any(|s| s.abs() > 0.001);
    assert!(has_sound, "rendered mix should contain non-silent audio");
}

// =============================================================================
// Test 2: different shapes produce different audio
// =============================================================================

#[test]
fn sine_and_linear_render_differently() {
    let mut linear = ApplicationState::new(&AppConfig::default());
    sketch_shape(&mut linear, &CurveShape::Linear, "C3", "C5");

    let mut sine = ApplicationState::new(&AppConfig::default());
    sketch_shape(&mut sine, &CurveShape::Sine, "C3", "C5");

    let a = render_mix(&linear, SEED);
    let b = render_mix(&sine, SEED);
    assert_ne!(a, b, "different contours should render different mixes");
}

// =============================================================================
// Test 3: rendering is deterministic for a fixed seed
// =============================================================================

#[test]
fn render_is_deterministic() {
    let mut app = ApplicationState::new(&AppConfig::default());
    sketch_shape(&mut app, &CurveShape::Sine, "C3", "C4");

    let first = render_mix(&app, SEED);
    for _ in 0..3 {
        assert_eq!(render_mix(&app, SEED), first, "mix must be bit-identical");
    }
}

// =============================================================================
// Test 4: the mix survives the trip to disk
// =============================================================================

#[test]
fn mix_exports_to_wav() {
    let mut app = ApplicationState::new(&AppConfig::default());
    sketch_shape(&mut app, &CurveShape::Linear, "C4", "G4");

    let mix = render_mix(&app, SEED);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contour.wav");
    write_wav(&path, &mix, SAMPLE_RATE, CHANNELS).unwrap();

    let reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().channels, CHANNELS);
    assert_eq!(reader.spec().sample_rate, SAMPLE_RATE);
    assert_eq!(reader.len() as usize, mix.len());
}
