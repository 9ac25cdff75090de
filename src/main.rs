//! Melisma demo — trace a pitch contour through the real pipeline and hear
//! the notes it converts to.
//!
//! The contour is fed through the same pointer commands an interactive UI
//! would dispatch, so this exercises capture, thinning, conversion, and
//! playback end to end.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;

use melisma::app::{ApplicationState, EditCommand};
use melisma::config::AppConfig;
use melisma::convert::{generate_curve_shape, ConvertContext, CurveShape};
use melisma::pitch::NoteName;
use melisma::score::QuantizeUnit;
use melisma::synth::{write_wav, SynthSink};
use melisma::track::{Instrument, PERMANENT_TRACK};

const WAV_SAMPLE_RATE: u32 = 44100;
const WAV_CHANNELS: u16 = 2;

/// Sketch a pitch contour and play the notes it converts to.
#[derive(Parser, Debug)]
#[command(name = "melisma", version, about)]
struct Args {
    /// Tempo in beats per minute.
    #[arg(long)]
    bpm: Option<f64>,

    /// Number of measures on the timeline.
    #[arg(long)]
    measures: Option<u32>,

    /// Quantize denominator (4, 8, 16, 32).
    #[arg(long)]
    quantize: Option<QuantizeUnit>,

    /// Instrument voice (guzheng or dizi).
    #[arg(long, default_value = "guzheng")]
    instrument: Instrument,

    /// Contour shape to trace: linear or sine.
    #[arg(long, default_value = "linear")]
    shape: String,

    /// Contour start note.
    #[arg(long, default_value = "C3")]
    start: NoteName,

    /// Contour end note.
    #[arg(long, default_value = "C5")]
    end: NoteName,

    /// Render to a WAV file instead of the audio device.
    #[arg(long)]
    wav: Option<PathBuf>,

    /// RNG seed for the pluck transients.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() {
    env_logger::init(); // Log to stderr (run with RUST_LOG=debug for detail).
    let args = Args::parse();

    let mut config = AppConfig::load().unwrap_or_default();
    config.default_instrument = args.instrument;
    if let Some(bpm) = args.bpm {
        if bpm.is_finite() && bpm > 0.0 {
            config.music.bpm = bpm;
        } else {
            eprintln!("bpm must be positive, got {bpm}");
            std::process::exit(2);
        }
    }
    if let Some(measures) = args.measures {
        if measures >= 1 {
            config.music.measure_count = measures;
        } else {
            eprintln!("measure count must be at least 1");
            std::process::exit(2);
        }
    }
    if let Some(quantize) = args.quantize {
        config.music.quantize = quantize;
    }

    let shape = match args.shape.as_str() {
        "linear" => CurveShape::Linear,
        "sine" => CurveShape::Sine,
        other => {
            eprintln!("unknown shape {other:?} (expected linear or sine)");
            std::process::exit(2);
        }
    };

    let mut app = ApplicationState::new(&config);

    println!(
        "melisma v{} — {} {} from {} to {} at {} bpm",
        env!("CARGO_PKG_VERSION"),
        args.instrument,
        args.shape,
        args.start,
        args.end,
        app.settings().bpm,
    );

    // Trace the contour through the real pointer pipeline.
    let ctx = ConvertContext {
        settings: *app.settings(),
        layout: app.layout(),
        range: app.pitch_range(),
    };
    let steps = app.settings().slot_count().max(2);
    let points = match generate_curve_shape(&shape, args.start, args.end, steps, &ctx) {
        Ok(points) => points,
        Err(e) => {
            eprintln!("cannot trace contour: {e}");
            std::process::exit(2);
        }
    };

    let mut points = points.into_iter();
    if let Some(first) = points.next() {
        app.dispatch(EditCommand::PointerDown {
            x: first.x,
            y: first.y,
            width: first.width,
        });
    }
    for point in points {
        app.dispatch(EditCommand::PointerMove {
            x: point.x,
            y: point.y,
            width: point.width,
        });
    }
    app.dispatch(EditCommand::PointerUp);

    let Some(track) = app.tracks().get(PERMANENT_TRACK) else {
        eprintln!("internal error: the permanent track is missing");
        std::process::exit(1);
    };
    println!("converted to {} notes:", track.notes.len());
    for note in &track.notes {
        println!(
            "  {:>3}  at {:>5.2}s  for {:>4.2}s  (velocity {})",
            note.pitch.to_string(),
            note.time,
            note.duration,
            note.velocity,
        );
    }

    if let Some(path) = args.wav {
        let mut sink = SynthSink::offline(WAV_SAMPLE_RATE, WAV_CHANNELS, args.seed);
        app.play_current(&mut sink);
        let mix = sink.take_mix();
        if mix.is_empty() {
            eprintln!("nothing to render");
            std::process::exit(1);
        }
        match write_wav(&path, &mix, WAV_SAMPLE_RATE, WAV_CHANNELS) {
            Ok(()) => println!("wrote {}", path.display()),
            Err(e) => {
                eprintln!("wav write failed: {e}");
                std::process::exit(1);
            }
        }
    } else {
        let stop = Arc::new(AtomicBool::new(false));
        let handler_stop = stop.clone();
        if let Err(e) = ctrlc::set_handler(move || handler_stop.store(true, Ordering::Relaxed)) {
            log::warn!("ctrl-c handler unavailable: {e}");
        }

        let mut sink = SynthSink::new(args.seed);
        app.play_current(&mut sink);
        if sink.mix().is_empty() {
            eprintln!("nothing scheduled (no notes, or no audio device available)");
            std::process::exit(1);
        }

        println!("playing (ctrl-c to stop)...");
        if let Err(e) = sink.play(&stop) {
            eprintln!("playback failed: {e}");
            std::process::exit(1);
        }
    }
}
