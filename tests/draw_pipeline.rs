//! Full pipeline integration tests — pointer commands → capture → conversion
//! → track model → playback tuples.
//!
//! Everything runs through `ApplicationState::dispatch`, the same entry
//! point an interactive UI would use.

use melisma::app::{ApplicationState, EditCommand};
use melisma::config::AppConfig;
use melisma::pitch::NoteName;
use melisma::playback::{NoteSink, PlaybackError};
use melisma::track::{Instrument, TrackId, PERMANENT_TRACK};

/// Records every tuple the core emits, standing in for the audio engine.
#[derive(Default)]
struct RecordingSink {
    scheduled: Vec<(Instrument, NoteName, f64, f64)>,
}

impl NoteSink for RecordingSink {
    fn ensure_ready(&mut self) -> Result<(), PlaybackError> {
        Ok(())
    }

    fn schedule_note(
        &mut self,
        instrument: Instrument,
        pitch: NoteName,
        duration: f64,
        offset: f64,
    ) -> Result<(), PlaybackError> {
        self.scheduled.push((instrument, pitch, duration, offset));
        Ok(())
    }
}

fn app() -> ApplicationState {
    ApplicationState::new(&AppConfig::default())
}

/// Feed a straight pointer stroke through the command pipeline.
fn trace(app: &mut ApplicationState, from: (f32, f32), to: (f32, f32), samples: usize) {
    app.dispatch(EditCommand::PointerDown {
        x: from.0,
        y: from.1,
        width: None,
    });
    for i in 1..=samples {
        let t = i as f32 / samples as f32;
        app.dispatch(EditCommand::PointerMove {
            x: from.0 + (to.0 - from.0) * t,
            y: from.1 + (to.1 - from.1) * t,
            width: None,
        });
    }
    app.dispatch(EditCommand::PointerUp);
}

fn pitch_y(app: &ApplicationState, name: &str) -> f32 {
    let freq = name.parse::<NoteName>().unwrap().frequency().unwrap();
    app.pitch_range().frequency_to_y(freq, app.layout().height)
}

// =============================================================================
// Drawing commits curves and notes atomically
// =============================================================================

#[test]
fn stroke_to_notes_end_to_end() {
    let mut app = app();
    let y = pitch_y(&app, "A3");
    trace(&mut app, (0.0, y), (700.0, y), 60);

    let track = app.tracks().get(PERMANENT_TRACK).unwrap();
    assert_eq!(track.curves.len(), 1);
    assert_eq!(track.notes.len(), 1, "constant pitch folds into one note");
    assert_eq!(track.notes[0].pitch.to_string(), "A3");
    assert!(track.notes[0].duration > 0.0);
}

#[test]
fn diagonal_sweep_produces_a_quantized_scale() {
    // bpm 120, 4/4, eighth-note grid: every onset lands on a 0.25 s slot.
    let mut app = app();
    let c4 = pitch_y(&app, "C4");
    let c5 = pitch_y(&app, "C5");
    let width = app.layout().width;
    trace(&mut app, (0.0, c4), (width, c5), 80);

    let notes = &app.tracks().get(PERMANENT_TRACK).unwrap().notes;
    assert!(!notes.is_empty());

    let mut prev = f64::NEG_INFINITY;
    for note in notes {
        assert!(note.time >= prev, "onsets must not decrease");
        let slots = note.time / 0.25;
        assert!(
            (slots - slots.round()).abs() < 1e-9,
            "onset {} is off the eighth grid",
            note.time
        );
        prev = note.time;
    }
}

#[test]
fn strokes_land_on_the_selected_track() {
    let mut app = app();
    app.dispatch(EditCommand::AddTrack {
        instrument: Instrument::Dizi,
    });
    app.dispatch(EditCommand::SelectTrack(TrackId(2)));

    trace(&mut app, (0.0, 200.0), (500.0, 200.0), 40);

    assert!(app.tracks().get(PERMANENT_TRACK).unwrap().curves.is_empty());
    let second = app.tracks().get(TrackId(2)).unwrap();
    assert_eq!(second.curves.len(), 1);
    assert_eq!(second.curves[0].instrument, Instrument::Dizi);
}

#[test]
fn multiple_strokes_keep_the_note_list_sorted() {
    let mut app = app();
    let high = pitch_y(&app, "G4");
    let low = pitch_y(&app, "E3");

    // Draw the later-in-time stroke first.
    trace(&mut app, (600.0, high), (900.0, high), 30);
    trace(&mut app, (0.0, low), (300.0, low), 30);

    let notes = &app.tracks().get(PERMANENT_TRACK).unwrap().notes;
    assert!(notes.len() >= 2);
    for pair in notes.windows(2) {
        assert!(pair[0].time <= pair[1].time);
    }
}

// =============================================================================
// Control-point editing through the pointer pipeline
// =============================================================================

#[test]
fn pointer_down_on_a_control_point_moves_it() {
    let mut app = app();
    trace(&mut app, (0.0, 200.0), (500.0, 200.0), 40);
    let first = app.tracks().get(PERMANENT_TRACK).unwrap().curves[0].points[0];

    app.dispatch(EditCommand::PointerDown {
        x: first.x + 3.0,
        y: first.y - 2.0,
        width: None,
    });
    app.dispatch(EditCommand::PointerMove {
        x: 40.0,
        y: 120.0,
        width: None,
    });
    app.dispatch(EditCommand::PointerUp);

    let moved = app.tracks().get(PERMANENT_TRACK).unwrap().curves[0].points[0];
    assert_eq!(moved.x, 40.0);
    assert_eq!(moved.y, 120.0);
    // The drag grabbed the point; no new curve was started.
    assert_eq!(app.tracks().get(PERMANENT_TRACK).unwrap().curves.len(), 1);
}

// =============================================================================
// Track lifecycle through commands
// =============================================================================

#[test]
fn track_lifecycle_and_permanent_track_protection() {
    let mut app = app();
    app.dispatch(EditCommand::AddTrack {
        instrument: Instrument::Dizi,
    });
    app.dispatch(EditCommand::AddTrack {
        instrument: Instrument::Guzheng,
    });
    assert_eq!(app.tracks().len(), 3);

    app.dispatch(EditCommand::RemoveTrack(PERMANENT_TRACK));
    assert_eq!(app.tracks().len(), 3, "track 1 is permanent");

    app.dispatch(EditCommand::RemoveTrack(TrackId(2)));
    assert_eq!(app.tracks().len(), 2);
    assert!(app.tracks().get(TrackId(3)).is_some(), "ids stay stable");

    trace(&mut app, (0.0, 150.0), (400.0, 150.0), 30);
    app.dispatch(EditCommand::ClearTrack(PERMANENT_TRACK));
    let track = app.tracks().get(PERMANENT_TRACK).unwrap();
    assert!(track.notes.is_empty());
    assert!(track.curves.is_empty());
}

// =============================================================================
// Playback emits the tuples the audio collaborator needs
// =============================================================================

#[test]
fn playback_schedules_notes_and_curve_samples() {
    let mut app = app();
    let y = pitch_y(&app, "D4");
    trace(&mut app, (0.0, y), (600.0, y), 50);

    let mut sink = RecordingSink::default();
    app.play_current(&mut sink);

    // One discrete note plus one note per grid slot for the curve.
    let expected = 1 + app.settings().slot_count();
    assert_eq!(sink.scheduled.len(), expected);

    for (instrument, pitch, duration, offset) in &sink.scheduled {
        assert_eq!(*instrument, Instrument::Guzheng);
        assert_eq!(pitch.to_string(), "D4");
        assert!(*duration > 0.0);
        assert!(*offset >= 0.0);
    }
}

#[test]
fn play_all_covers_every_track() {
    let mut app = app();
    let y = pitch_y(&app, "C4");
    trace(&mut app, (0.0, y), (300.0, y), 30);

    app.dispatch(EditCommand::AddTrack {
        instrument: Instrument::Dizi,
    });
    app.dispatch(EditCommand::SelectTrack(TrackId(2)));
    let y2 = pitch_y(&app, "G4");
    trace(&mut app, (0.0, y2), (300.0, y2), 30);

    let mut sink = RecordingSink::default();
    app.play_all(&mut sink);

    let instruments: Vec<Instrument> = sink.scheduled.iter().map(|s| s.0).collect();
    assert!(instruments.contains(&Instrument::Guzheng));
    assert!(instruments.contains(&Instrument::Dizi));
}

// =============================================================================
// The scene hands the renderer everything it needs
// =============================================================================

#[test]
fn scene_matches_the_model() {
    let mut app = app();
    trace(&mut app, (0.0, 300.0), (500.0, 100.0), 40);

    let scene = app.scene();
    assert_eq!(scene.curves.len(), 1);
    assert_eq!(scene.curves[0].track, PERMANENT_TRACK);
    assert!(scene.curves[0].show_control_points);
    assert!(!scene.curves[0].highlighted);
    assert_eq!(scene.octave_range, 3);
    assert_eq!(scene.layout.width, app.layout().width);

    // Grid covers the configured measures.
    assert_eq!(
        scene.grid.measure_lines().len(),
        app.settings().measure_count as usize + 1
    );
}
