//! Playback — walks tracks and emits (instrument, pitch, duration, offset)
//! tuples to an audio collaborator.
//!
//! The core never produces audio. Anything implementing [`NoteSink`] can
//! realize the tuples; the reference implementation lives in
//! [`crate::synth`]. Scheduling always awaits `ensure_ready` first, so a
//! slow engine start defers triggering rather than dropping it.

use std::fmt;

use crate::convert::ConvertContext;
use crate::geometry::Point;
use crate::pitch::{closest_note, x_to_time, NoteName};
use crate::track::{Instrument, Track, TrackId, Tracks};

/// Audio collaborator failures.
#[derive(Debug)]
pub enum PlaybackError {
    /// No audio output device found.
    NoOutputDevice,
    /// Failed to query device configuration.
    DeviceConfig(String),
    /// Failed to build the audio stream.
    StreamBuild(String),
    /// Failed to start the audio stream.
    StreamPlay(String),
    /// The sample queue to the audio thread is full.
    BufferFull,
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::NoOutputDevice => write!(f, "no audio output device found"),
            PlaybackError::DeviceConfig(e) => write!(f, "device config error: {e}"),
            PlaybackError::StreamBuild(e) => write!(f, "stream build error: {e}"),
            PlaybackError::StreamPlay(e) => write!(f, "stream play error: {e}"),
            PlaybackError::BufferFull => write!(f, "audio sample queue is full"),
        }
    }
}

impl std::error::Error for PlaybackError {}

/// The audio collaborator contract.
pub trait NoteSink {
    /// Bring the engine up. Called before any note is scheduled; scheduling
    /// is deferred until this succeeds.
    fn ensure_ready(&mut self) -> Result<(), PlaybackError>;

    /// Schedule one note to start `offset` seconds into the batch.
    fn schedule_note(
        &mut self,
        instrument: Instrument,
        pitch: NoteName,
        duration: f64,
        offset: f64,
    ) -> Result<(), PlaybackError>;
}

/// Resample curve points onto `slots` evenly spaced grid positions by
/// nearest index.
pub fn sample_to_grid(points: &[Point], slots: usize) -> Vec<Point> {
    if points.is_empty() || slots == 0 {
        return Vec::new();
    }
    (0..slots)
        .map(|i| {
            let t = if slots == 1 {
                0.0
            } else {
                i as f64 / (slots - 1) as f64
            };
            let index = (t * (points.len() - 1) as f64).floor() as usize;
            points[index]
        })
        .collect()
}

/// Play one track. A readiness failure is logged and the whole playback is
/// skipped; track state is never touched either way.
pub fn play_track(tracks: &Tracks, id: TrackId, ctx: &ConvertContext, sink: &mut dyn NoteSink) {
    let Some(track) = tracks.get(id) else {
        log::warn!("play: no such {id}");
        return;
    };
    if let Err(e) = sink.ensure_ready() {
        log::warn!("audio engine unavailable, skipping playback: {e}");
        return;
    }
    if let Err(e) = schedule_track(track, ctx, sink) {
        log::warn!("playback aborted: {e}");
    }
}

/// Play every track at once.
pub fn play_all_tracks(tracks: &Tracks, ctx: &ConvertContext, sink: &mut dyn NoteSink) {
    if let Err(e) = sink.ensure_ready() {
        log::warn!("audio engine unavailable, skipping playback: {e}");
        return;
    }
    for track in tracks.iter() {
        if let Err(e) = schedule_track(track, ctx, sink) {
            log::warn!("playback aborted on {}: {e}", track.id);
            return;
        }
    }
}

fn schedule_track(
    track: &Track,
    ctx: &ConvertContext,
    sink: &mut dyn NoteSink,
) -> Result<(), PlaybackError> {
    // Discrete notes play on the track's current instrument.
    for note in &track.notes {
        sink.schedule_note(track.instrument, note.pitch, note.duration, note.time)?;
    }
    // Curves play on the instrument they were drawn with.
    for curve in &track.curves {
        if curve.points.is_empty() {
            continue;
        }
        schedule_curve(&curve.points, curve.instrument, ctx, sink)?;
    }
    Ok(())
}

/// Schedule a contour as one subdivision-length note per grid sample.
fn schedule_curve(
    points: &[Point],
    instrument: Instrument,
    ctx: &ConvertContext,
    sink: &mut dyn NoteSink,
) -> Result<(), PlaybackError> {
    let sampled = sample_to_grid(points, ctx.settings.slot_count());
    let duration = ctx.settings.slot_duration();

    for point in sampled {
        let freq = ctx.range.y_to_frequency(point.y, ctx.layout.height);
        if !freq.is_finite() || freq <= 0.0 {
            continue;
        }
        let offset = x_to_time(point.x, ctx.layout.width, ctx.settings.total_duration());
        sink.schedule_note(instrument, closest_note(freq), duration, offset)?;
    }
    Ok(())
}
