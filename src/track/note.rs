//! Discrete note events derived from curves or entered by hand.

use crate::pitch::NoteName;

use super::Instrument;

/// A single musical event on a track.
///
/// `time` and `duration` are in seconds and quantized to the grid that was
/// active when the note was created or last edited; changing the music
/// settings afterwards does not move existing notes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub pitch: NoteName,
    pub time: f64,
    pub duration: f64,
    /// MIDI-style velocity, 0–127.
    pub velocity: u8,
    pub instrument: Instrument,
}

impl Note {
    pub fn new(
        pitch: NoteName,
        time: f64,
        duration: f64,
        velocity: u8,
        instrument: Instrument,
    ) -> Self {
        Self {
            pitch,
            time,
            duration,
            velocity,
            instrument,
        }
    }

    /// The moment the note stops sounding.
    pub fn end_time(&self) -> f64 {
        self.time + self.duration
    }
}
