//! Pitch model — note names, the playing-range table, and axis mappings.

pub mod map;
pub mod name;

pub use map::{time_to_x, x_to_time, PitchRange};
pub use name::{base_frequency, closest_note, NoteName, ParseNoteError, NOTE_TABLE};
