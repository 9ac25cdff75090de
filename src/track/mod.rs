//! Track model — independent channels owning notes, curves, and an
//! instrument assignment.

pub mod curve;
pub mod note;

pub use curve::Curve;
pub use note::Note;

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifies a track. Ids are stable for the lifetime of the piece; removal
/// leaves gaps rather than renumbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub u32);

/// The first track, created at startup and never removable.
pub const PERMANENT_TRACK: TrackId = TrackId(1);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track {}", self.0)
    }
}

/// The available instrument voices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    Guzheng,
    Dizi,
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instrument::Guzheng => write!(f, "guzheng"),
            Instrument::Dizi => write!(f, "dizi"),
        }
    }
}

/// Failure to parse an instrument name.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseInstrumentError {
    input: String,
}

impl fmt::Display for ParseInstrumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown instrument: {:?}", self.input)
    }
}

impl std::error::Error for ParseInstrumentError {}

impl FromStr for Instrument {
    type Err = ParseInstrumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "guzheng" => Ok(Instrument::Guzheng),
            "dizi" => Ok(Instrument::Dizi),
            _ => Err(ParseInstrumentError {
                input: s.to_string(),
            }),
        }
    }
}

/// One channel of the piece. Owns its notes and curves exclusively.
#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    pub instrument: Instrument,
    pub notes: Vec<Note>,
    pub curves: Vec<Curve>,
}

impl Track {
    fn new(id: TrackId, instrument: Instrument) -> Self {
        Self {
            id,
            name: format!("Track {}", id.0),
            instrument,
            notes: Vec::new(),
            curves: Vec::new(),
        }
    }

    /// Re-sort notes by onset. `sort_by` is stable, so simultaneous notes
    /// keep their insertion order.
    pub fn sort_notes(&mut self) {
        self.notes
            .sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(Ordering::Equal));
    }

    /// Append converted notes and restore the time ordering.
    pub fn merge_notes(&mut self, notes: impl IntoIterator<Item = Note>) {
        self.notes.extend(notes);
        self.sort_notes();
    }

    /// Drop everything the track holds, keeping its identity and instrument.
    pub fn clear(&mut self) {
        self.notes.clear();
        self.curves.clear();
    }
}

/// The collection of all tracks.
///
/// Always holds at least [`PERMANENT_TRACK`]; new ids come from a monotonic
/// counter so removing a track never renumbers the rest.
#[derive(Debug, Clone)]
pub struct Tracks {
    tracks: Vec<Track>,
    next_id: u32,
}

impl Tracks {
    /// A fresh collection holding only the permanent track.
    pub fn new(default_instrument: Instrument) -> Self {
        Self {
            tracks: vec![Track::new(PERMANENT_TRACK, default_instrument)],
            next_id: 2,
        }
    }

    /// Add a track and return its id.
    pub fn add(&mut self, instrument: Instrument) -> TrackId {
        let id = TrackId(self.next_id);
        self.next_id += 1;
        self.tracks.push(Track::new(id, instrument));
        id
    }

    /// Remove a track. The permanent track and unknown ids are left alone.
    pub fn remove(&mut self, id: TrackId) -> bool {
        if id == PERMANENT_TRACK {
            log::warn!("ignoring request to remove the permanent track");
            return false;
        }
        match self.tracks.iter().position(|t| t.id == id) {
            Some(index) => {
                self.tracks.remove(index);
                true
            }
            None => {
                log::warn!("remove: no such {id}");
                false
            }
        }
    }

    /// Empty a track's notes and curves.
    pub fn clear(&mut self, id: TrackId) {
        match self.get_mut(id) {
            Some(track) => track.clear(),
            None => log::warn!("clear: no such {id}"),
        }
    }

    /// Change a track's instrument. Metadata only; existing notes keep the
    /// instrument they were created with.
    pub fn set_instrument(&mut self, id: TrackId, instrument: Instrument) {
        match self.get_mut(id) {
            Some(track) => track.instrument = instrument,
            None => log::warn!("set_instrument: no such {id}"),
        }
    }

    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Track> {
        self.tracks.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
