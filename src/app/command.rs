//! Typed edit commands dispatched to the application state.
//!
//! Every interactive operation the UI can perform is one of these variants;
//! the UI layer translates raw input into commands and never touches the
//! model directly.

use crate::pitch::NoteName;
use crate::score::{QuantizeUnit, TimeSignature};
use crate::session::{ResizeEdge, ShapeKind};
use crate::track::{Instrument, Note, TrackId};

/// A single-field edit applied to an existing note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoteChange {
    Pitch(NoteName),
    Time(f64),
    Duration(f64),
    Velocity(u8),
}

/// Commands accepted by [`ApplicationState::dispatch`](super::ApplicationState::dispatch).
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    // Pointer lifecycle on the canvas (canvas coordinates).
    PointerDown { x: f32, y: f32, width: Option<f32> },
    PointerMove { x: f32, y: f32, width: Option<f32> },
    PointerUp,

    // Track management.
    AddTrack { instrument: Instrument },
    RemoveTrack(TrackId),
    ClearTrack(TrackId),
    SelectTrack(TrackId),
    SetTrackInstrument { track: TrackId, instrument: Instrument },

    // Note editing.
    AddNote { track: TrackId, note: Note },
    UpdateNote { track: TrackId, note: usize, change: NoteChange },
    DeleteNote { track: TrackId, note: usize },
    BeginNoteDrag { track: TrackId, note: usize, grab_x: f32, grab_y: f32 },
    BeginNoteResize { track: TrackId, note: usize, edge: ResizeEdge, grab_x: f32 },

    // Curve editing.
    DeleteCurve { track: TrackId, curve: usize },
    BeginShapeEdit { track: TrackId, curve: usize },
    PreviewShape { shape: ShapeKind, start: NoteName, end: NoteName },
    ApplyShape { shape: ShapeKind, start: NoteName, end: NoteName },
    CancelShapeEdit,
    /// Smooth every committed curve on every track.
    SmoothCurves,
    /// Regenerate a track's primary curve from its note list.
    RegenerateCurve(TrackId),
    /// Convert every curve on a track into notes and merge them.
    ConvertCurves(TrackId),

    // Music settings.
    SetBpm(f64),
    SetTimeSignature(TimeSignature),
    SetQuantize(QuantizeUnit),
    SetMeasureCount(u32),

    // Viewport.
    ScrollToStart,
    ScrollToEnd,
    ScrollBy(f32),
}
