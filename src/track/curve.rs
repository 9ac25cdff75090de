//! Committed pitch-contour curves.

use crate::geometry::Point;
use crate::pitch::{closest_note, NoteName, PitchRange};

use super::{Instrument, TrackId};

/// A user-drawn pitch contour, stored as an x-ordered point sequence in
/// canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub points: Vec<Point>,
    pub track: TrackId,
    pub instrument: Instrument,
}

impl Curve {
    pub fn new(points: Vec<Point>, track: TrackId, instrument: Instrument) -> Self {
        Self {
            points,
            track,
            instrument,
        }
    }

    /// Committed curves always carry at least two points.
    pub fn is_committed(&self) -> bool {
        self.points.len() >= 2
    }

    /// The notes nearest to the curve's first and last points.
    ///
    /// Used to seed the shape-editing panel. `None` for curves with no
    /// points.
    pub fn endpoint_notes(&self, range: PitchRange, canvas_height: f32) -> Option<(NoteName, NoteName)> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        let start = closest_note(range.y_to_frequency(first.y, canvas_height));
        let end = closest_note(range.y_to_frequency(last.y, canvas_height));
        Some((start, end))
    }
}
