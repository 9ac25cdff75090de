//! Control-point hit testing across every track's curves.

use crate::geometry::Point;
use crate::track::{TrackId, Tracks};

/// Pixel radius inside which a pointer-down grabs a control point instead of
/// starting a new stroke.
pub const HIT_THRESHOLD: f32 = 10.0;

/// Location of one control point within the track collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointRef {
    pub track: TrackId,
    pub curve: usize,
    pub point: usize,
}

/// Find the closest control point within `threshold` pixels of the query.
///
/// Scans in encounter order (track, then curve, then point); the nearest
/// point wins and the strict comparison keeps the first of any exact tie.
/// Returns `None` when every point is farther than the threshold.
pub fn find_nearest_point(tracks: &Tracks, x: f32, y: f32, threshold: f32) -> Option<PointRef> {
    let query = Point::new(x, y);
    let mut nearest = None;
    let mut min_distance = threshold;

    for track in tracks.iter() {
        for (curve_index, curve) in track.curves.iter().enumerate() {
            for (point_index, point) in curve.points.iter().enumerate() {
                let distance = point.distance_to(query);
                if distance < min_distance {
                    min_distance = distance;
                    nearest = Some(PointRef {
                        track: track.id,
                        curve: curve_index,
                        point: point_index,
                    });
                }
            }
        }
    }
    nearest
}
