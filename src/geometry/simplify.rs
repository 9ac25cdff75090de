//! Stroke thinning — distance-threshold reduction of dense point runs.
//!
//! A freehand stroke arrives as hundreds of nearly collinear samples. This
//! pass keeps a point only when it deviates from the line between the last
//! kept point and the next raw point, with periodic must-keep indices so a
//! long straight run is never thinned down to nothing.

use super::point::{point_to_segment_distance, Point};

/// Default tolerance for thinning a freshly captured stroke.
pub const STROKE_TOLERANCE: f32 = 5.0;

/// Tighter tolerance applied before converting a curve into notes.
pub const CONVERT_TOLERANCE: f32 = 2.0;

/// Interior points at this index stride are kept regardless of distance.
const KEEP_STRIDE: usize = 10;

/// Reduce a dense point sequence to its geometrically representative points.
///
/// The first and last points are always kept. An interior point survives when
/// its perpendicular distance to the segment (previous kept point → next raw
/// point) exceeds `tolerance`, when its index is a multiple of the keep
/// stride, or when it is adjacent to either end. Inputs shorter than 3 points
/// are returned unchanged.
pub fn reduce_points(points: &[Point], tolerance: f32) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let last = points.len() - 1;
    let mut result = vec![points[0]];
    let mut last_kept = points[0];

    for i in 1..last {
        let point = points[i];
        let next = points[i + 1];
        let distance = point_to_segment_distance(point, last_kept, next);
        let must_keep = i % KEEP_STRIDE == 0 || i == 1 || i == last - 1;

        if distance > tolerance || must_keep {
            result.push(point);
            last_kept = point;
        }
    }

    result.push(points[last]);
    result
}
