//! Canvas geometry — points, stroke thinning, curve smoothing.
//!
//! Everything here is a pure transformation over point sequences in canvas
//! pixel space. The pitch and time meaning of the axes lives in [`crate::pitch`].

pub mod point;
pub mod simplify;
pub mod smooth;

pub use point::{lerp, point_to_segment_distance, CanvasLayout, Point};
pub use simplify::{reduce_points, CONVERT_TOLERANCE, STROKE_TOLERANCE};
pub use smooth::smooth_points;
