//! Parametric curve shapes for the shape-editing panel.

use std::f64::consts::PI;
use std::fmt;

use crate::geometry::{lerp, Point};
use crate::pitch::NoteName;

use super::ConvertContext;

/// How to trace the curve between two endpoint notes.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveShape {
    /// Straight frequency ramp from start to end.
    Linear,
    /// Half-sine ease: starts and ends at the frequency midpoint and peaks
    /// at the end frequency halfway through.
    Sine,
    /// Resample the drawn contour that was snapshotted when editing began.
    Custom(Vec<Point>),
}

/// Shape generation failures.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// Fewer than two points were requested.
    TooFewSteps(usize),
    /// An endpoint note is outside the playing range.
    UnknownNote(NoteName),
    /// A custom shape was requested but no snapshot exists to resample.
    EmptySnapshot,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::TooFewSteps(n) => {
                write!(f, "curve shape needs at least 2 points, got {n}")
            }
            ShapeError::UnknownNote(note) => {
                write!(f, "note {note} is outside the playing range")
            }
            ShapeError::EmptySnapshot => {
                write!(f, "custom shape requires a snapshot of the original points")
            }
        }
    }
}

impl std::error::Error for ShapeError {}

/// Produce `steps` points evenly spaced across the canvas width, tracing the
/// requested shape between the two endpoint notes.
///
/// Linear and Sine interpolate *frequencies* and convert them through the
/// pitch axis; Custom resamples nearest-index from the snapshot, whose y
/// values are already canvas coordinates.
pub fn generate_curve_shape(
    shape: &CurveShape,
    start: NoteName,
    end: NoteName,
    steps: usize,
    ctx: &ConvertContext,
) -> Result<Vec<Point>, ShapeError> {
    if steps < 2 {
        return Err(ShapeError::TooFewSteps(steps));
    }
    let start_freq = start.frequency().ok_or(ShapeError::UnknownNote(start))?;
    let end_freq = end.frequency().ok_or(ShapeError::UnknownNote(end))?;

    if let CurveShape::Custom(snapshot) = shape {
        if snapshot.is_empty() {
            return Err(ShapeError::EmptySnapshot);
        }
    }

    let mut points = Vec::with_capacity(steps);
    for i in 0..steps {
        let t = i as f64 / (steps - 1) as f64;
        let x = (t * ctx.layout.width as f64) as f32;

        let y = match shape {
            CurveShape::Linear => {
                let freq = lerp(start_freq, end_freq, t);
                ctx.range.frequency_to_y(freq, ctx.layout.height)
            }
            CurveShape::Sine => {
                let freq = start_freq + (end_freq - start_freq) * ((t * PI).sin() + 1.0) / 2.0;
                ctx.range.frequency_to_y(freq, ctx.layout.height)
            }
            CurveShape::Custom(snapshot) => {
                let index = (t * (snapshot.len() - 1) as f64).floor() as usize;
                snapshot[index].y
            }
        };

        points.push(Point::new(x, y));
    }

    Ok(points)
}
