//! Curve↔note conversion — the bridge between drawn geometry and discrete
//! musical events.
//!
//! The forward direction walks an x-ordered point sequence with a
//! current-note accumulator, splitting whenever the snapped pitch changes or
//! the raw frequency jumps. The inverse lays two points per note so a note
//! list becomes an editable contour again.

pub mod shape;

pub use shape::{generate_curve_shape, CurveShape, ShapeError};

use std::cmp::Ordering;

use crate::geometry::{reduce_points, CanvasLayout, Point, CONVERT_TOLERANCE};
use crate::pitch::{closest_note, time_to_x, x_to_time, PitchRange};
use crate::score::{quantize_time, MusicSettings};
use crate::track::{Curve, Note};

/// Narrowest stroke the pen produces; assumed when a point has no width.
pub const MIN_STROKE_WIDTH: f32 = 2.0;

/// Widest stroke the pen produces; full velocity.
pub const MAX_STROKE_WIDTH: f32 = 6.0;

/// Frequency delta between neighboring points that forces a note split even
/// when both snap to the same table pitch.
const FREQ_SPLIT_TOLERANCE: f64 = 0.1;

/// Everything a conversion needs to interpret canvas coordinates.
#[derive(Debug, Clone, Copy)]
pub struct ConvertContext {
    pub settings: MusicSettings,
    pub layout: CanvasLayout,
    pub range: PitchRange,
}

impl ConvertContext {
    fn time_at(&self, x: f32) -> f64 {
        x_to_time(x, self.layout.width, self.settings.total_duration())
    }

    fn x_at(&self, time: f64) -> f32 {
        time_to_x(time, self.layout.width, self.settings.total_duration())
    }

    fn quantize(&self, t: f64) -> f64 {
        quantize_time(t, self.settings.bpm, self.settings.quantize)
    }
}

/// Map a stroke width to MIDI velocity.
pub fn velocity_from_width(width: Option<f32>) -> u8 {
    let w = width.unwrap_or(MIN_STROKE_WIDTH).clamp(0.0, MAX_STROKE_WIDTH);
    (w / MAX_STROKE_WIDTH * 127.0).round() as u8
}

/// Convert a committed curve into quantized notes.
///
/// Points are thinned at the conversion tolerance first, then folded into a
/// current-note accumulator. The accumulator closes (and a fresh one opens)
/// when the snapped pitch changes, when the frequency moves more than the
/// split tolerance between neighboring points, or at the final point. Closed
/// notes get `duration = max(quantized span, sixteenth)`, so every emitted
/// note has positive length. Points with a non-finite frequency are skipped.
pub fn curve_to_notes(curve: &Curve, ctx: &ConvertContext) -> Vec<Note> {
    let points = reduce_points(&curve.points, CONVERT_TOLERANCE);
    if points.is_empty() {
        return Vec::new();
    }

    let mut notes = Vec::new();
    let mut current: Option<Note> = None;
    let mut prev_freq: Option<f64> = None;
    let last = points.len() - 1;

    for (index, point) in points.iter().enumerate() {
        let time = ctx.time_at(point.x);
        let freq = ctx.range.y_to_frequency(point.y, ctx.layout.height);
        if !freq.is_finite() {
            continue;
        }
        let pitch = closest_note(freq);
        let velocity = velocity_from_width(point.width);

        let split = match &current {
            None => false,
            Some(note) => {
                note.pitch != pitch
                    || prev_freq.is_some_and(|p| (freq - p).abs() > FREQ_SPLIT_TOLERANCE)
                    || index == last
            }
        };

        if split {
            if let Some(mut done) = current.take() {
                done.duration = ctx
                    .quantize(time - done.time)
                    .max(ctx.settings.sixteenth_duration());
                if done.duration > 0.0 {
                    notes.push(done);
                }
            }
        }
        if current.is_none() {
            current = Some(Note::new(
                pitch,
                ctx.quantize(time),
                0.0,
                velocity,
                curve.instrument,
            ));
        }
        prev_freq = Some(freq);
    }

    notes
}

/// Rebuild contour geometry from a note list.
///
/// Every note contributes two points at its pitch height, one at onset and
/// one at release, with the stroke width recovered from velocity. The result
/// is x-sorted and replaces a track's primary curve.
pub fn notes_to_geometry(notes: &[Note], ctx: &ConvertContext) -> Vec<Point> {
    let mut points = Vec::with_capacity(notes.len() * 2);

    for note in notes {
        let Some(freq) = note.pitch.frequency() else {
            log::warn!("skipping note with out-of-range pitch {}", note.pitch);
            continue;
        };
        let y = ctx.range.frequency_to_y(freq, ctx.layout.height);
        let width = note.velocity as f32 / 127.0 * MAX_STROKE_WIDTH;

        points.push(Point::with_width(ctx.x_at(note.time), y, width));
        points.push(Point::with_width(ctx.x_at(note.end_time()), y, width));
    }

    points.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
    points
}
