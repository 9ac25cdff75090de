//! Interactive edit lifecycle — one mode at a time, atomic commits.
//!
//! The session is a small state machine over [`EditMode`]. Pointer-down
//! first hit-tests existing control points and only falls back to starting a
//! stroke; every mode-starting operation is a logged no-op outside `Idle`,
//! so two interactions can never overlap. Live drags mutate the model
//! directly and commit on release; shape editing instead buffers the
//! original points and previews into a scratch buffer until apply.

pub mod hit;

pub use hit::{find_nearest_point, PointRef, HIT_THRESHOLD};

use crate::convert::{curve_to_notes, generate_curve_shape, ConvertContext, CurveShape, ShapeError};
use crate::geometry::{reduce_points, Point, STROKE_TOLERANCE};
use crate::pitch::NoteName;
use crate::score::quantize_time;
use crate::track::{Curve, Instrument, TrackId, Tracks};

/// Horizontal scale of the note panel, pixels per second.
const PANEL_PX_PER_SECOND: f32 = 100.0;

/// Vertical scale of the note panel, pixels per scale step.
const PANEL_ROW_HEIGHT: f32 = 20.0;

/// Pointer gaps longer than this are filled with interpolated samples so a
/// fast stroke stays dense.
const GAP_FILL_THRESHOLD: f32 = 10.0;

/// Location of one curve within the track collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveRef {
    pub track: TrackId,
    pub curve: usize,
}

/// Which edge of a note a resize drag grabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Start,
    End,
}

/// Shape selection from the edit panel. `Custom` resolves to the session's
/// snapshot of the curve as it was when editing began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Linear,
    Sine,
    Custom,
}

/// The active interactive mode. At most one is ever active.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditMode {
    #[default]
    Idle,
    /// Free-hand capture in progress; commits into a curve on release.
    Drawing { stroke: Vec<Point> },
    /// One control point follows the pointer, live.
    PointDragging { target: PointRef },
    /// One note follows the pointer in the note panel.
    NoteDragging {
        track: TrackId,
        note: usize,
        origin_time: f64,
        origin_pitch: NoteName,
        grab_x: f32,
        grab_y: f32,
    },
    /// One note edge follows the pointer in the note panel.
    NoteResizing {
        track: TrackId,
        note: usize,
        edge: ResizeEdge,
        origin_time: f64,
        origin_duration: f64,
        grab_x: f32,
    },
    /// Shape panel open; the original curve stays untouched until apply.
    ShapeEditing {
        target: CurveRef,
        snapshot: Vec<Point>,
        preview: Option<Vec<Point>>,
    },
}

/// The transient edit session.
#[derive(Debug, Default)]
pub struct EditSession {
    mode: EditMode,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.mode, EditMode::Idle)
    }

    /// The stroke currently being captured, if any.
    pub fn active_stroke(&self) -> Option<&[Point]> {
        match &self.mode {
            EditMode::Drawing { stroke } => Some(stroke),
            _ => None,
        }
    }

    /// The curve being shape-edited, if any.
    pub fn editing_curve(&self) -> Option<CurveRef> {
        match &self.mode {
            EditMode::ShapeEditing { target, .. } => Some(*target),
            _ => None,
        }
    }

    /// The shape preview scratch buffer, if one has been generated.
    pub fn shape_preview(&self) -> Option<&[Point]> {
        match &self.mode {
            EditMode::ShapeEditing {
                preview: Some(points),
                ..
            } => Some(points),
            _ => None,
        }
    }

    /// Pointer down on the canvas: grab a nearby control point, or start a
    /// fresh stroke when nothing is within reach.
    pub fn pointer_down(
        &mut self,
        tracks: &Tracks,
        ctx: &ConvertContext,
        x: f32,
        y: f32,
        width: Option<f32>,
    ) {
        if !self.is_idle() {
            log::warn!("pointer down ignored: an edit is already active");
            return;
        }

        if let Some(target) = find_nearest_point(tracks, x, y, HIT_THRESHOLD) {
            self.mode = EditMode::PointDragging { target };
            return;
        }

        let first = ctx.layout.clamp(match width {
            Some(w) => Point::with_width(x, y, w),
            None => Point::new(x, y),
        });
        self.mode = EditMode::Drawing {
            stroke: vec![first],
        };
    }

    /// Pointer moved: extend the stroke or advance the live drag.
    pub fn pointer_move(
        &mut self,
        tracks: &mut Tracks,
        ctx: &ConvertContext,
        x: f32,
        y: f32,
        width: Option<f32>,
    ) {
        match &mut self.mode {
            EditMode::Drawing { stroke } => {
                let next = ctx.layout.clamp(match width {
                    Some(w) => Point::with_width(x, y, w),
                    None => Point::new(x, y),
                });
                push_with_gap_fill(stroke, next);
            }
            EditMode::PointDragging { target } => {
                let point = tracks
                    .get_mut(target.track)
                    .and_then(|t| t.curves.get_mut(target.curve))
                    .and_then(|c| c.points.get_mut(target.point));
                match point {
                    Some(point) => {
                        point.x = x;
                        point.y = y;
                    }
                    None => log::warn!("dragged point vanished: {target:?}"),
                }
            }
            EditMode::NoteDragging {
                track,
                note,
                origin_time,
                origin_pitch,
                grab_x,
                grab_y,
            } => {
                let settings = ctx.settings;
                let new_time = (*origin_time + ((x - *grab_x) / PANEL_PX_PER_SECOND) as f64).max(0.0);
                let rows = ((y - *grab_y) / PANEL_ROW_HEIGHT).round() as i32;
                let pitch = origin_pitch.step(-rows);

                match tracks.get_mut(*track).and_then(|t| t.notes.get_mut(*note)) {
                    Some(n) => {
                        n.time = quantize_time(new_time, settings.bpm, settings.quantize);
                        n.pitch = pitch;
                    }
                    None => log::warn!("dragged note vanished: {track} #{note}"),
                }
            }
            EditMode::NoteResizing {
                track,
                note,
                edge,
                origin_time,
                origin_duration,
                grab_x,
            } => {
                let settings = ctx.settings;
                let dt = ((x - *grab_x) / PANEL_PX_PER_SECOND) as f64;
                let quantize = |t: f64| quantize_time(t, settings.bpm, settings.quantize);

                match tracks.get_mut(*track).and_then(|t| t.notes.get_mut(*note)) {
                    Some(n) => match edge {
                        ResizeEdge::Start => {
                            let new_time = (*origin_time + dt).max(0.0);
                            let new_duration = *origin_duration - (new_time - *origin_time);
                            if new_duration > 0.0 {
                                n.time = quantize(new_time);
                                n.duration =
                                    quantize(new_duration).max(settings.sixteenth_duration());
                            }
                        }
                        ResizeEdge::End => {
                            let new_duration =
                                (*origin_duration + dt).max(settings.sixteenth_duration());
                            n.duration = quantize(new_duration);
                        }
                    },
                    None => log::warn!("resized note vanished: {track} #{note}"),
                }
            }
            EditMode::Idle | EditMode::ShapeEditing { .. } => {}
        }
    }

    /// Pointer released: commit the stroke or finish the live drag.
    ///
    /// A stroke commits atomically — thinned, stored as a curve, converted,
    /// and merged into the track's notes in one step. Strokes shorter than
    /// two points are discarded.
    pub fn pointer_up(
        &mut self,
        tracks: &mut Tracks,
        ctx: &ConvertContext,
        current: TrackId,
        instrument: Instrument,
    ) {
        match std::mem::take(&mut self.mode) {
            EditMode::Drawing { stroke } => {
                if stroke.len() < 2 {
                    return;
                }
                let points = reduce_points(&stroke, STROKE_TOLERANCE);
                let curve = Curve::new(points, current, instrument);
                let notes = curve_to_notes(&curve, ctx);

                match tracks.get_mut(current) {
                    Some(track) => {
                        track.curves.push(curve);
                        track.merge_notes(notes);
                    }
                    None => log::warn!("stroke discarded: no such {current}"),
                }
            }
            EditMode::PointDragging { .. }
            | EditMode::NoteDragging { .. }
            | EditMode::NoteResizing { .. }
            | EditMode::Idle => {}
            // Shape editing outlives individual pointer gestures.
            other @ EditMode::ShapeEditing { .. } => self.mode = other,
        }
    }

    /// Start dragging a note in the panel.
    pub fn begin_note_drag(
        &mut self,
        tracks: &Tracks,
        track: TrackId,
        note: usize,
        grab_x: f32,
        grab_y: f32,
    ) {
        if !self.is_idle() {
            log::warn!("note drag ignored: an edit is already active");
            return;
        }
        match tracks.get(track).and_then(|t| t.notes.get(note)) {
            Some(n) => {
                self.mode = EditMode::NoteDragging {
                    track,
                    note,
                    origin_time: n.time,
                    origin_pitch: n.pitch,
                    grab_x,
                    grab_y,
                };
            }
            None => log::warn!("note drag: no such note {track} #{note}"),
        }
    }

    /// Start resizing a note from one of its edges.
    pub fn begin_note_resize(
        &mut self,
        tracks: &Tracks,
        track: TrackId,
        note: usize,
        edge: ResizeEdge,
        grab_x: f32,
    ) {
        if !self.is_idle() {
            log::warn!("note resize ignored: an edit is already active");
            return;
        }
        match tracks.get(track).and_then(|t| t.notes.get(note)) {
            Some(n) => {
                self.mode = EditMode::NoteResizing {
                    track,
                    note,
                    edge,
                    origin_time: n.time,
                    origin_duration: n.duration,
                    grab_x,
                };
            }
            None => log::warn!("note resize: no such note {track} #{note}"),
        }
    }

    /// Open the shape panel for a curve, snapshotting its points.
    pub fn begin_shape_edit(&mut self, tracks: &Tracks, track: TrackId, curve: usize) {
        if !self.is_idle() {
            log::warn!("shape edit ignored: an edit is already active");
            return;
        }
        match tracks.get(track).and_then(|t| t.curves.get(curve)) {
            Some(c) => {
                self.mode = EditMode::ShapeEditing {
                    target: CurveRef { track, curve },
                    snapshot: c.points.clone(),
                    preview: None,
                };
            }
            None => log::warn!("shape edit: no such curve {track} #{curve}"),
        }
    }

    /// Regenerate the preview scratch buffer. The stored curve is untouched.
    pub fn preview_shape(
        &mut self,
        ctx: &ConvertContext,
        kind: ShapeKind,
        start: NoteName,
        end: NoteName,
        steps: usize,
    ) -> Result<(), ShapeError> {
        let EditMode::ShapeEditing {
            snapshot, preview, ..
        } = &mut self.mode
        else {
            log::warn!("shape preview ignored: no shape edit active");
            return Ok(());
        };

        let shape = resolve_shape(kind, snapshot);
        let points = generate_curve_shape(&shape, start, end, steps, ctx)?;
        *preview = Some(points);
        Ok(())
    }

    /// Replace the edited curve's points with freshly generated geometry and
    /// leave the shape edit. On error nothing changes and the panel stays
    /// open.
    pub fn apply_shape(
        &mut self,
        tracks: &mut Tracks,
        ctx: &ConvertContext,
        kind: ShapeKind,
        start: NoteName,
        end: NoteName,
        steps: usize,
    ) -> Result<(), ShapeError> {
        let EditMode::ShapeEditing {
            target, snapshot, ..
        } = &self.mode
        else {
            log::warn!("shape apply ignored: no shape edit active");
            return Ok(());
        };

        let shape = resolve_shape(kind, snapshot);
        let points = generate_curve_shape(&shape, start, end, steps, ctx)?;

        match tracks
            .get_mut(target.track)
            .and_then(|t| t.curves.get_mut(target.curve))
        {
            Some(curve) => curve.points = points,
            None => log::warn!("shape apply: edited curve vanished: {target:?}"),
        }
        self.mode = EditMode::Idle;
        Ok(())
    }

    /// Close the shape panel. The original curve was never mutated, so there
    /// is nothing to restore.
    pub fn cancel_shape_edit(&mut self) {
        if matches!(self.mode, EditMode::ShapeEditing { .. }) {
            self.mode = EditMode::Idle;
        }
    }
}

fn resolve_shape(kind: ShapeKind, snapshot: &[Point]) -> CurveShape {
    match kind {
        ShapeKind::Linear => CurveShape::Linear,
        ShapeKind::Sine => CurveShape::Sine,
        ShapeKind::Custom => CurveShape::Custom(snapshot.to_vec()),
    }
}

/// Append a captured point, inserting interpolated samples when the pointer
/// jumped farther than the gap threshold since the last sample.
fn push_with_gap_fill(stroke: &mut Vec<Point>, next: Point) {
    if let Some(&last) = stroke.last() {
        let distance = last.distance_to(next);
        if distance > GAP_FILL_THRESHOLD {
            let steps = (distance / GAP_FILL_THRESHOLD).ceil() as usize;
            for i in 1..steps {
                let t = i as f32 / steps as f32;
                stroke.push(Point::new(
                    last.x + (next.x - last.x) * t,
                    last.y + (next.y - last.y) * t,
                ));
            }
        }
    }
    stroke.push(next);
}
