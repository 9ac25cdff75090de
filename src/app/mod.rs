//! Application state — the single owner of every mutable piece of the model.
//!
//! All mutation flows through [`ApplicationState::dispatch`] on one thread;
//! there are no ambient globals. The UI layer translates raw input into
//! [`EditCommand`]s and reads back a [`Scene`] to draw.

pub mod command;
pub mod scene;
pub mod viewport;

pub use command::{EditCommand, NoteChange};
pub use scene::{track_hue, CurveView, GridSpec, Scene};
pub use viewport::{Viewport, SCROLL_STEP};

use crate::config::AppConfig;
use crate::convert::{curve_to_notes, notes_to_geometry, ConvertContext};
use crate::geometry::{smooth_points, CanvasLayout};
use crate::pitch::{NoteName, PitchRange};
use crate::playback::{self, NoteSink};
use crate::score::{quantize_time, MusicSettings};
use crate::session::{CurveRef, EditSession};
use crate::track::{Curve, Instrument, TrackId, Tracks, PERMANENT_TRACK};

/// Base width of one measure on the canvas.
const MEASURE_WIDTH: f32 = 200.0;

/// Extra scrollable space past the last measure.
const CANVAS_SLACK: f32 = 200.0;

/// Canvas width derived from the measure count, never narrower than the view.
fn canvas_width(settings: &MusicSettings, view_width: f32) -> f32 {
    (MEASURE_WIDTH * settings.measure_count as f32).max(view_width) + CANVAS_SLACK
}

/// The whole application model.
pub struct ApplicationState {
    tracks: Tracks,
    settings: MusicSettings,
    session: EditSession,
    viewport: Viewport,
    current_track: TrackId,
    pitch_range: PitchRange,
    canvas_height: f32,
    default_instrument: Instrument,
}

impl ApplicationState {
    pub fn new(config: &AppConfig) -> Self {
        let settings = config.music;
        let viewport = Viewport::new(
            config.view_width,
            canvas_width(&settings, config.view_width),
        );
        Self {
            tracks: Tracks::new(config.default_instrument),
            settings,
            session: EditSession::new(),
            viewport,
            current_track: PERMANENT_TRACK,
            pitch_range: PitchRange::new(config.octave_range),
            canvas_height: config.canvas_height,
            default_instrument: config.default_instrument,
        }
    }

    pub fn tracks(&self) -> &Tracks {
        &self.tracks
    }

    pub fn settings(&self) -> &MusicSettings {
        &self.settings
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn current_track(&self) -> TrackId {
        self.current_track
    }

    pub fn pitch_range(&self) -> PitchRange {
        self.pitch_range
    }

    /// Current canvas dimensions, as the renderer should size its surface.
    pub fn layout(&self) -> CanvasLayout {
        CanvasLayout::new(self.viewport.content_width, self.canvas_height)
    }

    fn ctx(&self) -> ConvertContext {
        ConvertContext {
            settings: self.settings,
            layout: self.layout(),
            range: self.pitch_range,
        }
    }

    fn sync_layout(&mut self) {
        let width = canvas_width(&self.settings, self.viewport.view_width);
        self.viewport.set_content_width(width);
    }

    /// Apply one edit command. Invalid references and out-of-range values
    /// are logged no-ops; the model is never left half-mutated.
    pub fn dispatch(&mut self, command: EditCommand) {
        match command {
            EditCommand::PointerDown { x, y, width } => {
                let ctx = self.ctx();
                self.session.pointer_down(&self.tracks, &ctx, x, y, width);
            }
            EditCommand::PointerMove { x, y, width } => {
                let ctx = self.ctx();
                self.session.pointer_move(&mut self.tracks, &ctx, x, y, width);
                if !self.session.is_idle() {
                    self.viewport.auto_scroll(x - self.viewport.scroll_x);
                }
            }
            EditCommand::PointerUp => {
                let ctx = self.ctx();
                let instrument = self
                    .tracks
                    .get(self.current_track)
                    .map(|t| t.instrument)
                    .unwrap_or(self.default_instrument);
                self.session
                    .pointer_up(&mut self.tracks, &ctx, self.current_track, instrument);
            }

            EditCommand::AddTrack { instrument } => {
                self.tracks.add(instrument);
            }
            EditCommand::RemoveTrack(id) => {
                if self.tracks.remove(id) && self.current_track == id {
                    self.current_track = PERMANENT_TRACK;
                }
            }
            EditCommand::ClearTrack(id) => self.tracks.clear(id),
            EditCommand::SelectTrack(id) => {
                if self.tracks.get(id).is_some() {
                    self.current_track = id;
                } else {
                    log::warn!("select: no such {id}");
                }
            }
            EditCommand::SetTrackInstrument { track, instrument } => {
                self.tracks.set_instrument(track, instrument);
            }

            EditCommand::AddNote { track, mut note } => {
                let settings = self.settings;
                note.time = quantize_time(note.time.max(0.0), settings.bpm, settings.quantize);
                note.duration = quantize_time(note.duration, settings.bpm, settings.quantize)
                    .max(settings.sixteenth_duration());
                match self.tracks.get_mut(track) {
                    Some(t) => t.merge_notes([note]),
                    None => log::warn!("add note: no such {track}"),
                }
            }
            EditCommand::UpdateNote {
                track,
                note,
                change,
            } => self.update_note(track, note, change),
            EditCommand::DeleteNote { track, note } => {
                match self.tracks.get_mut(track) {
                    Some(t) if note < t.notes.len() => {
                        t.notes.remove(note);
                    }
                    _ => log::warn!("delete note: no such note {track} #{note}"),
                }
            }
            EditCommand::BeginNoteDrag {
                track,
                note,
                grab_x,
                grab_y,
            } => self
                .session
                .begin_note_drag(&self.tracks, track, note, grab_x, grab_y),
            EditCommand::BeginNoteResize {
                track,
                note,
                edge,
                grab_x,
            } => self
                .session
                .begin_note_resize(&self.tracks, track, note, edge, grab_x),

            EditCommand::DeleteCurve { track, curve } => {
                match self.tracks.get_mut(track) {
                    Some(t) if curve < t.curves.len() => {
                        t.curves.remove(curve);
                    }
                    _ => log::warn!("delete curve: no such curve {track} #{curve}"),
                }
            }
            EditCommand::BeginShapeEdit { track, curve } => {
                self.session.begin_shape_edit(&self.tracks, track, curve);
            }
            EditCommand::PreviewShape { shape, start, end } => {
                let ctx = self.ctx();
                let steps = self.settings.slot_count();
                if let Err(e) = self.session.preview_shape(&ctx, shape, start, end, steps) {
                    log::warn!("shape preview failed: {e}");
                }
            }
            EditCommand::ApplyShape { shape, start, end } => {
                let ctx = self.ctx();
                let steps = self.settings.slot_count();
                if let Err(e) =
                    self.session
                        .apply_shape(&mut self.tracks, &ctx, shape, start, end, steps)
                {
                    log::warn!("shape apply failed: {e}");
                }
            }
            EditCommand::CancelShapeEdit => self.session.cancel_shape_edit(),
            EditCommand::SmoothCurves => self.smooth_curves(),
            EditCommand::RegenerateCurve(id) => self.regenerate_curve(id),
            EditCommand::ConvertCurves(id) => self.convert_curves(id),

            EditCommand::SetBpm(bpm) => {
                if bpm.is_finite() && bpm > 0.0 {
                    self.settings.bpm = bpm;
                } else {
                    log::warn!("ignoring invalid bpm {bpm}");
                }
            }
            EditCommand::SetTimeSignature(ts) => {
                self.settings.time_signature = ts;
            }
            EditCommand::SetQuantize(unit) => {
                self.settings.quantize = unit;
            }
            EditCommand::SetMeasureCount(count) => {
                if count >= 1 {
                    self.settings.measure_count = count;
                    self.sync_layout();
                } else {
                    log::warn!("ignoring measure count of zero");
                }
            }

            EditCommand::ScrollToStart => self.viewport.scroll_to_start(),
            EditCommand::ScrollToEnd => self.viewport.scroll_to_end(),
            EditCommand::ScrollBy(dx) => self.viewport.scroll_by(dx),
        }
    }

    fn update_note(&mut self, track: TrackId, index: usize, change: NoteChange) {
        let settings = self.settings;
        let Some(t) = self.tracks.get_mut(track) else {
            log::warn!("update note: no such {track}");
            return;
        };
        let Some(note) = t.notes.get_mut(index) else {
            log::warn!("update note: no such note {track} #{index}");
            return;
        };

        match change {
            NoteChange::Pitch(pitch) => note.pitch = pitch,
            NoteChange::Time(time) => {
                note.time = quantize_time(time.max(0.0), settings.bpm, settings.quantize);
            }
            NoteChange::Duration(duration) => {
                note.duration = quantize_time(duration, settings.bpm, settings.quantize)
                    .max(settings.sixteenth_duration());
            }
            NoteChange::Velocity(velocity) => note.velocity = velocity.min(127),
        }

        if matches!(change, NoteChange::Time(_)) {
            t.sort_notes();
        }
    }

    /// Smooth every curve on every track. Endpoints stay put and the output
    /// is clamped into the canvas.
    fn smooth_curves(&mut self) {
        let layout = self.layout();
        for track in self.tracks.iter_mut() {
            for curve in &mut track.curves {
                curve.points = smooth_points(&curve.points, layout);
            }
        }
    }

    /// Rebuild a track's primary curve from its notes.
    fn regenerate_curve(&mut self, id: TrackId) {
        let ctx = self.ctx();
        let Some(track) = self.tracks.get_mut(id) else {
            log::warn!("regenerate: no such {id}");
            return;
        };

        let points = notes_to_geometry(&track.notes, &ctx);
        if points.len() < 2 {
            log::warn!("regenerate: not enough notes on {id} to form a curve");
            return;
        }

        let instrument = track.instrument;
        match track.curves.first_mut() {
            Some(primary) => primary.points = points,
            None => track.curves.push(Curve::new(points, id, instrument)),
        }
    }

    /// Convert every curve on a track into notes and merge them in.
    fn convert_curves(&mut self, id: TrackId) {
        let ctx = self.ctx();
        let Some(track) = self.tracks.get_mut(id) else {
            log::warn!("convert: no such {id}");
            return;
        };

        let mut notes = Vec::new();
        for curve in &track.curves {
            notes.extend(curve_to_notes(curve, &ctx));
        }
        track.merge_notes(notes);
    }

    /// Assemble the frame for the rendering collaborator.
    pub fn scene(&self) -> Scene<'_> {
        let layout = self.layout();
        let editing = self.session.editing_curve();
        let count = self.tracks.len();

        let mut curves = Vec::new();
        for track in self.tracks.iter() {
            for (index, curve) in track.curves.iter().enumerate() {
                if curve.points.is_empty() {
                    continue;
                }
                curves.push(CurveView {
                    track: track.id,
                    curve: index,
                    points: &curve.points,
                    hue: track_hue(track.id, count),
                    show_control_points: true,
                    highlighted: editing
                        == Some(CurveRef {
                            track: track.id,
                            curve: index,
                        }),
                });
            }
        }

        Scene {
            layout,
            octave_range: self.pitch_range.octave_range,
            curves,
            active_stroke: self.session.active_stroke(),
            shape_preview: self.session.shape_preview(),
            grid: GridSpec::new(&self.settings, layout, self.pitch_range.octave_range),
        }
    }

    /// Endpoint notes of the curve being shape-edited, used to seed the
    /// editing panel's note selectors.
    pub fn shape_edit_endpoints(&self) -> Option<(NoteName, NoteName)> {
        let target = self.session.editing_curve()?;
        let curve = self.tracks.get(target.track)?.curves.get(target.curve)?;
        curve.endpoint_notes(self.pitch_range, self.canvas_height)
    }

    /// Play one track through an audio collaborator.
    pub fn play_track(&self, id: TrackId, sink: &mut dyn NoteSink) {
        playback::play_track(&self.tracks, id, &self.ctx(), sink);
    }

    /// Play the selected track.
    pub fn play_current(&self, sink: &mut dyn NoteSink) {
        self.play_track(self.current_track, sink);
    }

    /// Play everything.
    pub fn play_all(&self, sink: &mut dyn NoteSink) {
        playback::play_all_tracks(&self.tracks, &self.ctx(), sink);
    }
}
