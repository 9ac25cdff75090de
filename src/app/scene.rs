//! Renderer-facing view of the model — data only, no drawing.
//!
//! The rendering collaborator asks for a [`Scene`] after every mutation and
//! draws it however it likes. Point sequences are borrowed straight from the
//! model; grid positions are precomputed from the music settings.

use crate::geometry::{CanvasLayout, Point};
use crate::score::MusicSettings;
use crate::track::TrackId;

/// One curve ready to draw.
#[derive(Debug, Clone, Copy)]
pub struct CurveView<'a> {
    pub track: TrackId,
    pub curve: usize,
    pub points: &'a [Point],
    /// Hue in degrees; tracks are spread evenly around the color wheel.
    pub hue: f32,
    pub show_control_points: bool,
    /// Set for the curve currently being shape-edited.
    pub highlighted: bool,
}

/// Everything the renderer needs for one frame.
#[derive(Debug)]
pub struct Scene<'a> {
    pub layout: CanvasLayout,
    pub octave_range: u32,
    pub curves: Vec<CurveView<'a>>,
    /// The stroke being captured right now, drawn without control points.
    pub active_stroke: Option<&'a [Point]>,
    /// The shape-edit preview, drawn translucent over everything.
    pub shape_preview: Option<&'a [Point]>,
    pub grid: GridSpec,
}

/// Grid geometry for the timeline background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub measure_width: f32,
    pub beat_width: f32,
    pub subdivision_width: f32,
    pub measure_count: u32,
    pub beats_per_measure: u32,
    pub slots_per_beat: u32,
    pub octave_height: f32,
    pub octave_range: u32,
}

impl GridSpec {
    pub fn new(settings: &MusicSettings, layout: CanvasLayout, octave_range: u32) -> Self {
        let measure_width = layout.width / settings.measure_count as f32;
        let beats_per_measure = settings.time_signature.numerator as u32;
        let beat_width = measure_width / beats_per_measure as f32;
        let slots_per_beat = settings.quantize.slots_per_beat();
        Self {
            measure_width,
            beat_width,
            subdivision_width: beat_width / slots_per_beat as f32,
            measure_count: settings.measure_count,
            beats_per_measure,
            slots_per_beat,
            octave_height: layout.height / octave_range as f32,
            octave_range,
        }
    }

    /// X positions of the measure lines, including both outer edges.
    pub fn measure_lines(&self) -> Vec<f32> {
        (0..=self.measure_count)
            .map(|i| i as f32 * self.measure_width)
            .collect()
    }

    /// X positions of the beat lines, measure lines excluded.
    pub fn beat_lines(&self) -> Vec<f32> {
        let mut lines = Vec::new();
        for measure in 0..self.measure_count {
            for beat in 1..self.beats_per_measure {
                lines.push(measure as f32 * self.measure_width + beat as f32 * self.beat_width);
            }
        }
        lines
    }

    /// X positions of the subdivision lines, beat and measure lines excluded.
    pub fn subdivision_lines(&self) -> Vec<f32> {
        let mut lines = Vec::new();
        for measure in 0..self.measure_count {
            let slots = self.beats_per_measure * self.slots_per_beat;
            for slot in 1..slots {
                if slot % self.slots_per_beat != 0 {
                    lines.push(
                        measure as f32 * self.measure_width
                            + slot as f32 * self.subdivision_width,
                    );
                }
            }
        }
        lines
    }

    /// Y positions of the octave lines, including both canvas edges.
    pub fn octave_lines(&self) -> Vec<f32> {
        (0..=self.octave_range)
            .map(|i| i as f32 * self.octave_height)
            .collect()
    }

    /// Y positions of the semitone lines between the octave lines.
    pub fn semitone_lines(&self) -> Vec<f32> {
        let mut lines = Vec::new();
        let semitone = self.octave_height / 12.0;
        for octave in 0..self.octave_range {
            let base = octave as f32 * self.octave_height;
            for step in 1..12 {
                lines.push(base + step as f32 * semitone);
            }
        }
        lines
    }
}

/// Hue assigned to a track, spreading all tracks around the color wheel.
pub fn track_hue(id: TrackId, track_count: usize) -> f32 {
    if track_count == 0 {
        return 0.0;
    }
    id.0 as f32 * 360.0 / track_count as f32
}
