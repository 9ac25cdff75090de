//! Melisma — a pitch-contour sketching sequencer.
//!
//! Draw a curve over a timeline grid, get quantized notes, hear them. The
//! core is the conversion and editing engine: geometry in, discrete musical
//! events out, with an interactive session keeping both sides consistent.

pub mod app;
pub mod config;
pub mod convert;
pub mod geometry;
pub mod pitch;
pub mod playback;
pub mod score;
pub mod session;
pub mod synth;
pub mod track;
