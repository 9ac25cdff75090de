//! Reference synthesizer — the built-in audio collaborator.
//!
//! Pure rendering ([`render_note`]) is separated from device output
//! ([`AudioOutput`]) so everything above the cpal boundary is testable
//! without hardware. [`SynthSink`] wires both behind the
//! [`NoteSink`](crate::playback::NoteSink) contract.

pub mod output;
pub mod preset;
pub mod render;
pub mod sink;

pub use output::AudioOutput;
pub use preset::{preset_for, Adsr, InstrumentPreset, Waveform};
pub use render::{mix_at, render_note, write_wav};
pub use sink::SynthSink;
