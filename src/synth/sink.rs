//! The reference audio collaborator — renders scheduled notes into a master
//! mix and streams it to the device.
//!
//! The device opens lazily on the first `ensure_ready`, mirroring how the
//! audio context comes up on the first user gesture; until then nothing is
//! dropped because playback always awaits readiness before scheduling. An
//! offline variant renders the same mix without hardware for tests and WAV
//! export.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::pitch::NoteName;
use crate::playback::{NoteSink, PlaybackError};
use crate::track::Instrument;

use super::output::AudioOutput;
use super::preset::preset_for;
use super::render::{mix_at, render_note};

/// Samples pushed to the device per write burst.
const CHUNK_FRAMES: usize = 2048;

enum Backend {
    /// No device yet; `ensure_ready` opens one.
    Uninitialized,
    Device(AudioOutput),
    /// Fixed format, no hardware.
    Offline { sample_rate: u32, channels: u16 },
}

/// A [`NoteSink`] backed by the built-in synthesizer.
pub struct SynthSink {
    backend: Backend,
    pending: Vec<f32>,
    rng: ChaCha8Rng,
}

impl SynthSink {
    /// A sink that will open the default audio device when first needed.
    pub fn new(seed: u64) -> Self {
        Self {
            backend: Backend::Uninitialized,
            pending: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// A sink that renders without hardware at the given format.
    pub fn offline(sample_rate: u32, channels: u16, seed: u64) -> Self {
        Self {
            backend: Backend::Offline {
                sample_rate,
                channels,
            },
            pending: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn format(&self) -> Option<(u32, u16)> {
        match &self.backend {
            Backend::Uninitialized => None,
            Backend::Device(output) => Some((output.sample_rate(), output.channels())),
            Backend::Offline {
                sample_rate,
                channels,
            } => Some((*sample_rate, *channels)),
        }
    }

    pub fn sample_rate(&self) -> Option<u32> {
        self.format().map(|(rate, _)| rate)
    }

    pub fn channels(&self) -> Option<u16> {
        self.format().map(|(_, channels)| channels)
    }

    /// The accumulated mix of everything scheduled so far.
    pub fn mix(&self) -> &[f32] {
        &self.pending
    }

    /// Take the accumulated mix, leaving the sink empty for the next batch.
    pub fn take_mix(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.pending)
    }

    /// Stream the pending mix to the device, blocking until it has played
    /// out or `stop` is raised. A no-op for offline sinks.
    pub fn play(&mut self, stop: &AtomicBool) -> Result<(), PlaybackError> {
        let mix = self.take_mix();
        let Backend::Device(output) = &mut self.backend else {
            return Ok(());
        };

        let channels = output.channels() as usize;
        let chunk = CHUNK_FRAMES * channels;
        let chunk_time = Duration::from_secs_f64(CHUNK_FRAMES as f64 / output.sample_rate() as f64);

        let mut cursor = 0;
        while cursor < mix.len() && !stop.load(Ordering::Relaxed) {
            let end = (cursor + chunk).min(mix.len());
            cursor += output.write(&mix[cursor..end]);
            std::thread::sleep(chunk_time / 2);
        }

        // Let the queued tail drain before returning.
        if !stop.load(Ordering::Relaxed) {
            let queued = Duration::from_secs_f64(
                chunk as f64 / (output.sample_rate() as f64 * channels as f64),
            );
            std::thread::sleep(queued);
        }
        Ok(())
    }
}

impl NoteSink for SynthSink {
    fn ensure_ready(&mut self) -> Result<(), PlaybackError> {
        if matches!(self.backend, Backend::Uninitialized) {
            self.backend = Backend::Device(AudioOutput::new()?);
        }
        Ok(())
    }

    fn schedule_note(
        &mut self,
        instrument: Instrument,
        pitch: NoteName,
        duration: f64,
        offset: f64,
    ) -> Result<(), PlaybackError> {
        self.ensure_ready()?;
        let (sample_rate, channels) = match self.format() {
            Some(format) => format,
            None => return Ok(()),
        };

        let Some(freq) = pitch.frequency() else {
            log::warn!("not scheduling out-of-range pitch {pitch}");
            return Ok(());
        };

        let preset = preset_for(instrument);
        let rendered = render_note(
            &preset,
            freq,
            duration,
            1.0,
            sample_rate,
            channels,
            &mut self.rng,
        );
        let offset_samples = (offset.max(0.0) * sample_rate as f64) as usize * channels as usize;
        mix_at(&mut self.pending, offset_samples, &rendered);
        Ok(())
    }
}
