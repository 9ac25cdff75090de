//! Offline note rendering — pure, deterministic, no audio hardware.

use std::path::Path;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use super::preset::{waveform_sample, InstrumentPreset};

/// Render one note into interleaved samples.
///
/// The buffer covers the held duration plus the envelope's release tail.
/// Harmonics are phase-locked to a single accumulator and normalized by the
/// partial sum, so the oscillator output never clips on its own. The noise
/// transient draws from the caller's seeded RNG, keeping renders
/// reproducible.
pub fn render_note(
    preset: &InstrumentPreset,
    freq: f64,
    duration: f64,
    gain: f32,
    sample_rate: u32,
    channels: u16,
    rng: &mut ChaCha8Rng,
) -> Vec<f32> {
    if !freq.is_finite() || freq <= 0.0 || duration <= 0.0 {
        return Vec::new();
    }

    let total = preset.envelope.total_duration(duration);
    let frames = (total * sample_rate as f64).ceil() as usize;
    let channels = channels as usize;
    let mut out = vec![0.0f32; frames * channels];

    let dt = 1.0 / sample_rate as f64;
    let norm: f32 = preset.partials.iter().sum();
    let mut phase = 0.0f64;

    for frame in 0..frames {
        let t = frame as f64 * dt;
        let env = preset.envelope.level(t, duration) as f32;

        let mut tone = 0.0f64;
        for (k, amp) in preset.partials.iter().enumerate() {
            let harmonic_phase = (phase * (k + 1) as f64).fract();
            tone += *amp as f64 * waveform_sample(preset.waveform, harmonic_phase);
        }
        let tone = tone as f32 / norm;

        let transient = if preset.noise > 0.0 {
            rng.gen_range(-1.0f32..1.0) * preset.noise * (-preset.noise_decay as f64 * t).exp() as f32
        } else {
            0.0
        };

        let value = (tone * env + transient) * preset.gain * gain;
        for ch in 0..channels {
            out[frame * channels + ch] = value;
        }

        phase += freq * dt;
    }

    out
}

/// Mix `samples` additively into `master` starting at `offset` interleaved
/// samples, growing the master buffer as needed.
pub fn mix_at(master: &mut Vec<f32>, offset: usize, samples: &[f32]) {
    let end = offset + samples.len();
    if master.len() < end {
        master.resize(end, 0.0);
    }
    for (slot, sample) in master[offset..end].iter_mut().zip(samples) {
        *slot += sample;
    }
}

/// Write an interleaved mix to a 16-bit WAV file.
pub fn write_wav(
    path: impl AsRef<Path>,
    samples: &[f32],
    sample_rate: u32,
    channels: u16,
) -> Result<(), hound::Error> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        writer.write_sample((clamped * i16::MAX as f32) as i16)?;
    }
    writer.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::preset::preset_for;
    use crate::track::Instrument;
    use rand::SeedableRng;

    const SAMPLE_RATE: u32 = 44100;
    const SEED: u64 = 42;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(SEED)
    }

    #[test]
    fn render_covers_duration_plus_release() {
        let preset = preset_for(Instrument::Dizi);
        let out = render_note(&preset, 440.0, 0.5, 1.0, SAMPLE_RATE, 2, &mut rng());
        let expected_frames =
            ((0.5 + preset.envelope.release) * SAMPLE_RATE as f64).ceil() as usize;
        assert_eq!(out.len(), expected_frames * 2);
    }

    #[test]
    fn render_produces_sound() {
        let preset = preset_for(Instrument::Guzheng);
        let out = render_note(&preset, 261.63, 0.5, 1.0, SAMPLE_RATE, 2, &mut rng());
        assert!(out.iter().any(|s| s.abs() > 0.01), "render was silent");
    }

    #[test]
    fn render_stays_in_range() {
        for instrument in [Instrument::Guzheng, Instrument::Dizi] {
            let preset = preset_for(instrument);
            let out = render_note(&preset, 523.25, 1.0, 1.0, SAMPLE_RATE, 2, &mut rng());
            for s in out {
                assert!(s.abs() <= 1.0, "{instrument}: sample {s} out of range");
            }
        }
    }

    #[test]
    fn render_is_deterministic_for_a_seed() {
        let preset = preset_for(Instrument::Guzheng);
        let a = render_note(&preset, 220.0, 0.25, 0.8, SAMPLE_RATE, 2, &mut rng());
        let b = render_note(&preset, 220.0, 0.25, 0.8, SAMPLE_RATE, 2, &mut rng());
        assert_eq!(a, b);
    }

    #[test]
    fn zero_gain_is_silent_tone() {
        let preset = preset_for(Instrument::Dizi);
        let out = render_note(&preset, 440.0, 0.25, 0.0, SAMPLE_RATE, 2, &mut rng());
        assert!(out.iter().all(|s| s.abs() < 1e-6));
    }

    #[test]
    fn degenerate_inputs_render_nothing() {
        let preset = preset_for(Instrument::Dizi);
        assert!(render_note(&preset, 0.0, 0.5, 1.0, SAMPLE_RATE, 2, &mut rng()).is_empty());
        assert!(render_note(&preset, f64::NAN, 0.5, 1.0, SAMPLE_RATE, 2, &mut rng()).is_empty());
        assert!(render_note(&preset, 440.0, 0.0, 1.0, SAMPLE_RATE, 2, &mut rng()).is_empty());
    }

    #[test]
    fn channels_are_duplicated() {
        let preset = preset_for(Instrument::Dizi);
        let out = render_note(&preset, 440.0, 0.1, 1.0, SAMPLE_RATE, 2, &mut rng());
        for frame in out.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
    }

    #[test]
    fn mix_grows_and_adds() {
        let mut master = vec![0.1f32; 4];
        mix_at(&mut master, 2, &[0.2, 0.2, 0.2, 0.2]);
        assert_eq!(master.len(), 6);
        assert!((master[0] - 0.1).abs() < 1e-6);
        assert!((master[2] - 0.3).abs() < 1e-6);
        assert!((master[4] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn wav_round_trips_through_hound() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.wav");

        let preset = preset_for(Instrument::Guzheng);
        let mix = render_note(&preset, 261.63, 0.25, 1.0, SAMPLE_RATE, 2, &mut rng());
        write_wav(&path, &mix, SAMPLE_RATE, 2).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, SAMPLE_RATE);
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.len() as usize, mix.len());
    }
}
