//! Instrument voices — oscillator, harmonic content, and envelope per
//! instrument.

use crate::track::Instrument;

/// Available oscillator waveforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

/// Generate one waveform sample at `phase` in `[0, 1)`.
///
/// Returns a value in `[-1, 1]`.
pub fn waveform_sample(waveform: Waveform, phase: f64) -> f64 {
    match waveform {
        Waveform::Sine => (phase * 2.0 * std::f64::consts::PI).sin(),
        Waveform::Triangle => {
            if phase < 0.25 {
                4.0 * phase
            } else if phase < 0.75 {
                2.0 - 4.0 * phase
            } else {
                4.0 * phase - 4.0
            }
        }
    }
}

/// Attack-Decay-Sustain-Release amplitude envelope.
///
/// Times are in seconds; sustain is a level in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adsr {
    pub attack: f64,
    pub decay: f64,
    pub sustain: f64,
    pub release: f64,
}

impl Adsr {
    /// Amplitude at time `t` for a note held for `held` seconds.
    pub fn level(&self, t: f64, held: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        if t < self.attack {
            if self.attack <= 0.0 {
                return 1.0;
            }
            return t / self.attack;
        }
        if t < self.attack + self.decay {
            if self.decay <= 0.0 {
                return self.sustain;
            }
            let k = (t - self.attack) / self.decay;
            return 1.0 - k * (1.0 - self.sustain);
        }
        if t < held {
            return self.sustain;
        }
        if t < held + self.release {
            if self.release <= 0.0 {
                return 0.0;
            }
            let k = (t - held) / self.release;
            return self.sustain * (1.0 - k);
        }
        0.0
    }

    /// Seconds of sound for a note held `held` seconds, release tail included.
    pub fn total_duration(&self, held: f64) -> f64 {
        held + self.release
    }
}

/// A complete instrument voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstrumentPreset {
    pub waveform: Waveform,
    /// Relative amplitudes of the harmonic series, fundamental first.
    pub partials: &'static [f32],
    pub envelope: Adsr,
    /// Output gain applied after the envelope.
    pub gain: f32,
    /// Peak amplitude of the seeded noise transient at the attack.
    pub noise: f32,
    /// Exponential decay rate of the noise transient, per second.
    pub noise_decay: f32,
}

/// The voice for each instrument.
///
/// The guzheng is a plucked zither: bright triangle harmonics, a sharp
/// attack with a noise transient, and a long decay. The dizi is a bamboo
/// flute: nearly pure sine, soft attack, a whisper of breath noise.
pub fn preset_for(instrument: Instrument) -> InstrumentPreset {
    match instrument {
        Instrument::Guzheng => InstrumentPreset {
            waveform: Waveform::Triangle,
            partials: &[1.0, 0.5, 0.3, 0.2],
            envelope: Adsr {
                attack: 0.02,
                decay: 1.2,
                sustain: 0.3,
                release: 1.8,
            },
            gain: 0.4,
            noise: 0.3,
            noise_decay: 40.0,
        },
        Instrument::Dizi => InstrumentPreset {
            waveform: Waveform::Sine,
            partials: &[1.0, 0.3, 0.2],
            envelope: Adsr {
                attack: 0.1,
                decay: 0.2,
                sustain: 0.4,
                release: 1.4,
            },
            gain: 0.32,
            noise: 0.03,
            noise_decay: 6.0,
        },
    }
}
