//! Shared musical settings — tempo, meter, quantization grid, piece length.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Meter: beats per measure over the note value that carries one beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub numerator: u8,
    pub denominator: u8,
}

impl TimeSignature {
    pub const COMMON: TimeSignature = TimeSignature {
        numerator: 4,
        denominator: 4,
    };
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Failure to parse a time signature or quantize unit from text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseSettingError {
    input: String,
}

impl ParseSettingError {
    fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

impl fmt::Display for ParseSettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid setting value: {:?}", self.input)
    }
}

impl std::error::Error for ParseSettingError {}

impl FromStr for TimeSignature {
    type Err = ParseSettingError;

    /// Parse `"3/4"` style text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (num, den) = s.split_once('/').ok_or_else(|| ParseSettingError::new(s))?;
        let numerator: u8 = num.trim().parse().map_err(|_| ParseSettingError::new(s))?;
        let denominator: u8 = den.trim().parse().map_err(|_| ParseSettingError::new(s))?;
        if numerator == 0 || denominator == 0 {
            return Err(ParseSettingError::new(s));
        }
        Ok(TimeSignature {
            numerator,
            denominator,
        })
    }
}

/// The smallest musical subdivision the grid snaps to, named by its
/// denominator: 8 means eighth notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum QuantizeUnit {
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
}

impl QuantizeUnit {
    /// The subdivision denominator (4, 8, 16, 32).
    pub fn denominator(self) -> u32 {
        match self {
            QuantizeUnit::Quarter => 4,
            QuantizeUnit::Eighth => 8,
            QuantizeUnit::Sixteenth => 16,
            QuantizeUnit::ThirtySecond => 32,
        }
    }

    /// Number of grid slots per beat.
    pub fn slots_per_beat(self) -> u32 {
        self.denominator() / 4
    }
}

impl TryFrom<u32> for QuantizeUnit {
    type Error = ParseSettingError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(QuantizeUnit::Quarter),
            8 => Ok(QuantizeUnit::Eighth),
            16 => Ok(QuantizeUnit::Sixteenth),
            32 => Ok(QuantizeUnit::ThirtySecond),
            other => Err(ParseSettingError::new(other.to_string())),
        }
    }
}

impl From<QuantizeUnit> for u32 {
    fn from(unit: QuantizeUnit) -> u32 {
        unit.denominator()
    }
}

impl fmt::Display for QuantizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1/{}", self.denominator())
    }
}

impl FromStr for QuantizeUnit {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u32 = s.trim().parse().map_err(|_| ParseSettingError::new(s))?;
        QuantizeUnit::try_from(n)
    }
}

/// Process-wide music settings shared by every track.
///
/// Mutating these recomputes derived geometry (canvas width, grid) but never
/// re-quantizes stored notes; existing events keep their times until edited.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MusicSettings {
    #[serde(default = "MusicSettings::default_bpm")]
    pub bpm: f64,
    #[serde(default = "MusicSettings::default_time_signature")]
    pub time_signature: TimeSignature,
    #[serde(default = "MusicSettings::default_quantize")]
    pub quantize: QuantizeUnit,
    #[serde(default = "MusicSettings::default_measure_count")]
    pub measure_count: u32,
}

impl MusicSettings {
    fn default_bpm() -> f64 {
        120.0
    }

    fn default_time_signature() -> TimeSignature {
        TimeSignature::COMMON
    }

    fn default_quantize() -> QuantizeUnit {
        QuantizeUnit::Eighth
    }

    fn default_measure_count() -> u32 {
        4
    }

    /// Seconds per beat.
    pub fn beat_duration(&self) -> f64 {
        60.0 / self.bpm
    }

    /// Seconds per measure.
    pub fn measure_duration(&self) -> f64 {
        self.beat_duration() * self.time_signature.numerator as f64
    }

    /// Seconds for the whole visible piece.
    pub fn total_duration(&self) -> f64 {
        self.measure_duration() * self.measure_count as f64
    }

    /// The shortest note duration a conversion may emit.
    pub fn sixteenth_duration(&self) -> f64 {
        self.beat_duration() / 4.0
    }

    /// Seconds per grid slot at the current quantize unit.
    pub fn slot_duration(&self) -> f64 {
        self.beat_duration() * 4.0 / self.quantize.denominator() as f64
    }

    /// Number of grid slots across the whole piece.
    pub fn slot_count(&self) -> usize {
        (self.measure_count * self.time_signature.numerator as u32 * self.quantize.slots_per_beat())
            as usize
    }
}

impl Default for MusicSettings {
    fn default() -> Self {
        Self {
            bpm: Self::default_bpm(),
            time_signature: Self::default_time_signature(),
            quantize: Self::default_quantize(),
            measure_count: Self::default_measure_count(),
        }
    }
}
