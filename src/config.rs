//! Application configuration loaded from `~/.melisma/config.yaml`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::score::MusicSettings;
use crate::track::Instrument;

/// Startup configuration. Every field has a default, so a partial (or
/// missing) config file is fine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AppConfig {
    /// Initial music settings; mutable at runtime through commands.
    #[serde(default)]
    pub music: MusicSettings,
    /// Octaves spanned by the vertical pitch axis.
    #[serde(default = "AppConfig::default_octave_range")]
    pub octave_range: u32,
    /// Fixed canvas height in pixels.
    #[serde(default = "AppConfig::default_canvas_height")]
    pub canvas_height: f32,
    /// Width of the visible viewport in pixels.
    #[serde(default = "AppConfig::default_view_width")]
    pub view_width: f32,
    /// Instrument assigned to the first track and to new strokes.
    #[serde(default = "AppConfig::default_instrument")]
    pub default_instrument: Instrument,
}

impl AppConfig {
    fn default_octave_range() -> u32 {
        3
    }

    fn default_canvas_height() -> f32 {
        400.0
    }

    fn default_view_width() -> f32 {
        800.0
    }

    fn default_instrument() -> Instrument {
        Instrument::Guzheng
    }

    /// Load config from the standard path (`~/.melisma/config.yaml`).
    /// Returns `None` if the file doesn't exist (graceful fallback).
    pub fn load() -> Option<Self> {
        let home = dirs::home_dir()?;
        Self::load_from(home.join(".melisma").join("config.yaml"))
    }

    /// Load config from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        serde_yaml::from_str(&content).ok()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            music: MusicSettings::default(),
            octave_range: Self::default_octave_range(),
            canvas_height: Self::default_canvas_height(),
            view_width: Self::default_view_width(),
            default_instrument: Self::default_instrument(),
        }
    }
}
