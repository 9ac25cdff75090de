//! Musical time — shared settings and grid quantization.

pub mod quantize;
pub mod settings;

pub use quantize::quantize_time;
pub use settings::{MusicSettings, ParseSettingError, QuantizeUnit, TimeSignature};
