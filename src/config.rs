//! Converter configuration module.
//!
//! Handles loading, validating, and merging `config.toml` files. A user file
//! is sparse: its values are merged on top of the stock defaults, so it only
//! needs the keys it wants to override.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [encoders]
//! ffmpeg = "ffmpeg"           # Program name or path
//! cwebp = "cwebp"             # Program name or path
//! ffmpeg_log_level = "error"  # Passed to ffmpeg -loglevel
//!
//! [video]
//! bufsize = "2M"              # x264 rate-control buffer
//! bitrate = "1M"              # x264 target bitrate
//!
//! [logo]
//! default_format = "webp"     # Used when a logo request names no format
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::format::ImageFormat;
use crate::pipeline::VideoSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Levels ffmpeg accepts for `-loglevel`.
const FFMPEG_LOG_LEVELS: &[&str] = &[
    "quiet", "panic", "fatal", "error", "warning", "info", "verbose", "debug", "trace",
];

/// Converter configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// External encoder programs.
    pub encoders: EncodersConfig,
    /// MP4 rate control.
    pub video: VideoConfig,
    /// Logo defaults.
    pub logo: LogoConfig,
}

impl ConverterConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.encoders.ffmpeg.trim().is_empty() {
            return Err(ConfigError::Validation(
                "encoders.ffmpeg must not be empty".into(),
            ));
        }
        if self.encoders.cwebp.trim().is_empty() {
            return Err(ConfigError::Validation(
                "encoders.cwebp must not be empty".into(),
            ));
        }
        if !FFMPEG_LOG_LEVELS.contains(&self.encoders.ffmpeg_log_level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "encoders.ffmpeg_log_level must be one of {FFMPEG_LOG_LEVELS:?}, got {:?}",
                self.encoders.ffmpeg_log_level
            )));
        }
        for (key, value) in [
            ("video.bufsize", &self.video.bufsize),
            ("video.bitrate", &self.video.bitrate),
        ] {
            if !is_rate(value) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a number with an optional k/M/G suffix, got {value:?}"
                )));
            }
        }
        self.logo.format()?;
        Ok(())
    }
}

/// `500k`, `2M`, `1.5M`, `800000`.
fn is_rate(value: &str) -> bool {
    let digits = value.strip_suffix(['k', 'K', 'M', 'G']).unwrap_or(value);
    !digits.is_empty()
        && digits.parse::<f64>().is_ok_and(|n| n.is_finite() && n > 0.0)
}

/// External encoder programs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodersConfig {
    pub ffmpeg: String,
    pub cwebp: String,
    pub ffmpeg_log_level: String,
}

impl Default for EncodersConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            cwebp: "cwebp".to_string(),
            ffmpeg_log_level: "error".to_string(),
        }
    }
}

/// Rate control shared by every MP4 conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoConfig {
    pub bufsize: String,
    pub bitrate: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        let settings = VideoSettings::default();
        Self {
            bufsize: settings.bufsize,
            bitrate: settings.bitrate,
        }
    }
}

impl VideoConfig {
    pub fn settings(&self) -> VideoSettings {
        VideoSettings {
            bufsize: self.bufsize.clone(),
            bitrate: self.bitrate.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogoConfig {
    pub default_format: String,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            default_format: "webp".to_string(),
        }
    }
}

impl LogoConfig {
    /// The parsed default logo format.
    pub fn format(&self) -> Result<ImageFormat, ConfigError> {
        ImageFormat::parse(&self.default_format).ok_or_else(|| {
            ConfigError::Validation(format!(
                "logo.default_format must be png, jpg, jpeg or webp, got {:?}",
                self.default_format
            ))
        })
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ConverterConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ConverterConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ConverterConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load a config file, or the stock defaults when `path` is `None`.
///
/// An explicitly named file must exist.
pub fn load_config(path: Option<&Path>) -> Result<ConverterConfig, ConfigError> {
    let overlay = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Some(toml::from_str::<toml::Value>(&content)?)
        }
        None => None,
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# mediaconv Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# External encoders
# ---------------------------------------------------------------------------
[encoders]
# ffmpeg handles video and audio. Program name (looked up on PATH) or path.
ffmpeg = "ffmpeg"

# cwebp encodes WebP images and logos.
cwebp = "cwebp"

# Passed to ffmpeg -loglevel. One of: quiet, panic, fatal, error, warning,
# info, verbose, debug, trace.
ffmpeg_log_level = "error"

# ---------------------------------------------------------------------------
# Video (MP4 / x264)
# ---------------------------------------------------------------------------
[video]
# Rate-control buffer size.
bufsize = "2M"

# Target bitrate. The per-quality maxrate caps peaks above this.
bitrate = "1M"

# ---------------------------------------------------------------------------
# Logos
# ---------------------------------------------------------------------------
[logo]
# Output format when a logo request names none: png, jpg, jpeg or webp.
default_format = "webp"
"##
}
