//! Quality tier mapping.
//!
//! Requests carry an abstract level from 1 (smallest files) to 5 (best
//! quality). [`QualityLevel::new`] rejects anything else, so every lookup
//! below only sees 1–5; the fallback arms are a safety net, not a code path
//! the pipelines rely on.

use crate::error::ConvertError;

/// Validated quality level (1–5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityLevel(u8);

impl QualityLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Result<Self, ConvertError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(ConvertError::validation(format!(
                "quality must be between {} and {}, got {level}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for QualityLevel {
    fn default() -> Self {
        Self(3)
    }
}

/// JPEG/WebP quality (0–100) for a level.
pub fn image_quality(level: QualityLevel) -> u8 {
    match level.0 {
        1 => 30,
        2 => 50,
        3 => 70,
        4 => 85,
        5 => 95,
        _ => 80,
    }
}

/// Lossless PNG compression effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngCompression {
    Fast,
    Default,
    Best,
}

pub fn png_compression(level: QualityLevel) -> PngCompression {
    match level.0 {
        1 => PngCompression::Fast,
        2 | 3 => PngCompression::Default,
        4 | 5 => PngCompression::Best,
        _ => PngCompression::Default,
    }
}

/// x264 parameters for the primary (MP4) video path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct H264Params {
    pub crf: u8,
    pub preset: &'static str,
    pub maxrate: &'static str,
}

pub fn h264_params(level: QualityLevel) -> H264Params {
    let (crf, preset, maxrate) = match level.0 {
        1 => (28, "slow", "1M"),
        3 => (23, "medium", "2M"),
        4 => (20, "fast", "2.5M"),
        5 => (18, "fast", "3M"),
        _ => (26, "medium", "1.5M"),
    };
    H264Params {
        crf,
        preset,
        maxrate,
    }
}

/// libvpx parameters for the WebM path. CRF falls as the level rises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vp8Params {
    pub crf: u8,
    pub bitrate: &'static str,
}

pub fn vp8_params(level: QualityLevel) -> Vp8Params {
    let (crf, bitrate) = match level.0 {
        1 => (32, "500k"),
        3 => (24, "1.5M"),
        4 => (20, "2M"),
        5 => (16, "2.5M"),
        _ => (28, "1M"),
    };
    Vp8Params { crf, bitrate }
}
