//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the pipelines (which decide what to produce) and the
//! [`RasterEncoder`](crate::encoder::RasterEncoder) (which produces bytes).
//!
//! ## Types
//!
//! - [`Sharpening`]: Unsharp-mask parameters applied after compositing.
//! - [`Adjustments`]: Fixed tonal boosts (contrast, brightness) per pipeline.
//! - [`RasterSettings`]: Output format plus the quality knobs the encoder reads.

use crate::format::ImageFormat;
use crate::quality::{PngCompression, QualityLevel, image_quality, png_compression};

/// Gaussian sigma used for the blurred background behind letterboxed images.
pub const BACKGROUND_BLUR_SIGMA: f32 = 10.0;

/// Sharpening parameters for unsharp mask.
///
/// - `sigma`: Standard deviation of the Gaussian blur (higher = more sharpening)
/// - `threshold`: Minimum brightness difference to sharpen (0 = sharpen all pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sharpening {
    pub sigma: f32,
    pub threshold: i32,
}

impl Sharpening {
    /// Light sharpening applied to every processed image and downscaled logo.
    pub fn light() -> Self {
        Self {
            sigma: 0.5,
            threshold: 0,
        }
    }
}

/// Tonal adjustments applied after resampling.
///
/// Both values are percentages; brightness is converted to an 8-bit offset
/// when applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustments {
    pub contrast: f32,
    pub brightness: f32,
}

impl Adjustments {
    /// Processed images: small contrast boost only.
    pub fn image() -> Self {
        Self {
            contrast: 2.0,
            brightness: 0.0,
        }
    }

    /// Logos: contrast and brightness boost.
    pub fn logo() -> Self {
        Self {
            contrast: 2.0,
            brightness: 2.0,
        }
    }

    /// Brightness as the per-channel offset `image` expects.
    pub fn brightness_offset(self) -> i32 {
        (255.0 * self.brightness / 100.0).round() as i32
    }
}

/// Everything a raster encoder needs to produce output bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterSettings {
    pub format: ImageFormat,
    /// JPEG/WebP quality, 0–100.
    pub quality: u8,
    pub compression: PngCompression,
}

impl RasterSettings {
    /// Settings derived from a request's quality tier.
    pub fn for_level(format: ImageFormat, level: QualityLevel) -> Self {
        Self {
            format,
            quality: image_quality(level),
            compression: png_compression(level),
        }
    }

    /// Fixed high-fidelity settings used for logos.
    pub fn logo(format: ImageFormat) -> Self {
        Self {
            format,
            quality: 95,
            compression: PngCompression::Best,
        }
    }
}
