//! Shared test utilities for the mediaconv test suite.
//!
//! Provides synthetic fixture images, mock encoders that record what the
//! pipelines asked for, and a storage-directory check for leftover uploads.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let transcoder = MockTranscoder::new();
//! let output = convert_audio(request, &transcoder).unwrap();
//!
//! assert!(matches!(transcoder.operations()[0], TranscodeOp::ToFile { .. }));
//! assert!(leftover_uploads(tmp.path()).is_empty());
//! ```

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use image::{DynamicImage, Rgb, RgbImage};

use crate::encoder::{EncoderError, RasterEncoder, Transcoder};
use crate::format::ImageFormat;
use crate::imaging::RasterSettings;
use crate::quality::PngCompression;

// =========================================================================
// Fixture images
// =========================================================================

/// RGB gradient so resizes and encoders have real detail to work with.
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            ((x + y) % 256) as u8,
        ])
    });
    DynamicImage::ImageRgb8(img)
}

/// Encoded bytes of a gradient fixture, ready to stand in for an upload.
pub fn test_image_bytes(width: u32, height: u32, format: image::ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    gradient_image(width, height)
        .write_to(&mut buf, format)
        .unwrap();
    buf.into_inner()
}

pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, test_image_bytes(width, height, image::ImageFormat::Jpeg)).unwrap();
}

/// Gradient JPEG carrying an EXIF Orientation tag.
///
/// An APP1 segment holding a one-entry big-endian TIFF IFD is spliced in
/// right after the SOI marker.
pub fn oriented_jpeg_bytes(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let jpeg = test_image_bytes(width, height, image::ImageFormat::Jpeg);
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\0\x2A");
    tiff.extend_from_slice(&8u32.to_be_bytes()); // first IFD
    tiff.extend_from_slice(&1u16.to_be_bytes()); // entry count
    tiff.extend_from_slice(&0x0112u16.to_be_bytes()); // Orientation
    tiff.extend_from_slice(&3u16.to_be_bytes()); // SHORT
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]);
    tiff.extend_from_slice(&0u32.to_be_bytes()); // no next IFD

    let mut app1 = vec![0xFF, 0xE1];
    app1.extend_from_slice(&((2 + 6 + tiff.len()) as u16).to_be_bytes());
    app1.extend_from_slice(b"Exif\0\0");
    app1.extend_from_slice(&tiff);

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&app1);
    out.extend_from_slice(&jpeg[2..]);
    out
}

// =========================================================================
// Storage checks
// =========================================================================

/// Temporary upload copies still present in `dir`.
pub fn leftover_uploads(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("original_"))
        })
        .collect()
}

// =========================================================================
// Mock encoders
// =========================================================================

/// What a [`MockRasterEncoder`] was asked to encode.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeCall {
    pub format: ImageFormat,
    pub quality: u8,
    pub compression: PngCompression,
    pub dimensions: (u32, u32),
}

/// Raster encoder that records calls and returns placeholder bytes.
/// Uses Mutex so it stays Sync like the production encoders.
#[derive(Default)]
pub struct MockRasterEncoder {
    calls: Mutex<Vec<EncodeCall>>,
    rasters: Mutex<Vec<DynamicImage>>,
    fail: bool,
}

impl MockRasterEncoder {
    pub const OUTPUT: &'static [u8] = b"mock raster";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<EncodeCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The rasters handed over for encoding, in call order.
    pub fn rasters(&self) -> Vec<DynamicImage> {
        self.rasters.lock().unwrap().clone()
    }
}

impl RasterEncoder for MockRasterEncoder {
    fn encode(
        &self,
        raster: &DynamicImage,
        settings: &RasterSettings,
    ) -> Result<Vec<u8>, EncoderError> {
        self.calls.lock().unwrap().push(EncodeCall {
            format: settings.format,
            quality: settings.quality,
            compression: settings.compression,
            dimensions: (raster.width(), raster.height()),
        });
        self.rasters.lock().unwrap().push(raster.clone());
        if self.fail {
            return Err(EncoderError::EmptyOutput {
                program: "mock-raster".to_string(),
            });
        }
        Ok(Self::OUTPUT.to_vec())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TranscodeOp {
    ToFile {
        input: PathBuf,
        args: Vec<String>,
        output: PathBuf,
    },
    ToStdout {
        input: PathBuf,
        args: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum Behavior {
    #[default]
    Produce,
    /// Report success without producing anything.
    Silent,
    Fail,
}

/// Transcoder that records operations and fakes their output.
#[derive(Default)]
pub struct MockTranscoder {
    operations: Mutex<Vec<TranscodeOp>>,
    behavior: Behavior,
}

impl MockTranscoder {
    pub const OUTPUT: &'static [u8] = b"mock media";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_output() -> Self {
        Self {
            behavior: Behavior::Silent,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            behavior: Behavior::Fail,
            ..Self::default()
        }
    }

    pub fn operations(&self) -> Vec<TranscodeOp> {
        self.operations.lock().unwrap().clone()
    }

    fn check_input(input: &Path) -> Result<(), EncoderError> {
        // The pipeline must hand over a persisted copy, not a dangling path.
        if input.is_file() {
            Ok(())
        } else {
            Err(EncoderError::MissingOutput {
                path: input.to_path_buf(),
            })
        }
    }

    fn failure() -> EncoderError {
        EncoderError::EmptyOutput {
            program: "mock-ffmpeg".to_string(),
        }
    }
}

impl Transcoder for MockTranscoder {
    fn transcode_to_file(
        &self,
        input: &Path,
        args: &[String],
        output: &Path,
    ) -> Result<(), EncoderError> {
        self.operations.lock().unwrap().push(TranscodeOp::ToFile {
            input: input.to_path_buf(),
            args: args.to_vec(),
            output: output.to_path_buf(),
        });
        Self::check_input(input)?;
        match self.behavior {
            Behavior::Produce => std::fs::write(output, Self::OUTPUT)?,
            Behavior::Silent => {}
            Behavior::Fail => return Err(Self::failure()),
        }
        Ok(())
    }

    fn transcode_to_stdout(&self, input: &Path, args: &[String]) -> Result<Vec<u8>, EncoderError> {
        self.operations.lock().unwrap().push(TranscodeOp::ToStdout {
            input: input.to_path_buf(),
            args: args.to_vec(),
        });
        Self::check_input(input)?;
        match self.behavior {
            Behavior::Produce => Ok(Self::OUTPUT.to_vec()),
            Behavior::Silent => Ok(Vec::new()),
            Behavior::Fail => Err(Self::failure()),
        }
    }
}
