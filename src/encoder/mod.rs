//! External encoder capabilities.
//!
//! Pipelines depend on two traits, never on how bytes are produced:
//!
//! - [`RasterEncoder`]: in-memory raster → encoded bytes. The production
//!   [`DefaultRasterEncoder`] writes PNG/JPEG in process and pipes WebP
//!   through `cwebp`.
//! - [`Transcoder`]: media file → media file (or stdout bytes). The
//!   production [`FfmpegTranscoder`] spawns `ffmpeg`.
//!
//! Either can be swapped for an in-process codec or a test double.

mod ffmpeg;
mod process;
mod raster;

pub use ffmpeg::FfmpegTranscoder;
pub use raster::DefaultRasterEncoder;

use crate::imaging::RasterSettings;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncoderError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {diagnostics}")]
    Failed {
        program: String,
        status: ExitStatus,
        diagnostics: String,
    },
    #[error("{program} produced no output")]
    EmptyOutput { program: String },
    #[error("output file missing or empty: {}", path.display())]
    MissingOutput { path: PathBuf },
    #[error("{program} not found on PATH")]
    NotFound { program: String },
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Encodes a decoded raster into the bytes of a target image format.
pub trait RasterEncoder {
    fn encode(
        &self,
        raster: &DynamicImage,
        settings: &RasterSettings,
    ) -> Result<Vec<u8>, EncoderError>;
}

/// Transcodes a media file with a structured argument list.
///
/// `args` are the codec/filter arguments only; the implementation supplies
/// the input and output plumbing.
pub trait Transcoder {
    /// Write the result straight to `output`.
    fn transcode_to_file(
        &self,
        input: &Path,
        args: &[String],
        output: &Path,
    ) -> Result<(), EncoderError>;

    /// Return the result from the encoder's standard output.
    fn transcode_to_stdout(&self, input: &Path, args: &[String]) -> Result<Vec<u8>, EncoderError>;
}
