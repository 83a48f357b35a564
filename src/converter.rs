//! One-stop facade over the pipelines.
//!
//! A [`Converter`] owns the encoders and the configured defaults, so callers
//! only hand it requests:
//!
//! ```no_run
//! use mediaconv::{AudioRequest, Converter, ConverterConfig};
//!
//! let converter = Converter::from_config(&ConverterConfig::default())?;
//! let output = converter.audio(AudioRequest {
//!     file_name: "talk.wav".into(),
//!     source: std::fs::File::open("talk.wav")?,
//!     bitrate_kbps: 128,
//!     format: "mp3".into(),
//!     dir: "media".into(),
//! })?;
//! println!("{}", output.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::config::{ConfigError, ConverterConfig};
use crate::encoder::{DefaultRasterEncoder, FfmpegTranscoder, RasterEncoder, Transcoder};
use crate::error::Result;
use crate::format::ImageFormat;
use crate::pipeline::{
    AudioRequest, ImageRequest, LogoRequest, VideoRequest, VideoSettings, convert_audio,
    convert_image, convert_logo, convert_video,
};
use crate::storage::{DeleteRequest, delete_artifact};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

/// Converter wired to a raster encoder and a transcoder.
#[derive(Debug, Clone)]
pub struct Converter<E = DefaultRasterEncoder, T = FfmpegTranscoder> {
    raster: E,
    transcoder: T,
    video: VideoSettings,
    logo_format: ImageFormat,
}

impl Converter {
    /// Production converter built from configuration.
    pub fn from_config(config: &ConverterConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            raster: DefaultRasterEncoder::new(&config.encoders.cwebp),
            transcoder: FfmpegTranscoder::new(
                &config.encoders.ffmpeg,
                &config.encoders.ffmpeg_log_level,
            ),
            video: config.video.settings(),
            logo_format: config.logo.format()?,
        })
    }
}

impl<E: RasterEncoder, T: Transcoder> Converter<E, T> {
    /// Converter with explicit encoders and stock defaults.
    pub fn with_encoders(raster: E, transcoder: T) -> Self {
        Self {
            raster,
            transcoder,
            video: VideoSettings::default(),
            logo_format: ImageFormat::WebP,
        }
    }

    pub fn raster_encoder(&self) -> &E {
        &self.raster
    }

    pub fn transcoder(&self) -> &T {
        &self.transcoder
    }

    pub fn image<R: Read>(&self, request: ImageRequest<R>) -> Result<PathBuf> {
        convert_image(request, &self.raster)
    }

    pub fn logo<R: Read>(&self, request: LogoRequest<R>) -> Result<PathBuf> {
        convert_logo(request, self.logo_format, &self.raster)
    }

    pub fn video<R: Read>(&self, request: VideoRequest<R>) -> Result<PathBuf> {
        convert_video(request, &self.video, &self.transcoder)
    }

    pub fn audio<R: Read>(&self, request: AudioRequest<R>) -> Result<PathBuf> {
        convert_audio(request, &self.transcoder)
    }

    pub fn delete(&self, request: &DeleteRequest) -> Result<PathBuf> {
        let path = delete_artifact(request)?;
        info!(path = %path.display(), "artifact deleted");
        Ok(path)
    }
}
