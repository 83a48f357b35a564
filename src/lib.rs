//! # mediaconv
//!
//! Normalizes uploaded media into storage-ready files. An upload (a file
//! name plus a byte stream) goes in; a file with predictable dimensions,
//! format and name comes out of the storage directory.
//!
//! # Architecture: One Pipeline per Media Kind
//!
//! ```text
//! Image   upload → exact W×H canvas (fit or stretch, blurred background)
//! Logo    upload → clamped into min/max bounds, aspect preserved
//! Video   upload → ffmpeg: letterboxed x264 (mp4) or scaled VP8 (webm)
//! Audio   upload → ffmpeg: re-encoded at a fixed bitrate
//! ```
//!
//! Every pipeline validates its request before touching the filesystem,
//! persists the upload as a temporary copy, encodes, verifies the output is
//! non-empty, and removes the copy on every exit path.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`format`] | Extension classification and typed target formats |
//! | [`quality`] | Quality levels 1–5 mapped to encoder parameters |
//! | [`imaging`] | Canvas geometry and pixel operations on the `image` crate |
//! | [`encoder`] | `RasterEncoder` / `Transcoder` capabilities and their cwebp / ffmpeg adapters |
//! | [`storage`] | Temporary copies, output naming, output verification, delete |
//! | [`pipeline`] | The four conversion pipelines |
//! | [`converter`] | Facade owning encoders and configured defaults |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Encoders Behind Traits
//!
//! Pipelines never spawn processes themselves. They build structured argument
//! lists and hand them to a [`Transcoder`], or hand a finished raster to a
//! [`RasterEncoder`]. Tests swap in recording mocks; a deployment could swap in
//! an in-process codec without touching pipeline code.
//!
//! ## Argument Lists, Not Shell Strings
//!
//! External programs are spawned with an argument vector. Upload names are
//! never interpolated into a shell command line.
//!
//! ## Whole Pixels
//!
//! Geometry uses floating-point ratios and truncates to whole pixels. Every
//! computed dimension is clamped to `1..=8192`.

pub mod config;
pub mod converter;
pub mod encoder;
pub mod error;
pub mod format;
pub mod imaging;
pub mod output;
pub mod pipeline;
pub mod quality;
pub mod storage;

pub use config::{ConfigError, ConverterConfig, load_config};
pub use converter::Converter;
pub use encoder::{DefaultRasterEncoder, EncoderError, FfmpegTranscoder, RasterEncoder, Transcoder};
pub use error::{ConvertError, Result};
pub use format::{FormatCategory, classify};
pub use pipeline::{AudioRequest, ImageRequest, LogoRequest, VideoRequest, VideoSettings};
pub use storage::DeleteRequest;

#[cfg(test)]
pub(crate) mod test_helpers;
