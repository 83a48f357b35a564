//! Error taxonomy shared by every pipeline.
//!
//! | Variant | Raised when |
//! |---|---|
//! | [`ConvertError::Validation`] | a request parameter is malformed or out of range |
//! | [`ConvertError::UnsupportedFormat`] | source or target format is outside the media kind's set |
//! | [`ConvertError::Storage`] | the storage directory, temp copy or output file cannot be written |
//! | [`ConvertError::Encoding`] | an encoder failed, or "succeeded" without producing output |
//!
//! Validation and unsupported-format errors are always returned before any
//! file is written or any process is spawned. Nothing is retried.

use crate::encoder::EncoderError;
use crate::format::MediaKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("Unsupported {kind} format: {format}")]
    UnsupportedFormat { kind: MediaKind, format: String },
    #[error("Storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Encoding failed: {0}")]
    Encoding(#[from] EncoderError),
}

impl ConvertError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    pub fn unsupported(kind: MediaKind, format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            kind,
            format: format.into(),
        }
    }

    pub fn storage(path: &Path, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True for errors raised before any I/O happened.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::UnsupportedFormat { .. })
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
