//! Conversion pipelines, one per media kind.
//!
//! Every pipeline follows the same shape:
//!
//! ```text
//! validate → ensure dir → persist upload → derive parameters → encode → verify → return path
//! ```
//!
//! Validation happens before any filesystem work. The persisted upload is a
//! [`TemporaryArtifact`](crate::storage::TemporaryArtifact), so it is removed
//! on success and on every error path.

pub mod audio;
pub mod image;
pub mod logo;
pub mod video;

pub use self::audio::{AudioRequest, convert_audio};
pub use self::image::{ImageRequest, convert_image};
pub use self::logo::{LogoRequest, convert_logo};
pub use self::video::{VideoRequest, VideoSettings, convert_video};

use crate::error::{ConvertError, Result};
use std::path::Path;

/// Base name of an upload's file name; directory components are dropped.
pub(crate) fn base_name(file_name: &str) -> Result<String> {
    if file_name.trim().is_empty() {
        return Err(ConvertError::validation("file name is required"));
    }
    Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| ConvertError::validation(format!("invalid file name: {file_name}")))
}

pub(crate) fn require_dir(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Err(ConvertError::validation("storage directory is required"));
    }
    Ok(())
}
