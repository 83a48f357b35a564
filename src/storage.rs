//! Filesystem bookkeeping around a conversion.
//!
//! ## Naming
//!
//! ```text
//! <dir>/original_<file name>         temporary copy of the upload
//! <dir>/processed_<stem>.<ext>       image, video and audio outputs
//! <dir>/<stem>.<ext>                 logo outputs
//! ```
//!
//! The temporary copy is owned by a [`TemporaryArtifact`] and removed when it
//! drops, so every exit path of a pipeline cleans up.

use crate::encoder::EncoderError;
use crate::error::{ConvertError, Result};
use crate::format::stem_of;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const TEMP_PREFIX: &str = "original_";
const OUTPUT_PREFIX: &str = "processed_";

/// Create the storage directory if needed.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| ConvertError::storage(dir, e))
}

/// On-disk copy of an upload, deleted on drop.
#[derive(Debug)]
pub struct TemporaryArtifact {
    path: PathBuf,
}

impl TemporaryArtifact {
    /// Copy `source` into `dir`. A partially written copy is removed before
    /// the error is returned.
    pub fn persist(dir: &Path, file_name: &str, source: &mut impl Read) -> Result<Self> {
        let artifact = Self {
            path: dir.join(format!("{TEMP_PREFIX}{file_name}")),
        };
        let mut file =
            fs::File::create(&artifact.path).map_err(|e| ConvertError::storage(&artifact.path, e))?;
        io::copy(source, &mut file).map_err(|e| ConvertError::storage(&artifact.path, e))?;
        debug!(path = %artifact.path.display(), "persisted upload");
        Ok(artifact)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TemporaryArtifact {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed temporary upload"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove temporary upload"
            ),
        }
    }
}

/// Deterministic output path for `file_name` converted to `extension`.
pub fn output_path(dir: &Path, file_name: &str, extension: &str, prefixed: bool) -> PathBuf {
    let prefix = if prefixed { OUTPUT_PREFIX } else { "" };
    dir.join(format!("{prefix}{}.{extension}", stem_of(file_name)))
}

pub fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|e| ConvertError::storage(path, e))
}

/// An encoder call only counts as successful once its output exists and is
/// non-empty.
pub fn verify_output(path: &Path) -> Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(()),
        _ => Err(EncoderError::MissingOutput {
            path: path.to_path_buf(),
        }
        .into()),
    }
}

/// Remove a stored artifact.
#[derive(Debug, Clone, Default)]
pub struct DeleteRequest {
    pub dir: PathBuf,
    pub file_name: String,
    /// Explicit path to delete instead of `<dir>/<file_name>`.
    pub override_path: Option<PathBuf>,
}

pub fn delete_artifact(request: &DeleteRequest) -> Result<PathBuf> {
    let path = match &request.override_path {
        Some(path) => path.clone(),
        None => {
            if request.file_name.is_empty() {
                return Err(ConvertError::validation("file name is required"));
            }
            request.dir.join(&request.file_name)
        }
    };
    fs::remove_file(&path).map_err(|e| ConvertError::storage(&path, e))?;
    debug!(path = %path.display(), "deleted artifact");
    Ok(path)
}
