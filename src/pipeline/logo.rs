//! Logo pipeline: clamp an upload into min/max bounds without cropping.
//!
//! Logos keep their aspect ratio and get no canvas. Downscaling goes through
//! a halfway size; upscaling is a single cubic pass. Encoding always uses the
//! high-fidelity [`RasterSettings::logo`] settings, and the output is written
//! without the `processed_` prefix.

use super::{base_name, require_dir};
use crate::encoder::RasterEncoder;
use crate::error::{ConvertError, Result};
use crate::format::{ImageFormat, MediaKind};
use crate::imaging::geometry::{Bounds, MAX_DIMENSION, clamp_to_bounds};
use crate::imaging::operations::{adjust, decode_oriented, resample_logo};
use crate::imaging::{Adjustments, RasterSettings};
use crate::storage::{TemporaryArtifact, ensure_dir, output_path, verify_output, write_output};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug)]
pub struct LogoRequest<R> {
    pub file_name: String,
    pub source: R,
    /// Target format; the configured default applies when `None` or blank.
    pub format: Option<String>,
    pub bounds: Bounds,
    pub dir: PathBuf,
}

impl<R> LogoRequest<R> {
    fn validate(&self, default_format: ImageFormat) -> Result<(String, ImageFormat)> {
        let b = &self.bounds;
        for (name, max) in [("max width", b.max_width), ("max height", b.max_height)] {
            if max == 0 || max > MAX_DIMENSION {
                return Err(ConvertError::validation(format!(
                    "{name} must be between 1 and {MAX_DIMENSION}, got {max}"
                )));
            }
        }
        if b.min_width > b.max_width || b.min_height > b.max_height {
            return Err(ConvertError::validation(format!(
                "minimum bounds {}x{} exceed maximum bounds {}x{}",
                b.min_width, b.min_height, b.max_width, b.max_height
            )));
        }
        let requested = self.format.as_deref().map(str::trim);
        let format = match requested.filter(|f| !f.is_empty()) {
            None => default_format,
            Some(requested) => ImageFormat::parse(requested)
                .ok_or_else(|| ConvertError::unsupported(MediaKind::Logo, requested))?,
        };
        require_dir(&self.dir)?;
        Ok((base_name(&self.file_name)?, format))
    }
}

/// Convert an uploaded logo and return the path of the written file.
pub fn convert_logo<R: Read>(
    mut request: LogoRequest<R>,
    default_format: ImageFormat,
    encoder: &impl RasterEncoder,
) -> Result<PathBuf> {
    let (file_name, format) = request.validate(default_format)?;
    ensure_dir(&request.dir)?;

    let upload = TemporaryArtifact::persist(&request.dir, &file_name, &mut request.source)?;
    let src = decode_oriented(upload.path())?;
    let source_dims = (src.width(), src.height());
    let target = clamp_to_bounds(source_dims, &request.bounds);

    let finished = adjust(&resample_logo(src, target), Adjustments::logo());
    let bytes = encoder.encode(&finished, &RasterSettings::logo(format))?;

    let output = output_path(&request.dir, &file_name, format.extension(), false);
    write_output(&output, &bytes)?;
    verify_output(&output)?;
    drop(upload);

    info!(
        kind = %MediaKind::Logo,
        output = %output.display(),
        source_width = source_dims.0,
        source_height = source_dims.1,
        width = target.0,
        height = target.1,
        "conversion complete"
    );
    Ok(output)
}
