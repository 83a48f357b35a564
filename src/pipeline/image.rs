//! Image pipeline: fit an upload onto a fixed canvas.
//!
//! ```text
//! upload → decode (EXIF-oriented) → fit-or-stretch → background → overlay
//!        → sharpen → contrast → encode → processed_<stem>.<ext>
//! ```
//!
//! Sharpening and the contrast boost are fixed and always applied.

use super::{base_name, require_dir};
use crate::encoder::RasterEncoder;
use crate::error::{ConvertError, Result};
use crate::format::{ImageFormat, MediaKind};
use crate::imaging::geometry::MAX_DIMENSION;
use crate::imaging::operations::{adjust, decode_oriented, fit_to_canvas, sharpen};
use crate::imaging::{Adjustments, RasterSettings, Sharpening};
use crate::quality::QualityLevel;
use crate::storage::{TemporaryArtifact, ensure_dir, output_path, verify_output, write_output};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

/// One image conversion.
#[derive(Debug)]
pub struct ImageRequest<R> {
    pub file_name: String,
    pub source: R,
    pub width: u32,
    pub height: u32,
    /// Target format: `png`, `jpg`/`jpeg` or `webp`.
    pub format: String,
    /// Aspect-ratio deviation (0–100 %) up to which the source is stretched.
    pub stretch_threshold: f64,
    /// Quality tier, 1–5.
    pub quality: u8,
    /// Transparent background instead of a blurred copy of the source.
    pub transparent_background: bool,
    pub dir: PathBuf,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ImagePlan {
    pub file_name: String,
    pub canvas: (u32, u32),
    pub stretch_threshold: f64,
    pub settings: RasterSettings,
}

fn validate_dimension(name: &str, value: u32) -> Result<()> {
    if value == 0 || value > MAX_DIMENSION {
        return Err(ConvertError::validation(format!(
            "{name} must be between 1 and {MAX_DIMENSION}, got {value}"
        )));
    }
    Ok(())
}

impl<R> ImageRequest<R> {
    pub(crate) fn validate(&self) -> Result<ImagePlan> {
        validate_dimension("width", self.width)?;
        validate_dimension("height", self.height)?;
        if !(0.0..=100.0).contains(&self.stretch_threshold) {
            return Err(ConvertError::validation(format!(
                "stretch threshold must be between 0 and 100, got {}",
                self.stretch_threshold
            )));
        }
        let level = QualityLevel::new(self.quality)?;
        let format = ImageFormat::parse(&self.format)
            .ok_or_else(|| ConvertError::unsupported(MediaKind::Image, &self.format))?;
        require_dir(&self.dir)?;
        let file_name = base_name(&self.file_name)?;

        Ok(ImagePlan {
            file_name,
            canvas: (self.width, self.height),
            stretch_threshold: self.stretch_threshold,
            settings: RasterSettings::for_level(format, level),
        })
    }
}

fn render(
    source: &Path,
    plan: &ImagePlan,
    transparent: bool,
    encoder: &impl RasterEncoder,
) -> Result<Vec<u8>> {
    let src = decode_oriented(source)?;
    let composed = fit_to_canvas(&src, plan.canvas, plan.stretch_threshold, transparent);
    let finished = adjust(&sharpen(&composed, Sharpening::light()), Adjustments::image());
    Ok(encoder.encode(&finished, &plan.settings)?)
}

/// Convert an uploaded image and return the path of the processed file.
pub fn convert_image<R: Read>(
    mut request: ImageRequest<R>,
    encoder: &impl RasterEncoder,
) -> Result<PathBuf> {
    let plan = request.validate()?;
    ensure_dir(&request.dir)?;

    let upload = TemporaryArtifact::persist(&request.dir, &plan.file_name, &mut request.source)?;
    let bytes = render(upload.path(), &plan, request.transparent_background, encoder)?;

    let output = output_path(
        &request.dir,
        &plan.file_name,
        plan.settings.format.extension(),
        true,
    );
    write_output(&output, &bytes)?;
    verify_output(&output)?;
    drop(upload);

    info!(
        kind = %MediaKind::Image,
        output = %output.display(),
        width = plan.canvas.0,
        height = plan.canvas.1,
        bytes = bytes.len(),
        "conversion complete"
    );
    Ok(output)
}
