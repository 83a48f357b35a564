//! Video pipeline: scale into a W×H frame with the transcoder.
//!
//! Two output paths:
//!
//! - **MP4** (primary): letterbox into W×H with x264; the transcoder writes
//!   the destination file itself.
//! - **WebM** (alternate): plain scale with libvpx/libvorbis; the container
//!   is read from the transcoder's stdout and written here.

use super::{base_name, require_dir};
use crate::encoder::Transcoder;
use crate::error::{ConvertError, Result};
use crate::format::{MediaKind, VIDEO_EXTENSIONS, VideoFormat, extension_of};
use crate::imaging::geometry::MAX_DIMENSION;
use crate::quality::{QualityLevel, h264_params, vp8_params};
use crate::storage::{TemporaryArtifact, ensure_dir, output_path, verify_output, write_output};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug)]
pub struct VideoRequest<R> {
    pub file_name: String,
    pub source: R,
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub quality: u8,
    pub dir: PathBuf,
}

/// Rate-control settings shared by every MP4 conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoSettings {
    pub bufsize: String,
    pub bitrate: String,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            bufsize: "2M".to_string(),
            bitrate: "1M".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct VideoPlan {
    file_name: String,
    frame: (u32, u32),
    format: VideoFormat,
    level: QualityLevel,
}

impl<R> VideoRequest<R> {
    fn validate(&self) -> Result<VideoPlan> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 || value > MAX_DIMENSION {
                return Err(ConvertError::validation(format!(
                    "{name} must be between 1 and {MAX_DIMENSION}, got {value}"
                )));
            }
        }
        let level = QualityLevel::new(self.quality)?;
        let format = VideoFormat::parse(&self.format)
            .ok_or_else(|| ConvertError::unsupported(MediaKind::Video, &self.format))?;
        require_dir(&self.dir)?;
        let file_name = base_name(&self.file_name)?;

        let source_ext = extension_of(&file_name);
        if !VIDEO_EXTENSIONS.contains(&source_ext.as_str()) {
            return Err(ConvertError::unsupported(MediaKind::Video, source_ext));
        }

        Ok(VideoPlan {
            file_name,
            frame: (self.width, self.height),
            format,
            level,
        })
    }
}

/// Letterbox into W×H: scale to fit, then pad to center.
fn h264_args(frame: (u32, u32), level: QualityLevel, settings: &VideoSettings) -> Vec<String> {
    let (w, h) = frame;
    let params = h264_params(level);
    let filter = format!(
        "scale=iw*min({w}/iw\\,{h}/ih):ih*min({w}/iw\\,{h}/ih),pad={w}:{h}:({w}-iw)/2:({h}-ih)/2"
    );
    vec![
        "-vf".into(),
        filter,
        "-c:v".into(),
        "libx264".into(),
        "-crf".into(),
        params.crf.to_string(),
        "-preset".into(),
        params.preset.into(),
        "-maxrate".into(),
        params.maxrate.into(),
        "-bufsize".into(),
        settings.bufsize.clone(),
        "-b:v".into(),
        settings.bitrate.clone(),
    ]
}

fn webm_args(frame: (u32, u32), level: QualityLevel) -> Vec<String> {
    let params = vp8_params(level);
    vec![
        "-vf".into(),
        format!("scale={}:{}", frame.0, frame.1),
        "-c:v".into(),
        "libvpx".into(),
        "-crf".into(),
        params.crf.to_string(),
        "-b:v".into(),
        params.bitrate.into(),
        "-c:a".into(),
        "libvorbis".into(),
        "-f".into(),
        "webm".into(),
    ]
}

fn transcode(
    input: &Path,
    output: &Path,
    plan: &VideoPlan,
    settings: &VideoSettings,
    transcoder: &impl Transcoder,
) -> Result<()> {
    match plan.format {
        VideoFormat::Mp4 => {
            let args = h264_args(plan.frame, plan.level, settings);
            debug!(?args, "transcoding to mp4");
            transcoder.transcode_to_file(input, &args, output)?;
        }
        VideoFormat::WebM => {
            let args = webm_args(plan.frame, plan.level);
            debug!(?args, "transcoding to webm");
            let bytes = transcoder.transcode_to_stdout(input, &args)?;
            write_output(output, &bytes)?;
        }
    }
    Ok(())
}

/// Convert an uploaded video and return the path of the processed file.
pub fn convert_video<R: Read>(
    mut request: VideoRequest<R>,
    settings: &VideoSettings,
    transcoder: &impl Transcoder,
) -> Result<PathBuf> {
    let plan = request.validate()?;
    ensure_dir(&request.dir)?;

    let upload = TemporaryArtifact::persist(&request.dir, &plan.file_name, &mut request.source)?;
    let output = output_path(&request.dir, &plan.file_name, plan.format.extension(), true);
    transcode(upload.path(), &output, &plan, settings, transcoder)?;
    verify_output(&output)?;
    drop(upload);

    info!(
        kind = %MediaKind::Video,
        output = %output.display(),
        width = plan.frame.0,
        height = plan.frame.1,
        quality = plan.level.value(),
        "conversion complete"
    );
    Ok(output)
}
