//! Audio pipeline: re-encode to a target codec at a fixed bitrate.
//!
//! An `.mp4` upload is treated as an audio-extractable container and always
//! produces MP3. Video streams are dropped.

use super::{base_name, require_dir};
use crate::encoder::Transcoder;
use crate::error::{ConvertError, Result};
use crate::format::{
    AUDIO_SOURCE_EXTENSIONS, AudioFormat, MediaKind, extension_of, resolve_audio_target,
};
use crate::storage::{TemporaryArtifact, ensure_dir, output_path, verify_output};
use std::io::Read;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use tracing::{debug, info};

/// Accepted bitrates in kbps.
pub const BITRATE_RANGE: RangeInclusive<u32> = 64..=320;

#[derive(Debug)]
pub struct AudioRequest<R> {
    pub file_name: String,
    pub source: R,
    pub bitrate_kbps: u32,
    pub format: String,
    pub dir: PathBuf,
}

impl<R> AudioRequest<R> {
    fn validate(&self) -> Result<(String, AudioFormat)> {
        if !BITRATE_RANGE.contains(&self.bitrate_kbps) {
            return Err(ConvertError::validation(format!(
                "bitrate must be between {} and {} kbps, got {}",
                BITRATE_RANGE.start(),
                BITRATE_RANGE.end(),
                self.bitrate_kbps
            )));
        }
        let file_name = base_name(&self.file_name)?;
        require_dir(&self.dir)?;

        let source_ext = extension_of(&file_name);
        if !AUDIO_SOURCE_EXTENSIONS.contains(&source_ext.as_str()) {
            return Err(ConvertError::unsupported(MediaKind::Audio, source_ext));
        }
        let target = resolve_audio_target(&file_name, &self.format);
        let format = AudioFormat::parse(target)
            .ok_or_else(|| ConvertError::unsupported(MediaKind::Audio, target))?;
        Ok((file_name, format))
    }
}

fn audio_args(format: AudioFormat, bitrate_kbps: u32) -> Vec<String> {
    let mut args = vec![
        "-vn".to_string(),
        "-c:a".to_string(),
        format.codec().to_string(),
    ];
    if format.uses_bitrate() {
        args.push("-b:a".to_string());
        args.push(format!("{bitrate_kbps}k"));
    }
    args
}

/// Convert an uploaded audio file and return the path of the processed file.
pub fn convert_audio<R: Read>(
    mut request: AudioRequest<R>,
    transcoder: &impl Transcoder,
) -> Result<PathBuf> {
    let (file_name, format) = request.validate()?;
    ensure_dir(&request.dir)?;

    let upload = TemporaryArtifact::persist(&request.dir, &file_name, &mut request.source)?;
    let output = output_path(&request.dir, &file_name, format.extension(), true);
    let args = audio_args(format, request.bitrate_kbps);
    debug!(?args, "transcoding audio");
    transcoder.transcode_to_file(upload.path(), &args, &output)?;
    verify_output(&output)?;
    drop(upload);

    info!(
        kind = %MediaKind::Audio,
        output = %output.display(),
        codec = format.codec(),
        bitrate_kbps = request.bitrate_kbps,
        "conversion complete"
    );
    Ok(output)
}
