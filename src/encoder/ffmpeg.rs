//! FFmpeg-based transcoder.

use super::process::{diagnostics, program_name, run_captured};
use super::{EncoderError, Transcoder};
use std::path::{Path, PathBuf};

/// Production [`Transcoder`] spawning `ffmpeg`.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    program: PathBuf,
    log_level: String,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<PathBuf>, log_level: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            log_level: log_level.into(),
        }
    }

    /// Check that the `ffmpeg` binary can be resolved.
    pub fn validate(&self) -> Result<(), EncoderError> {
        which::which(&self.program)
            .map(|_| ())
            .map_err(|_| EncoderError::NotFound {
                program: program_name(&self.program),
            })
    }

    /// Full argument list: global flags, input, codec args, then `output`.
    fn build_args(&self, input: &Path, args: &[String], output: &str) -> Vec<String> {
        let mut full = vec![
            "-y".to_string(), // Overwrite output
            "-nostdin".to_string(),
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            self.log_level.clone(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
        ];
        full.extend(args.iter().cloned());
        full.push(output.to_string());
        full
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new("ffmpeg", "error")
    }
}

impl Transcoder for FfmpegTranscoder {
    fn transcode_to_file(
        &self,
        input: &Path,
        args: &[String],
        output: &Path,
    ) -> Result<(), EncoderError> {
        let full = self.build_args(input, args, &output.to_string_lossy());
        let result = run_captured(&self.program, &full)?;
        if !result.status.success() {
            return Err(EncoderError::Failed {
                program: program_name(&self.program),
                status: result.status,
                diagnostics: diagnostics(&result, true),
            });
        }
        Ok(())
    }

    fn transcode_to_stdout(&self, input: &Path, args: &[String]) -> Result<Vec<u8>, EncoderError> {
        let full = self.build_args(input, args, "-");
        let result = run_captured(&self.program, &full)?;
        if !result.status.success() {
            return Err(EncoderError::Failed {
                program: program_name(&self.program),
                status: result.status,
                diagnostics: diagnostics(&result, false),
            });
        }
        if result.stdout.is_empty() {
            return Err(EncoderError::EmptyOutput {
                program: program_name(&self.program),
            });
        }
        Ok(result.stdout)
    }
}
