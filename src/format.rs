//! Format classification and typed target formats.
//!
//! The extension tables are process-wide constants. [`classify`] never fails:
//! an unrecognized extension is [`FormatCategory::Unknown`] and the caller
//! decides whether that is fatal.

use std::fmt;
use std::path::Path;

pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpeg", "jpg", "webp", "jfif"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm"];
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "m4a", "opus", "wav"];
pub const STRUCTURED_DATA_EXTENSIONS: &[&str] = &["json"];

/// Source extensions the audio pipeline accepts. Video containers listed here
/// are audio-extractable and always redirect to MP3.
pub const AUDIO_SOURCE_EXTENSIONS: &[&str] = &["mp3", "m4a", "opus", "wav", "mp4"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCategory {
    Image,
    Video,
    Audio,
    StructuredData,
    Unknown,
}

/// The media kind a request belongs to; used in error messages and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Logo,
    Video,
    Audio,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MediaKind::Image => "image",
            MediaKind::Logo => "logo",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        })
    }
}

/// Lower-cased extension without the leading dot, or `""` when absent.
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// File name without its final extension.
pub fn stem_of(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
}

pub fn classify(file_name: &str) -> FormatCategory {
    let ext = extension_of(file_name);
    let ext = ext.as_str();
    if IMAGE_EXTENSIONS.contains(&ext) {
        FormatCategory::Image
    } else if VIDEO_EXTENSIONS.contains(&ext) {
        FormatCategory::Video
    } else if AUDIO_EXTENSIONS.contains(&ext) {
        FormatCategory::Audio
    } else if STRUCTURED_DATA_EXTENSIONS.contains(&ext) {
        FormatCategory::StructuredData
    } else {
        FormatCategory::Unknown
    }
}

/// Raster target formats. JPEG is written with the canonical `jpg` extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    pub fn parse(format: &str) -> Option<Self> {
        match format.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoFormat {
    Mp4,
    WebM,
}

impl VideoFormat {
    pub fn parse(format: &str) -> Option<Self> {
        match format.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "mp4" => Some(Self::Mp4),
            "webm" => Some(Self::WebM),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::WebM => "webm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    M4a,
    Opus,
    Wav,
}

impl AudioFormat {
    pub fn parse(format: &str) -> Option<Self> {
        match format.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "m4a" => Some(Self::M4a),
            "opus" => Some(Self::Opus),
            "wav" => Some(Self::Wav),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
            Self::Opus => "opus",
            Self::Wav => "wav",
        }
    }

    /// ffmpeg audio codec name.
    pub fn codec(self) -> &'static str {
        match self {
            Self::Mp3 => "libmp3lame",
            Self::M4a => "aac",
            Self::Opus => "libopus",
            Self::Wav => "pcm_s16le",
        }
    }

    /// WAV is written as uncompressed PCM; bitrate does not apply.
    pub fn uses_bitrate(self) -> bool {
        !matches!(self, Self::Wav)
    }
}

/// Target format for an audio request after the container redirect.
///
/// An `.mp4` source on the audio path is treated as an audio-extractable
/// container and always produces MP3, whatever was requested.
pub fn resolve_audio_target<'a>(file_name: &str, requested: &'a str) -> &'a str {
    if extension_of(file_name) == "mp4" {
        AudioFormat::Mp3.extension()
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_every_recognized_extension() {
        for ext in IMAGE_EXTENSIONS {
            assert_eq!(classify(&format!("a.{ext}")), FormatCategory::Image, "{ext}");
        }
        for ext in VIDEO_EXTENSIONS {
            assert_eq!(classify(&format!("a.{ext}")), FormatCategory::Video, "{ext}");
        }
        for ext in AUDIO_EXTENSIONS {
            assert_eq!(classify(&format!("a.{ext}")), FormatCategory::Audio, "{ext}");
        }
        assert_eq!(classify("data.json"), FormatCategory::StructuredData);
    }

    #[test]
    fn classification_ignores_case() {
        assert_eq!(classify("HOLIDAY.JPG"), FormatCategory::Image);
        assert_eq!(classify("clip.WebM"), FormatCategory::Video);
    }

    #[test]
    fn unknown_extensions() {
        assert_eq!(classify("archive.xyz"), FormatCategory::Unknown);
        assert_eq!(classify("README"), FormatCategory::Unknown);
        assert_eq!(classify(""), FormatCategory::Unknown);
    }

    #[test]
    fn only_final_extension_counts() {
        assert_eq!(classify("photo.png.mp3"), FormatCategory::Audio);
    }

    #[test]
    fn jpeg_spellings_share_canonical_extension() {
        assert_eq!(ImageFormat::parse("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::parse("JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
    }

    #[test]
    fn jfif_is_not_a_target() {
        assert_eq!(ImageFormat::parse("jfif"), None);
        assert_eq!(ImageFormat::parse("gif"), None);
    }

    #[test]
    fn audio_codecs() {
        assert_eq!(AudioFormat::Mp3.codec(), "libmp3lame");
        assert_eq!(AudioFormat::M4a.codec(), "aac");
        assert_eq!(AudioFormat::Opus.codec(), "libopus");
        assert_eq!(AudioFormat::Wav.codec(), "pcm_s16le");
        assert!(!AudioFormat::Wav.uses_bitrate());
    }

    #[test]
    fn mp4_on_audio_path_redirects_to_mp3() {
        assert_eq!(resolve_audio_target("talk.mp4", "opus"), "mp3");
        assert_eq!(resolve_audio_target("TALK.MP4", "wav"), "mp3");
        assert_eq!(resolve_audio_target("talk.wav", "opus"), "opus");
    }

    #[test]
    fn stem_and_extension() {
        assert_eq!(stem_of("holiday.final.png"), "holiday.final");
        assert_eq!(extension_of("holiday.final.PNG"), "png");
        assert_eq!(extension_of("noext"), "");
    }
}
