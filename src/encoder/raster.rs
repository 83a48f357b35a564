//! Raster encoding: PNG and JPEG in process, WebP through `cwebp`.

use super::process::{program_name, run_piped};
use super::{EncoderError, RasterEncoder};
use crate::format::ImageFormat;
use crate::imaging::RasterSettings;
use crate::quality::PngCompression;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use std::path::PathBuf;

/// Production [`RasterEncoder`].
#[derive(Debug, Clone)]
pub struct DefaultRasterEncoder {
    cwebp: PathBuf,
}

impl DefaultRasterEncoder {
    pub fn new(cwebp: impl Into<PathBuf>) -> Self {
        Self {
            cwebp: cwebp.into(),
        }
    }

    /// Check that the `cwebp` binary can be resolved.
    pub fn validate(&self) -> Result<(), EncoderError> {
        which::which(&self.cwebp)
            .map(|_| ())
            .map_err(|_| EncoderError::NotFound {
                program: program_name(&self.cwebp),
            })
    }

    fn encode_webp(&self, raster: &DynamicImage, quality: u8) -> Result<Vec<u8>, EncoderError> {
        let args = [
            "-q".to_string(),
            quality.to_string(),
            "-o".to_string(),
            "-".to_string(),
            "--".to_string(),
            "-".to_string(),
        ];
        // Lossless PNG is the intermediate cwebp reads from stdin.
        run_piped(&self.cwebp, &args, |stdin| {
            raster.write_with_encoder(PngEncoder::new_with_quality(
                stdin,
                CompressionType::Fast,
                FilterType::Adaptive,
            ))?;
            Ok(())
        })
    }
}

impl Default for DefaultRasterEncoder {
    fn default() -> Self {
        Self::new("cwebp")
    }
}

fn compression_type(compression: PngCompression) -> CompressionType {
    match compression {
        PngCompression::Fast => CompressionType::Fast,
        PngCompression::Default => CompressionType::Default,
        PngCompression::Best => CompressionType::Best,
    }
}

fn encode_png(raster: &DynamicImage, compression: PngCompression) -> Result<Vec<u8>, EncoderError> {
    let mut buf = Vec::new();
    raster.write_with_encoder(PngEncoder::new_with_quality(
        &mut buf,
        compression_type(compression),
        FilterType::Adaptive,
    ))?;
    Ok(buf)
}

fn encode_jpeg(raster: &DynamicImage, quality: u8) -> Result<Vec<u8>, EncoderError> {
    let mut buf = Vec::new();
    // JPEG has no alpha channel
    DynamicImage::ImageRgb8(raster.to_rgb8())
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))?;
    Ok(buf)
}

impl RasterEncoder for DefaultRasterEncoder {
    fn encode(
        &self,
        raster: &DynamicImage,
        settings: &RasterSettings,
    ) -> Result<Vec<u8>, EncoderError> {
        match settings.format {
            ImageFormat::Png => encode_png(raster, settings.compression),
            ImageFormat::Jpeg => encode_jpeg(raster, settings.quality),
            ImageFormat::WebP => self.encode_webp(raster, settings.quality),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::QualityLevel;
    use crate::test_helpers::gradient_image;
    use image::GenericImageView;

    fn settings(format: ImageFormat, level: u8) -> RasterSettings {
        RasterSettings::for_level(format, QualityLevel::new(level).unwrap())
    }

    #[test]
    fn png_round_trip_keeps_dimensions_and_alpha() {
        let raster = DynamicImage::ImageRgba8(gradient_image(64, 48).to_rgba8());
        let bytes = DefaultRasterEncoder::default()
            .encode(&raster, &settings(ImageFormat::Png, 5))
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (64, 48));
        assert!(decoded.color().has_alpha());
    }

    #[test]
    fn jpeg_quality_changes_size() {
        let raster = gradient_image(256, 256);
        let encoder = DefaultRasterEncoder::default();
        let low = encoder.encode(&raster, &settings(ImageFormat::Jpeg, 1)).unwrap();
        let high = encoder.encode(&raster, &settings(ImageFormat::Jpeg, 5)).unwrap();
        assert!(low.len() < high.len());
        assert_eq!(image::guess_format(&low).unwrap(), image::ImageFormat::Jpeg);
    }

    #[test]
    fn webp_without_cwebp_is_spawn_error() {
        let encoder = DefaultRasterEncoder::new("/nonexistent/cwebp");
        let err = encoder
            .encode(&gradient_image(8, 8), &settings(ImageFormat::WebP, 3))
            .unwrap_err();
        assert!(matches!(err, EncoderError::Spawn { .. }));
    }

    #[test]
    fn validate_reports_missing_binary() {
        let encoder = DefaultRasterEncoder::new("/nonexistent/cwebp");
        assert!(matches!(
            encoder.validate(),
            Err(EncoderError::NotFound { .. })
        ));
    }

    #[test]
    fn webp_through_cwebp_when_available() {
        let encoder = DefaultRasterEncoder::default();
        if encoder.validate().is_err() {
            return;
        }
        let bytes = encoder
            .encode(&gradient_image(300, 200), &settings(ImageFormat::WebP, 4))
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (300, 200));
    }
}
