//! Pixel operations shared by the image and logo pipelines.
//!
//! These functions combine [`geometry`](super::geometry) with the `image`
//! crate. They never touch the filesystem except [`decode_oriented`].
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode + EXIF orientation | `ImageReader::into_decoder` + `DynamicImage::apply_orientation` |
//! | Resize | `resize_exact` with `Lanczos3` (down) or `CatmullRom` (up) |
//! | Background blur | `DynamicImage::blur` |
//! | Composite | `imageops::overlay` |
//! | Sharpen / contrast / brightness | `unsharpen`, `adjust_contrast`, `brighten` |

use super::geometry::{Resample, padded_cover, plan_fit, plan_resample};
use super::params::{Adjustments, BACKGROUND_BLUR_SIGMA, Sharpening};
use crate::encoder::EncoderError;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageDecoder, ImageReader, RgbaImage};
use std::path::Path;

/// Load an image from disk and rotate/flip it upright per its EXIF tag.
///
/// The format is sniffed from the content, so the file extension is only a
/// hint.
pub fn decode_oriented(path: &Path) -> Result<DynamicImage, EncoderError> {
    let mut decoder = ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Background canvas behind a letterboxed image.
///
/// The source is scaled to cover the canvas and blurred before the canvas
/// window is cut out, so the window's edges blur against real neighbours.
/// Only a margin of three sigma around the window is scaled.
fn background(src: &DynamicImage, canvas: (u32, u32), transparent: bool) -> RgbaImage {
    let (width, height) = canvas;
    if transparent {
        return RgbaImage::new(width, height);
    }
    let margin = (3.0 * BACKGROUND_BLUR_SIGMA).ceil() as u32;
    let padded = padded_cover((src.width(), src.height()), canvas, margin);
    let (region, (scaled_w, scaled_h), (left, top)) = (padded.region, padded.scaled, padded.offset);
    src.crop_imm(region.x, region.y, region.width, region.height)
        .resize_exact(scaled_w, scaled_h, FilterType::Lanczos3)
        .blur(BACKGROUND_BLUR_SIGMA)
        .crop_imm(left, top, width, height)
        .to_rgba8()
}

/// Resize `src` per [`plan_fit`] and center it on a `canvas`-sized background.
///
/// The result is always exactly `canvas` in size.
pub fn fit_to_canvas(
    src: &DynamicImage,
    canvas: (u32, u32),
    stretch_threshold: f64,
    transparent: bool,
) -> DynamicImage {
    let plan = plan_fit((src.width(), src.height()), canvas, stretch_threshold);
    let resized = src.resize_exact(plan.width, plan.height, FilterType::Lanczos3);

    let mut canvas_img = background(src, canvas, transparent);
    imageops::overlay(
        &mut canvas_img,
        &resized.to_rgba8(),
        plan.offset_x as i64,
        plan.offset_y as i64,
    );
    DynamicImage::ImageRgba8(canvas_img)
}

/// Resample a logo to `target`, choosing the strategy from [`plan_resample`].
///
/// Downscaling goes through a halfway size and is sharpened afterwards;
/// upscaling is a single Catmull-Rom pass; equal sizes are returned as is.
pub fn resample_logo(src: DynamicImage, target: (u32, u32)) -> DynamicImage {
    let (width, height) = target;
    match plan_resample((src.width(), src.height()), target) {
        Resample::Downscale {
            intermediate: (mid_w, mid_h),
        } => {
            let sharpening = Sharpening::light();
            src.resize_exact(mid_w, mid_h, FilterType::Lanczos3)
                .resize_exact(width, height, FilterType::Lanczos3)
                .unsharpen(sharpening.sigma, sharpening.threshold)
        }
        Resample::Upscale => src.resize_exact(width, height, FilterType::CatmullRom),
        Resample::Unchanged => src,
    }
}

pub fn sharpen(img: &DynamicImage, sharpening: Sharpening) -> DynamicImage {
    img.unsharpen(sharpening.sigma, sharpening.threshold)
}

pub fn adjust(img: &DynamicImage, adjustments: Adjustments) -> DynamicImage {
    let contrasted = img.adjust_contrast(adjustments.contrast);
    match adjustments.brightness_offset() {
        0 => contrasted,
        offset => contrasted.brighten(offset),
    }
}
