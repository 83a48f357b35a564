//! Pure geometry for placing a source raster on a destination canvas.
//!
//! All functions here are pure and testable without any I/O or images.
//! Ratios are computed in floating point and truncated to whole pixels;
//! every returned dimension lies in `1..=MAX_DIMENSION`.

/// Largest width or height any image output may have.
pub const MAX_DIMENSION: u32 = 8192;

fn whole_px(value: f64) -> u32 {
    // `as` saturates: NaN and negatives become 0, which the clamp lifts to 1.
    (value as u32).clamp(1, MAX_DIMENSION)
}

fn ratio((width, height): (u32, u32)) -> f64 {
    width as f64 / height.max(1) as f64
}

/// Percentage by which the source aspect ratio deviates from the target's.
pub fn aspect_deviation(source: (u32, u32), target: (u32, u32)) -> f64 {
    let target_ratio = ratio(target);
    ((ratio(source) - target_ratio) / target_ratio * 100.0).abs()
}

/// Where the resized source lands on the target canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitPlan {
    /// Resized source width.
    pub width: u32,
    /// Resized source height.
    pub height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
    /// True when the source was stretched to the exact canvas size.
    pub stretched: bool,
}

/// Fit-or-stretch a source onto a `target` canvas.
///
/// When the aspect ratios differ by at most `stretch_threshold` percent the
/// source is stretched to fill the canvas exactly. Otherwise it is scaled to
/// fit inside the canvas with its aspect ratio preserved and centered.
///
/// # Examples
/// ```
/// # use mediaconv::imaging::geometry::plan_fit;
/// // 16:9 onto a square canvas, no tolerance → letterboxed
/// let plan = plan_fit((1920, 1080), (1280, 1280), 0.0);
/// assert_eq!((plan.width, plan.height), (1280, 720));
/// assert_eq!((plan.offset_x, plan.offset_y), (0, 280));
/// ```
pub fn plan_fit(source: (u32, u32), target: (u32, u32), stretch_threshold: f64) -> FitPlan {
    let (tgt_w, tgt_h) = target;

    if aspect_deviation(source, target) <= stretch_threshold {
        return FitPlan {
            width: tgt_w,
            height: tgt_h,
            offset_x: 0,
            offset_y: 0,
            stretched: true,
        };
    }

    let src_ratio = ratio(source);
    let (width, height) = if src_ratio > ratio(target) {
        // Wider than the canvas: width is the constraint
        (tgt_w, whole_px(tgt_w as f64 / src_ratio).min(tgt_h))
    } else {
        (whole_px(tgt_h as f64 * src_ratio).min(tgt_w), tgt_h)
    };

    FitPlan {
        width,
        height,
        offset_x: tgt_w.saturating_sub(width) / 2,
        offset_y: tgt_h.saturating_sub(height) / 2,
        stretched: false,
    }
}

/// A rectangle in source pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Centered region of the source with the target's aspect ratio.
///
/// Resizing this region to the target size gives the same pixels as scaling
/// the whole source to cover the target and center-cropping the overflow,
/// without materializing the oversized intermediate.
pub fn cover_region(source: (u32, u32), target: (u32, u32)) -> Region {
    let (src_w, src_h) = source;
    let tgt_ratio = ratio(target);

    let (width, height) = if ratio(source) > tgt_ratio {
        // Source is wider: keep full height, trim the sides
        (((src_h as f64 * tgt_ratio) as u32).clamp(1, src_w), src_h)
    } else {
        (src_w, ((src_w as f64 / tgt_ratio) as u32).clamp(1, src_h))
    };

    Region {
        x: (src_w - width) / 2,
        y: (src_h - height) / 2,
        width,
        height,
    }
}

/// A cover region widened by a margin, with where the target window sits
/// once the widened region is scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddedCover {
    /// Source pixels to crop: the cover region plus the margin, clipped to the source.
    pub region: Region,
    /// Size the cropped region is scaled to (canvas pixel density).
    pub scaled: (u32, u32),
    /// Top-left of the target window inside the scaled region.
    pub offset: (u32, u32),
}

/// Cover region padded with `margin` target pixels of real source content on
/// each side, where the source has any.
///
/// Scaling the padded region and cutting the target window out of it gives
/// the same framing as scaling the whole source to cover the target, but a
/// filter applied before the cut sees neighbouring source pixels at the
/// window's edges.
pub fn padded_cover(source: (u32, u32), target: (u32, u32), margin: u32) -> PaddedCover {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;
    let cover = cover_region(source, target);

    let scale_x = tgt_w as f64 / cover.width as f64;
    let scale_y = tgt_h as f64 / cover.height as f64;
    let pad_x = (margin as f64 / scale_x).ceil() as u32;
    let pad_y = (margin as f64 / scale_y).ceil() as u32;

    let x = cover.x.saturating_sub(pad_x);
    let y = cover.y.saturating_sub(pad_y);
    let width = (cover.x + cover.width + pad_x).min(src_w) - x;
    let height = (cover.y + cover.height + pad_y).min(src_h) - y;

    let scaled_w = ((width as f64 * scale_x).round() as u32).max(tgt_w);
    let scaled_h = ((height as f64 * scale_y).round() as u32).max(tgt_h);
    let left = (((cover.x - x) as f64 * scale_x).round() as u32).min(scaled_w - tgt_w);
    let top = (((cover.y - y) as f64 * scale_y).round() as u32).min(scaled_h - tgt_h);

    PaddedCover {
        region: Region {
            x,
            y,
            width,
            height,
        },
        scaled: (scaled_w, scaled_h),
        offset: (left, top),
    }
}

/// Independent max/min limits for logo dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub max_width: u32,
    pub max_height: u32,
    pub min_width: u32,
    pub min_height: u32,
}

/// Clamp source dimensions into `bounds`, preserving the aspect ratio.
///
/// An oversized source is scaled down, driven by whichever dimension is most
/// over its maximum; the other maximum is re-checked afterwards. An
/// undersized source is scaled up the same way against the minimums. A source
/// already within bounds is returned unchanged.
pub fn clamp_to_bounds(source: (u32, u32), bounds: &Bounds) -> (u32, u32) {
    let (w, h) = source;
    let r = ratio(source);
    let (max_w, max_h) = (bounds.max_width as f64, bounds.max_height as f64);
    let (min_w, min_h) = (bounds.min_width as f64, bounds.min_height as f64);

    if w > bounds.max_width || h > bounds.max_height {
        let over_w = w as f64 / max_w;
        let over_h = h as f64 / max_h;
        let (mut new_w, mut new_h) = if over_w >= over_h {
            (max_w, max_w / r)
        } else {
            (max_h * r, max_h)
        };
        if new_h > max_h {
            new_h = max_h;
            new_w = new_h * r;
        }
        if new_w > max_w {
            new_w = max_w;
            new_h = new_w / r;
        }
        return (whole_px(new_w), whole_px(new_h));
    }

    if w < bounds.min_width || h < bounds.min_height {
        // A zero minimum is never "under", so it must not drive the scale.
        let under_w = if bounds.min_width == 0 { f64::INFINITY } else { w as f64 / min_w };
        let under_h = if bounds.min_height == 0 { f64::INFINITY } else { h as f64 / min_h };
        let (mut new_w, mut new_h) = if under_w <= under_h {
            (min_w, min_w / r)
        } else {
            (min_h * r, min_h)
        };
        if new_h < min_h {
            new_h = min_h;
            new_w = new_h * r;
        }
        if new_w < min_w {
            new_w = min_w;
            new_h = new_w / r;
        }
        return (whole_px(new_w), whole_px(new_h));
    }

    (w, h)
}

/// How to get from source dimensions to clamped dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resample {
    /// Shrink in two passes, through a halfway size.
    Downscale { intermediate: (u32, u32) },
    /// Grow in a single pass with a smoother filter.
    Upscale,
    /// Same size: no resampling.
    Unchanged,
}

pub fn plan_resample(source: (u32, u32), target: (u32, u32)) -> Resample {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    if src_w > tgt_w || src_h > tgt_h {
        Resample::Downscale {
            intermediate: ((src_w + tgt_w) / 2, (src_h + tgt_h) / 2),
        }
    } else if src_w < tgt_w || src_h < tgt_h {
        Resample::Upscale
    } else {
        Resample::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(max: (u32, u32), min: (u32, u32)) -> Bounds {
        Bounds {
            max_width: max.0,
            max_height: max.1,
            min_width: min.0,
            min_height: min.1,
        }
    }

    // =========================================================================
    // plan_fit
    // =========================================================================

    #[test]
    fn fit_preserves_aspect_without_tolerance() {
        let plan = plan_fit((1920, 1080), (1280, 1280), 0.0);
        assert!(!plan.stretched);
        assert_eq!((plan.width, plan.height), (1280, 720));
        assert_eq!((plan.offset_x, plan.offset_y), (0, 280));
    }

    #[test]
    fn fit_stretches_with_full_tolerance() {
        let plan = plan_fit((1920, 1080), (1280, 1280), 100.0);
        assert!(plan.stretched);
        assert_eq!((plan.width, plan.height), (1280, 1280));
        assert_eq!((plan.offset_x, plan.offset_y), (0, 0));
    }

    #[test]
    fn fit_taller_source_pins_height() {
        // 600x800 (3:4) onto 1000x500 → height 500, width 375
        let plan = plan_fit((600, 800), (1000, 500), 0.0);
        assert_eq!((plan.width, plan.height), (375, 500));
        assert_eq!((plan.offset_x, plan.offset_y), (312, 0));
    }

    #[test]
    fn fit_same_ratio_stretches_at_zero_threshold() {
        // Deviation is exactly 0, which is within a 0% threshold
        let plan = plan_fit((800, 600), (400, 300), 0.0);
        assert!(plan.stretched);
        assert_eq!((plan.width, plan.height), (400, 300));
    }

    #[test]
    fn fit_threshold_boundary() {
        // 1000x1000 vs 1100x1000: deviation = |1 - 1.1| / 1.1 * 100 ≈ 9.09%
        assert!(plan_fit((1000, 1000), (1100, 1000), 9.1).stretched);
        assert!(!plan_fit((1000, 1000), (1100, 1000), 9.0).stretched);
    }

    #[test]
    fn fit_extreme_ratio_never_collapses_to_zero() {
        let plan = plan_fit((10_000, 1), (100, 100), 0.0);
        assert_eq!((plan.width, plan.height), (100, 1));
        assert_eq!(plan.offset_y, 49);
    }

    #[test]
    fn fit_truncates_fractional_pixels() {
        // 1000x333 onto 500x500: height = 500 / 3.003 = 166.5 → 166
        let plan = plan_fit((1000, 333), (500, 500), 0.0);
        assert_eq!(plan.height, 166);
        assert_eq!(plan.offset_y, 167);
    }

    // =========================================================================
    // cover_region
    // =========================================================================

    #[test]
    fn cover_wide_source_trims_sides() {
        let region = cover_region((1920, 1080), (1080, 1080));
        assert_eq!(region, Region { x: 420, y: 0, width: 1080, height: 1080 });
    }

    #[test]
    fn cover_tall_source_trims_top_and_bottom() {
        let region = cover_region((600, 800), (600, 300));
        assert_eq!(region, Region { x: 0, y: 250, width: 600, height: 300 });
    }

    #[test]
    fn cover_same_ratio_uses_whole_source() {
        let region = cover_region((800, 600), (400, 300));
        assert_eq!(region, Region { x: 0, y: 0, width: 800, height: 600 });
    }

    // =========================================================================
    // padded_cover
    // =========================================================================

    #[test]
    fn padded_cover_extends_into_trimmed_sides() {
        let padded = padded_cover((1920, 1080), (1080, 1080), 30);
        assert_eq!(padded.region, Region { x: 390, y: 0, width: 1140, height: 1080 });
        assert_eq!(padded.scaled, (1140, 1080));
        assert_eq!(padded.offset, (30, 0));
    }

    #[test]
    fn padded_cover_margin_follows_downscale() {
        // Source is 2x the canvas density, so 30 canvas px are 60 source px
        let padded = padded_cover((4000, 1000), (1000, 500), 30);
        assert_eq!(padded.region, Region { x: 940, y: 0, width: 2120, height: 1000 });
        assert_eq!(padded.scaled, (1060, 500));
        assert_eq!(padded.offset, (30, 0));
    }

    #[test]
    fn padded_cover_without_room_is_plain_cover() {
        let padded = padded_cover((800, 600), (400, 300), 30);
        assert_eq!(padded.region, Region { x: 0, y: 0, width: 800, height: 600 });
        assert_eq!(padded.scaled, (400, 300));
        assert_eq!(padded.offset, (0, 0));
    }

    #[test]
    fn padded_cover_window_always_fits() {
        for (source, target) in [((7, 3), (100, 100)), ((1, 8192), (8192, 1)), ((333, 777), (50, 90))] {
            let padded = padded_cover(source, target, 30);
            assert!(padded.region.x + padded.region.width <= source.0);
            assert!(padded.region.y + padded.region.height <= source.1);
            assert!(padded.offset.0 + target.0 <= padded.scaled.0);
            assert!(padded.offset.1 + target.1 <= padded.scaled.1);
        }
    }

    // =========================================================================
    // clamp_to_bounds
    // =========================================================================

    #[test]
    fn clamp_oversized_landscape() {
        let (w, h) = clamp_to_bounds((4000, 2000), &bounds((1920, 1920), (0, 0)));
        assert!(w <= 1920 && h <= 1920);
        assert_eq!((w, h), (1920, 960));
    }

    #[test]
    fn clamp_driven_by_most_over_dimension() {
        // Height is 4x over, width only 1.25x over → height drives
        let (w, h) = clamp_to_bounds((500, 2000), &bounds((400, 500), (0, 0)));
        assert_eq!((w, h), (125, 500));
    }

    #[test]
    fn clamp_rechecks_other_maximum() {
        let (w, h) = clamp_to_bounds((1000, 900), &bounds((800, 600), (0, 0)));
        assert!(w <= 800 && h <= 600);
        assert_eq!(h, 600);
    }

    #[test]
    fn clamp_undersized_scales_up() {
        let (w, h) = clamp_to_bounds((50, 25), &bounds((1000, 1000), (200, 200)));
        assert!(w >= 200 && h >= 200);
        assert_eq!((w, h), (400, 200));
    }

    #[test]
    fn clamp_within_bounds_is_unchanged() {
        assert_eq!(
            clamp_to_bounds((300, 200), &bounds((512, 512), (64, 64))),
            (300, 200)
        );
    }

    #[test]
    fn clamp_zero_minimum_does_not_drive() {
        let (w, h) = clamp_to_bounds((100, 20), &bounds((1000, 1000), (0, 40)));
        assert_eq!((w, h), (200, 40));
    }

    #[test]
    fn clamp_results_never_exceed_global_maximum() {
        let (w, h) = clamp_to_bounds((10, 5), &bounds((8192, 8192), (8192, 8192)));
        assert!(w <= MAX_DIMENSION && h <= MAX_DIMENSION);
    }

    // =========================================================================
    // plan_resample
    // =========================================================================

    #[test]
    fn resample_downscale_has_halfway_step() {
        assert_eq!(
            plan_resample((4000, 2000), (1920, 960)),
            Resample::Downscale {
                intermediate: (2960, 1480)
            }
        );
    }

    #[test]
    fn resample_upscale_and_unchanged() {
        assert_eq!(plan_resample((50, 25), (400, 200)), Resample::Upscale);
        assert_eq!(plan_resample((300, 200), (300, 200)), Resample::Unchanged);
    }
}
