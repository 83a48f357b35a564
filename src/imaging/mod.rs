//! Image processing in pure Rust on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `ImageReader` + EXIF orientation |
//! | **Fit / stretch** | Lanczos3 `resize_exact` + blurred or transparent canvas |
//! | **Logo resample** | two-pass Lanczos3 down, Catmull-Rom up |
//! | **Finish** | `unsharpen`, `adjust_contrast`, `brighten` |
//!
//! The module is split into:
//! - **Geometry**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Operations**: Pixel work combining geometry + the `image` crate
//!
//! Encoding lives in [`crate::encoder`].

pub mod geometry;
pub mod operations;
mod params;

pub use params::{Adjustments, RasterSettings, Sharpening};
