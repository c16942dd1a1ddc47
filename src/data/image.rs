//! Image preprocessing: decode, resize to the target geometry, and flatten
//! to normalized floats.
//!
//! Pixels come out row-major and channel-interleaved (R, G, B, R, G, B, ...
//! for three channels, one luma value per pixel for a single channel), each
//! byte divided by 255 so every value lies in [0, 1].
use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;

use crate::config::ImageGeometry;

/// Resampling filter used for every resize.
pub const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

/// Decodes the image at `path` and converts it to a flat pixel vector.
///
/// The decoded bitmap is dropped before returning, on success and on error.
pub fn load_image_pixels(
    path: &Path,
    geometry: ImageGeometry,
) -> Result<Vec<f32>, image::ImageError> {
    let img = image::open(path)?;
    Ok(image_to_pixels(&img, geometry))
}

/// Resizes `img` to exactly `geometry.width × geometry.height` and flattens it.
///
/// Returns a `Vec<f32>` of length `geometry.feature_count()`.
pub fn image_to_pixels(img: &DynamicImage, geometry: ImageGeometry) -> Vec<f32> {
    let resized = img.resize_exact(geometry.width, geometry.height, RESIZE_FILTER);
    let bytes = if geometry.channels == 1 {
        resized.to_luma8().into_raw()
    } else {
        resized.to_rgb8().into_raw()
    };
    normalize(&bytes)
}

fn normalize(bytes: &[u8]) -> Vec<f32> {
    bytes.iter().map(|&b| b as f32 / 255.0).collect()
}
