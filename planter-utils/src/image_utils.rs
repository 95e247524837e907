use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, Rgba, RgbaImage, imageops::FilterType};

/// Load an image from disk into memory.
///
/// # Arguments
///
/// * `path` - The path to the image file.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    let path_ref = path.as_ref();
    image::open(path_ref).with_context(|| format!("failed to open image {}", path_ref.display()))
}

/// Compute the uniform scale factor that maps the longer side onto `max_dim`.
///
/// Returns `1.0` when upscaling is disallowed and the image already fits.
pub fn fit_scale(width: u32, height: u32, max_dim: u32, allow_upscale: bool) -> Result<f64> {
    anyhow::ensure!(
        width > 0 && height > 0,
        "image dimensions must be non-zero"
    );
    anyhow::ensure!(max_dim > 0, "maximum dimension must be non-zero");
    let longer = width.max(height);
    if !allow_upscale && longer <= max_dim {
        return Ok(1.0);
    }
    Ok(max_dim as f64 / longer as f64)
}

/// Dimensions after scaling so the longer side equals `max_dim`.
///
/// The longer side is set exactly; the shorter side is truncated and never drops below 1.
pub fn fit_dimensions(
    width: u32,
    height: u32,
    max_dim: u32,
    allow_upscale: bool,
) -> Result<(u32, u32)> {
    let scale = fit_scale(width, height, max_dim, allow_upscale)?;
    if scale == 1.0 {
        return Ok((width, height));
    }
    let scaled = |value: u32| ((value as f64 * scale) as u32).clamp(1, max_dim);
    Ok(if width >= height {
        (max_dim, scaled(height))
    } else {
        (scaled(width), max_dim)
    })
}

/// Resize an RGBA image so its longer side equals `max_dim`, preserving aspect ratio.
///
/// Resampling runs on premultiplied alpha, so transparent `(0, 0, 0, 0)` pixels
/// do not bleed black into the edges of opaque ones.
///
/// # Arguments
///
/// * `image` - The image to resize.
/// * `max_dim` - Target length of the longer side.
/// * `allow_upscale` - Whether images smaller than `max_dim` are enlarged.
/// * `filter` - The sampling filter to use for resizing.
pub fn resize_to_max_dimension(
    image: &RgbaImage,
    max_dim: u32,
    allow_upscale: bool,
    filter: FilterType,
) -> Result<RgbaImage> {
    let (width, height) = image.dimensions();
    let (new_w, new_h) = fit_dimensions(width, height, max_dim, allow_upscale)?;
    if (new_w, new_h) == (width, height) {
        return Ok(image.clone());
    }
    let premultiplied = premultiply_alpha(image);
    let mut resized = image::imageops::resize(&premultiplied, new_w, new_h, filter);
    unpremultiply_alpha(&mut resized);
    Ok(resized)
}

fn premultiply_alpha(image: &RgbaImage) -> RgbaImage {
    let mut out = image.clone();
    for px in out.pixels_mut() {
        let alpha = u32::from(px[3]);
        for channel in &mut px.0[..3] {
            *channel = ((u32::from(*channel) * alpha + 127) / 255) as u8;
        }
    }
    out
}

fn unpremultiply_alpha(image: &mut RgbaImage) {
    for px in image.pixels_mut() {
        let alpha = u32::from(px[3]);
        if alpha == 0 {
            *px = Rgba([0, 0, 0, 0]);
            continue;
        }
        for channel in &mut px.0[..3] {
            *channel = ((u32::from(*channel) * 255 + alpha / 2) / alpha).min(255) as u8;
        }
    }
}

/// Snap every alpha value to 0 or 255.
///
/// Pixels with alpha below `threshold` become `(0, 0, 0, 0)`; all others become opaque.
/// Returns the number of pixels made transparent.
pub fn binarize_alpha(image: &mut RgbaImage, threshold: u8) -> usize {
    let mut cleared = 0;
    for px in image.pixels_mut() {
        if px[3] < threshold {
            *px = Rgba([0, 0, 0, 0]);
            cleared += 1;
        } else {
            px[3] = 255;
        }
    }
    cleared
}
