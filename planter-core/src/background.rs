//! Flat-background removal.
//!
//! Every pixel whose channels are all within `threshold` of a reference color is
//! replaced with fully transparent black; all other pixels keep their color and
//! alpha. The test compares each channel independently rather than using a joint
//! RGB distance, so the accepted set is a cube around the reference, not a
//! sphere. Switching to a Euclidean test would change which edge pixels survive.
//! There is no feathering: edges are hard 0/255 alpha steps.

use image::{Rgba, RgbaImage};
use log::info;
use planter_utils::{
    RgbColor,
    config::{BackgroundReferenceMode, BackgroundSettings, ExtractionMode},
};
use serde::Serialize;

use crate::pixel::RgbPixel;

/// Distance from each corner to the samples used by [`BackgroundReference::CornerAverage`].
pub const CORNER_AVERAGE_INSET: u32 = 2;

/// Offset of the single top-left sample used by [`BackgroundReference::Corner`].
pub const CORNER_SAMPLE_OFFSET: u32 = 5;

/// Source of the background reference color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundReference {
    /// Floor-averaged samples taken `inset` pixels inside each of the four corners.
    CornerAverage { inset: u32 },
    /// A single sample at `(x, y)`.
    Corner { x: u32, y: u32 },
    /// A known color.
    Fixed(RgbColor),
}

impl BackgroundReference {
    /// Resolve the reference color for `image`.
    ///
    /// Sample coordinates are clamped into the image. An empty image yields black.
    pub fn resolve(&self, image: &RgbaImage) -> RgbColor {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return match self {
                BackgroundReference::Fixed(color) => *color,
                _ => RgbColor::default(),
            };
        }
        match *self {
            BackgroundReference::CornerAverage { inset } => corner_average(image, inset),
            BackgroundReference::Corner { x, y } => {
                image.get_pixel(x.min(width - 1), y.min(height - 1)).color()
            }
            BackgroundReference::Fixed(color) => color,
        }
    }
}

fn corner_average(image: &RgbaImage, inset: u32) -> RgbColor {
    let (width, height) = image.dimensions();
    let near_x = inset.min(width - 1);
    let near_y = inset.min(height - 1);
    let far_x = width.saturating_sub(1 + inset);
    let far_y = height.saturating_sub(1 + inset);
    let samples = [
        (near_x, near_y),
        (far_x, near_y),
        (near_x, far_y),
        (far_x, far_y),
    ];

    let mut sums = [0u32; 3];
    for (x, y) in samples {
        let color = image.get_pixel(x, y).color();
        sums[0] += color.red as u32;
        sums[1] += color.green as u32;
        sums[2] += color.blue as u32;
    }
    let count = samples.len() as u32;
    RgbColor::new(
        (sums[0] / count) as u8,
        (sums[1] / count) as u8,
        (sums[2] / count) as u8,
    )
}

/// Background removal parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundParams {
    /// Strict per-channel tolerance.
    pub threshold: u8,
    pub reference: BackgroundReference,
}

impl Default for BackgroundParams {
    fn default() -> Self {
        Self {
            threshold: 32,
            reference: BackgroundReference::CornerAverage {
                inset: CORNER_AVERAGE_INSET,
            },
        }
    }
}

impl BackgroundParams {
    /// Resolve settings for `mode`, filling unset fields with that mode's defaults.
    pub fn from_settings(settings: &BackgroundSettings, mode: ExtractionMode) -> Self {
        let reference = match settings.reference_for(mode) {
            BackgroundReferenceMode::CornerAverage => BackgroundReference::CornerAverage {
                inset: CORNER_AVERAGE_INSET,
            },
            BackgroundReferenceMode::Corner => BackgroundReference::Corner {
                x: CORNER_SAMPLE_OFFSET,
                y: CORNER_SAMPLE_OFFSET,
            },
            BackgroundReferenceMode::Fixed => BackgroundReference::Fixed(settings.fixed_color),
        };
        Self {
            threshold: settings.threshold_for(mode),
            reference,
        }
    }
}

/// Outcome of [`remove_background`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackgroundStats {
    pub reference: RgbColor,
    pub removed: usize,
}

/// Whether `color` lies strictly within `threshold` of `reference` on every channel.
pub fn is_background(color: RgbColor, reference: RgbColor, threshold: u8) -> bool {
    let near = |a: u8, b: u8| a.abs_diff(b) < threshold;
    near(color.red, reference.red)
        && near(color.green, reference.green)
        && near(color.blue, reference.blue)
}

/// Make background pixels fully transparent, in place.
pub fn remove_background(image: &mut RgbaImage, params: &BackgroundParams) -> BackgroundStats {
    let reference = params.reference.resolve(image);
    info!("    Background color: {reference}");

    let mut removed = 0;
    for px in image.pixels_mut() {
        if is_background(px.color(), reference, params.threshold) {
            *px = Rgba([0, 0, 0, 0]);
            removed += 1;
        }
    }

    info!("    Background removal: {removed} pixels made transparent");
    BackgroundStats { reference, removed }
}
