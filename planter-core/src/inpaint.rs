//! Pot face removal.
//!
//! The reference sheet draws a face (eyes, mouth and rosy cheeks) on every pot.
//! [`remove_face_features`] erases it inside a pot region in three ordered passes:
//!
//! 1. pixels much darker than the pot average are repainted with the local pot color;
//! 2. red-shifted pixels inside the face zone (blush) are repainted the same way;
//! 3. the region is Gaussian blurred to hide the seams.
//!
//! Passes 1 and 2 are single forward scans over the shared buffer. A pixel is
//! tested against its current value, and the neighborhood sampler sees every
//! replacement already made earlier in the scan, so the output depends on scan
//! order. Pass 2 starts only after pass 1 has covered the whole region.

use image::{ImageBuffer, imageops};
use log::{debug, info};
use planter_utils::{
    RgbColor,
    config::{FaceZoneSettings, InpaintSettings},
    timing_guard,
};
use serde::Serialize;

use crate::{
    pixel::RgbPixel,
    region::{Bounds, Region},
    sampler::{AVERAGE_BRIGHTNESS_FLOOR, LOCAL_BRIGHTNESS_FLOOR, average_color, local_color},
};

/// Fixed-point scale for the tuning ratios. Thresholds are compared on
/// cross-multiplied integers so a pixel exactly on a cut-off never qualifies.
const RATIO_SCALE: u64 = 1000;

fn scaled_ratio(ratio: f32) -> u64 {
    (f64::from(ratio) * RATIO_SCALE as f64).round().max(0.0) as u64
}

/// `r / max(g, 1) > pot_r / max(pot_g, 1) * gain / RATIO_SCALE`, without division.
fn red_shifted(color: RgbColor, pot_color: RgbColor, scaled_gain: u64) -> bool {
    let lhs = u64::from(color.red) * u64::from(pot_color.green.max(1)) * RATIO_SCALE;
    let rhs = scaled_gain * u64::from(pot_color.red) * u64::from(color.green.max(1));
    lhs > rhs
}

/// Relative sub-rectangle of a pot region where blush marks are expected.
///
/// Bounds are exclusive on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceZone {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

impl FaceZone {
    pub fn contains(&self, rel_x: f32, rel_y: f32) -> bool {
        self.x_min < rel_x && rel_x < self.x_max && self.y_min < rel_y && rel_y < self.y_max
    }
}

impl Default for FaceZone {
    fn default() -> Self {
        Self {
            x_min: 0.15,
            x_max: 0.85,
            y_min: 0.15,
            y_max: 0.75,
        }
    }
}

impl From<&FaceZoneSettings> for FaceZone {
    fn from(zone: &FaceZoneSettings) -> Self {
        Self {
            x_min: zone.x_min,
            x_max: zone.x_max,
            y_min: zone.y_min,
            y_max: zone.y_max,
        }
    }
}

/// Thresholds for [`remove_face_features`].
#[derive(Debug, Clone, PartialEq)]
pub struct InpaintParams {
    /// Dark features are pixels below `dark_ratio * average brightness`.
    pub dark_ratio: f32,
    /// The blush pass skips pixels darker than this.
    pub blush_min_brightness: f32,
    /// Blush needs `r/g > average r/g * blush_ratio_gain`.
    pub blush_ratio_gain: f32,
    /// Blush needs `r > average r * blush_red_gain`.
    pub blush_red_gain: f32,
    pub face_zone: FaceZone,
    /// Half-width of the local color window.
    pub local_radius: u32,
    pub average_floor: f32,
    pub local_floor: f32,
    /// Sigma of the smoothing blur; `0.0` skips pass 3.
    pub blur_sigma: f32,
}

impl Default for InpaintParams {
    fn default() -> Self {
        Self {
            dark_ratio: 0.55,
            blush_min_brightness: 80.0,
            blush_ratio_gain: 1.25,
            blush_red_gain: 1.1,
            face_zone: FaceZone::default(),
            local_radius: 40,
            average_floor: AVERAGE_BRIGHTNESS_FLOOR,
            local_floor: LOCAL_BRIGHTNESS_FLOOR,
            blur_sigma: 3.0,
        }
    }
}

impl From<&InpaintSettings> for InpaintParams {
    fn from(settings: &InpaintSettings) -> Self {
        Self {
            dark_ratio: settings.dark_ratio,
            blush_min_brightness: settings.blush_min_brightness,
            blush_ratio_gain: settings.blush_ratio_gain,
            blush_red_gain: settings.blush_red_gain,
            face_zone: FaceZone::from(&settings.face_zone),
            local_radius: settings.local_radius,
            average_floor: settings.average_floor,
            local_floor: settings.local_floor,
            blur_sigma: settings.blur_sigma,
        }
    }
}

/// What [`remove_face_features`] changed in one pot region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InpaintStats {
    /// Pot average color measured before any pass ran.
    pub pot_color: RgbColor,
    pub dark_replaced: usize,
    pub blush_replaced: usize,
}

/// Erase facial artwork inside `pot_region` of `image`, in place.
///
/// The region is clamped to the image; an empty region leaves the image untouched.
pub fn remove_face_features<P: RgbPixel>(
    image: &mut ImageBuffer<P, Vec<u8>>,
    pot_region: Region,
    params: &InpaintParams,
) -> InpaintStats {
    let bounds = pot_region.clamp_to(image.width(), image.height());
    let pot_color = average_color(&*image, pot_region, params.average_floor);

    info!(
        "    Pot avg color: {}, brightness={:.0}",
        pot_color,
        pot_color.brightness()
    );

    if bounds.is_empty() {
        debug!("Pot region {:?} is outside the image; nothing to in-paint", pot_region);
        return InpaintStats {
            pot_color,
            dark_replaced: 0,
            blush_replaced: 0,
        };
    }

    let dark_replaced = {
        let _timing = timing_guard("dark feature pass", log::Level::Debug);
        replace_dark_features(image, bounds, pot_color, params)
    };
    info!("    Pass 1 (dark features): replaced {dark_replaced} pixels");

    let blush_replaced = {
        let _timing = timing_guard("blush pass", log::Level::Debug);
        replace_blush_marks(image, bounds, pot_color, params)
    };
    info!("    Pass 2 (blush marks): replaced {blush_replaced} pixels");

    {
        let _timing = timing_guard("smoothing pass", log::Level::Debug);
        smooth_region(image, bounds, params.blur_sigma);
    }

    InpaintStats {
        pot_color,
        dark_replaced,
        blush_replaced,
    }
}

/// Pass 1: repaint pixels darker than `dark_ratio` times the pot brightness.
pub fn replace_dark_features<P: RgbPixel>(
    image: &mut ImageBuffer<P, Vec<u8>>,
    bounds: Bounds,
    pot_color: RgbColor,
    params: &InpaintParams,
) -> usize {
    let cutoff = scaled_ratio(params.dark_ratio) * u64::from(pot_color.channel_sum());
    let mut replaced = 0;
    for y in bounds.y1..bounds.y2 {
        for x in bounds.x1..bounds.x2 {
            let sum = u64::from(image.get_pixel(x, y).color().channel_sum());
            if sum * RATIO_SCALE < cutoff {
                repaint(image, x, y, pot_color, params);
                replaced += 1;
            }
        }
    }
    replaced
}

/// Pass 2: repaint blush-like pixels inside the face zone.
pub fn replace_blush_marks<P: RgbPixel>(
    image: &mut ImageBuffer<P, Vec<u8>>,
    bounds: Bounds,
    pot_color: RgbColor,
    params: &InpaintParams,
) -> usize {
    let ratio_gain = scaled_ratio(params.blush_ratio_gain);
    let red_cutoff = scaled_ratio(params.blush_red_gain) * u64::from(pot_color.red);
    let min_sum = params.blush_min_brightness * 3.0;
    let mut replaced = 0;
    for y in bounds.y1..bounds.y2 {
        for x in bounds.x1..bounds.x2 {
            let color = image.get_pixel(x, y).color();
            if (color.channel_sum() as f32) < min_sum {
                continue;
            }
            let (rel_x, rel_y) = bounds.relative(x, y);
            if params.face_zone.contains(rel_x, rel_y)
                && red_shifted(color, pot_color, ratio_gain)
                && u64::from(color.red) * RATIO_SCALE > red_cutoff
            {
                repaint(image, x, y, pot_color, params);
                replaced += 1;
            }
        }
    }
    replaced
}

/// Pass 3: Gaussian blur restricted to `bounds`, pasted back in place.
pub fn smooth_region<P: RgbPixel>(image: &mut ImageBuffer<P, Vec<u8>>, bounds: Bounds, sigma: f32) {
    if bounds.is_empty() || sigma <= 0.0 {
        return;
    }
    let patch = imageops::crop_imm(&*image, bounds.x1, bounds.y1, bounds.width(), bounds.height())
        .to_image();
    let blurred = imageops::blur(&patch, sigma);
    imageops::replace(image, &blurred, bounds.x1 as i64, bounds.y1 as i64);
}

fn repaint<P: RgbPixel>(
    image: &mut ImageBuffer<P, Vec<u8>>,
    x: u32,
    y: u32,
    pot_color: RgbColor,
    params: &InpaintParams,
) {
    let replacement =
        local_color(&*image, x, y, params.local_radius, params.local_floor).unwrap_or(pot_color);
    image.get_pixel_mut(x, y).set_color(replacement);
}
