//! Representative color sampling with a brightness floor.
//!
//! Both samplers ignore pixels whose brightness `(r + g + b) / 3` is at or
//! below the floor. On pot artwork this drops outlines, eyes and shadows, so
//! the mean approximates the bare pot surface that later replaces them.

use image::ImageBuffer;
use planter_utils::RgbColor;

use crate::{pixel::RgbPixel, region::Region};

/// Returned by [`average_color`] when no pixel clears the brightness floor.
pub const FALLBACK_COLOR: RgbColor = RgbColor::new(200, 180, 160);

/// Default floor for region-wide averages.
pub const AVERAGE_BRIGHTNESS_FLOOR: f32 = 150.0;

/// Default floor for neighborhood averages.
pub const LOCAL_BRIGHTNESS_FLOOR: f32 = 160.0;

#[derive(Default)]
struct ColorAccumulator {
    red: u64,
    green: u64,
    blue: u64,
    count: u64,
}

impl ColorAccumulator {
    fn add_if_bright(&mut self, color: RgbColor, floor: f32) {
        if color.brightness() > floor {
            self.red += color.red as u64;
            self.green += color.green as u64;
            self.blue += color.blue as u64;
            self.count += 1;
        }
    }

    /// Per-channel integer mean, `None` when nothing was accumulated.
    fn mean(&self) -> Option<RgbColor> {
        if self.count == 0 {
            return None;
        }
        Some(RgbColor::new(
            (self.red / self.count) as u8,
            (self.green / self.count) as u8,
            (self.blue / self.count) as u8,
        ))
    }
}

/// Mean color of the pixels in `region` brighter than `brightness_floor`.
///
/// The region is clamped to the image first. Returns [`FALLBACK_COLOR`] when
/// nothing qualifies, including for empty regions.
pub fn average_color<P: RgbPixel>(
    image: &ImageBuffer<P, Vec<u8>>,
    region: Region,
    brightness_floor: f32,
) -> RgbColor {
    let bounds = region.clamp_to(image.width(), image.height());
    let mut acc = ColorAccumulator::default();
    for y in bounds.y1..bounds.y2 {
        for x in bounds.x1..bounds.x2 {
            acc.add_if_bright(image.get_pixel(x, y).color(), brightness_floor);
        }
    }
    acc.mean().unwrap_or(FALLBACK_COLOR)
}

/// Mean color of the bright pixels in the `(2 * radius + 1)` square centred on `(x, y)`.
///
/// The window is clipped to the image. Returns `None` when no pixel in it
/// clears `brightness_floor`; callers then use the region average instead.
pub fn local_color<P: RgbPixel>(
    image: &ImageBuffer<P, Vec<u8>>,
    x: u32,
    y: u32,
    radius: u32,
    brightness_floor: f32,
) -> Option<RgbColor> {
    let x1 = x.saturating_sub(radius);
    let y1 = y.saturating_sub(radius);
    let x2 = x.saturating_add(radius).saturating_add(1).min(image.width());
    let y2 = y.saturating_add(radius).saturating_add(1).min(image.height());

    let mut acc = ColorAccumulator::default();
    for ny in y1..y2 {
        for nx in x1..x2 {
            acc.add_if_bright(image.get_pixel(nx, ny).color(), brightness_floor);
        }
    }
    acc.mean()
}
