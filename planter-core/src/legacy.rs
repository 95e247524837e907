//! Ellipse-based face erasure used by the legacy extraction mode.
//!
//! The first extraction pass covered each face with one solid ellipse painted in
//! a color sampled from a face-free point of the pot. It leaves visible patches
//! on textured pots but is kept so older placeholder sets can be regenerated.

use image::ImageBuffer;
use imageproc::drawing::draw_filled_ellipse_mut;
use log::{info, warn};
use planter_utils::RgbColor;
use serde::Serialize;

use crate::{pixel::RgbPixel, region::Region, sampler::average_color};

/// Outcome of [`erase_face_ellipse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegacyStats {
    /// Fill color used for the ellipse.
    pub pot_color: RgbColor,
}

/// Paint a filled ellipse inscribed in `face` with the pot color.
///
/// The color is read from `pot_sample` when it lies inside the image and
/// otherwise falls back to the bright-pixel average of `face`. The sampled
/// pixel's own alpha is kept for the fill.
pub fn erase_face_ellipse<P: RgbPixel>(
    image: &mut ImageBuffer<P, Vec<u8>>,
    face: Region,
    pot_sample: Option<(u32, u32)>,
    brightness_floor: f32,
) -> LegacyStats {
    let (width, height) = image.dimensions();
    let sampled = pot_sample.filter(|&(x, y)| x < width && y < height);
    if let (Some((x, y)), None) = (pot_sample, sampled) {
        warn!(
            "Pot sample ({x}, {y}) lies outside the {width}x{height} crop; averaging the face region"
        );
    }

    let pot_color = match sampled {
        Some((x, y)) => image.get_pixel(x, y).color(),
        None => average_color(&*image, face, brightness_floor),
    };
    info!("    Pot color: {pot_color}");

    let center = ((face.x1 + face.x2) / 2, (face.y1 + face.y2) / 2);
    let radius_x = (face.x2 - face.x1) / 2;
    let radius_y = (face.y2 - face.y1) / 2;
    if radius_x <= 0 || radius_y <= 0 || width == 0 || height == 0 {
        return LegacyStats { pot_color };
    }

    let mut fill = match sampled {
        Some((x, y)) => *image.get_pixel(x, y),
        None => *image.get_pixel(0, 0),
    };
    fill.set_color(pot_color);
    draw_filled_ellipse_mut(image, center, radius_x, radius_y, fill);

    LegacyStats { pot_color }
}
