use image::{Pixel, Rgb, Rgba};
use planter_utils::RgbColor;

/// 8-bit pixels with leading red, green and blue channels.
///
/// Lets the sampler and in-painters run on both RGB and RGBA buffers while
/// leaving any alpha channel untouched.
pub trait RgbPixel: Pixel<Subpixel = u8> + 'static {
    fn color(&self) -> RgbColor {
        let ch = self.channels();
        RgbColor::new(ch[0], ch[1], ch[2])
    }

    fn set_color(&mut self, color: RgbColor) {
        let ch = self.channels_mut();
        ch[0] = color.red;
        ch[1] = color.green;
        ch[2] = color.blue;
    }
}

impl RgbPixel for Rgb<u8> {}

impl RgbPixel for Rgba<u8> {}
