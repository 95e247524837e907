//! Axis-aligned rectangles in pixel coordinates.
//!
//! A [`Region`] is stored as signed `(x1, y1, x2, y2)` corners with exclusive
//! `x2`/`y2`, so configuration may reach past the image edges. Every consumer
//! clamps it first with [`Region::clamp_to`], which yields in-bounds [`Bounds`].

use serde::{Deserialize, Serialize};

/// Rectangle with exclusive right/bottom edges; may extend outside an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Region {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build a region from a top-left corner and a size.
    pub const fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub const fn from_array(corners: [i32; 4]) -> Self {
        Self::new(corners[0], corners[1], corners[2], corners[3])
    }

    pub const fn to_array(self) -> [i32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Intersect with `[0, width) x [0, height)`.
    ///
    /// Inverted or fully outside regions collapse to an empty [`Bounds`].
    pub fn clamp_to(&self, width: u32, height: u32) -> Bounds {
        let clamp = |value: i32, max: u32| -> u32 { (value.max(0) as u32).min(max) };
        let x1 = clamp(self.x1, width);
        let y1 = clamp(self.y1, height);
        let x2 = clamp(self.x2, width).max(x1);
        let y2 = clamp(self.y2, height).max(y1);
        Bounds { x1, y1, x2, y2 }
    }
}

impl From<[i32; 4]> for Region {
    fn from(corners: [i32; 4]) -> Self {
        Self::from_array(corners)
    }
}

/// In-bounds rectangle produced by [`Region::clamp_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Bounds {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl Bounds {
    /// Bounds covering a whole `width x height` image.
    pub const fn full(width: u32, height: u32) -> Self {
        Self {
            x1: 0,
            y1: 0,
            x2: width,
            y2: height,
        }
    }

    pub const fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub const fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    pub const fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Position of `(x, y)` relative to the bounds, `(x - x1) / max(width, 1)` per axis.
    pub fn relative(&self, x: u32, y: u32) -> (f32, f32) {
        let rel_x = (x as f32 - self.x1 as f32) / self.width().max(1) as f32;
        let rel_y = (y as f32 - self.y1 as f32) / self.height().max(1) as f32;
        (rel_x, rel_y)
    }
}
