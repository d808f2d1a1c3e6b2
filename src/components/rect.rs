//! Integer rectangle used for image regions, entity bounds and the
//! collision-rect tables.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixels.
///
/// Deserializes from either a `[x, y, width, height]` array or an object
/// with any subset of `x`, `y`, `width`, `height` (missing fields are 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RectRepr")]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RectRepr {
    Tuple([i32; 4]),
    Fields {
        #[serde(default)]
        x: i32,
        #[serde(default)]
        y: i32,
        #[serde(default)]
        width: i32,
        #[serde(default)]
        height: i32,
    },
}

impl From<RectRepr> for Rect {
    fn from(repr: RectRepr) -> Self {
        match repr {
            RectRepr::Tuple([x, y, width, height]) => Rect::new(x, y, width, height),
            RectRepr::Fields {
                x,
                y,
                width,
                height,
            } => Rect::new(x, y, width, height),
        }
    }
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// True when the rectangles share at least one pixel.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}
