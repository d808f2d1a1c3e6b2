//! Per-pixel collision mask.
//!
//! A mask marks the opaque footprint of a [`Frame`]: a pixel is solid when
//! its alpha is above [`ALPHA_THRESHOLD`]. Colorkeyed frames already store
//! keyed pixels with zero alpha, so one rule covers both kinds of frame.

use crate::components::frame::Frame;

pub const ALPHA_THRESHOLD: u8 = 127;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    pub fn from_frame(frame: &Frame) -> Self {
        let (width, height) = frame.size();
        let bits = frame
            .pixels()
            .pixels()
            .map(|px| px.0[3] > ALPHA_THRESHOLD)
            .collect();
        Self {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Solid state of (`x`, `y`); out of bounds reads as empty.
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    /// Number of solid pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// First solid pixel shared with `other` placed at `offset` relative to
    /// this mask, in this mask's coordinates.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(i32, i32)> {
        let (ox, oy) = offset;
        let x0 = ox.max(0);
        let y0 = oy.max(0);
        let x1 = (ox + other.width as i32).min(self.width as i32);
        let y1 = (oy + other.height as i32).min(self.height as i32);
        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - ox, y - oy) {
                    return Some((x, y));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn frame_with_solid(w: u32, h: u32, solid: &[(u32, u32)]) -> Frame {
        let mut img = RgbaImage::new(w, h);
        for &(x, y) in solid {
            img.put_pixel(x, y, Rgba([9, 9, 9, 255]));
        }
        Frame::new(img, None)
    }

    #[test]
    fn test_mask_threshold() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 127]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 128]));
        img.put_pixel(2, 0, Rgba([0, 0, 0, 255]));
        let mask = Mask::from_frame(&Frame::new(img, None));
        assert!(!mask.get(0, 0));
        assert!(mask.get(1, 0));
        assert!(mask.get(2, 0));
        assert_eq!(mask.count(), 2);
    }

    #[test]
    fn test_get_out_of_bounds_is_empty() {
        let mask = Mask::from_frame(&frame_with_solid(1, 1, &[(0, 0)]));
        assert!(mask.get(0, 0));
        assert!(!mask.get(-1, 0));
        assert!(!mask.get(1, 0));
    }

    #[test]
    fn test_overlap_with_offset() {
        let a = Mask::from_frame(&frame_with_solid(4, 4, &[(3, 3)]));
        let b = Mask::from_frame(&frame_with_solid(2, 2, &[(0, 0)]));
        assert_eq!(a.overlap(&b, (3, 3)), Some((3, 3)));
        assert_eq!(a.overlap(&b, (2, 2)), None);
        assert_eq!(a.overlap(&b, (10, 10)), None);
    }
}
