//! Frame extraction utilities.
//!
//! A [`Frame`] is an immutable RGBA pixel buffer plus the colorkey that was
//! used to manufacture its transparency, if any. Frames are cheap to clone
//! (the pixels are shared) and every distinct buffer gets a process-unique id
//! that the platform layer uses to cache GPU textures.
//!
//! [`extract_frame`] and [`extract_frame_alpha`] cut a region out of a source
//! frame and scale it, producing a new independent frame.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use raylib::prelude::Color;

use crate::resources::assettable::AssetError;

static NEXT_FRAME_ID: AtomicU64 = AtomicU64::new(1);

/// One decoded still image.
#[derive(Debug, Clone)]
pub struct Frame {
    id: u64,
    pixels: Arc<RgbaImage>,
    colorkey: Option<Color>,
}

impl Frame {
    /// Wrap an RGBA buffer. `colorkey` records the color that was turned
    /// transparent, `None` when the buffer carries its own alpha.
    pub fn new(pixels: RgbaImage, colorkey: Option<Color>) -> Self {
        Self {
            id: NEXT_FRAME_ID.fetch_add(1, Ordering::Relaxed),
            pixels: Arc::new(pixels),
            colorkey,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn colorkey(&self) -> Option<Color> {
        self.colorkey
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(x, y)
    }
}

/// Turn every pixel matching `key` (RGB only) fully transparent and make the
/// rest opaque.
pub fn apply_colorkey(pixels: &mut RgbaImage, key: Color) {
    for px in pixels.pixels_mut() {
        let [r, g, b, _] = px.0;
        px.0[3] = if r == key.r && g == key.g && b == key.b {
            0
        } else {
            255
        };
    }
}

/// Largest frame, in pixels, that extraction will allocate.
pub const MAX_FRAME_PIXELS: u64 = 8192 * 8192;

fn within_budget(width: u64, height: u64) -> bool {
    width
        .checked_mul(height)
        .is_some_and(|pixels| pixels <= MAX_FRAME_PIXELS)
}

/// Validate the region and scale, returning the scaled size (truncated).
fn target_size(width: u32, height: u32, scale: f32) -> Result<(u32, u32), AssetError> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(AssetError::InvalidScale(scale));
    }
    if !within_budget(width as u64, height as u64) {
        return Err(AssetError::FrameTooLarge { width, height });
    }
    let scaled_w = width as f32 * scale;
    let scaled_h = height as f32 * scale;
    // `as u32` saturates, so reject before truncating
    if scaled_w >= u32::MAX as f32 || scaled_h >= u32::MAX as f32 {
        return Err(AssetError::InvalidScale(scale));
    }
    let (nw, nh) = (scaled_w as u32, scaled_h as u32);
    if !within_budget(nw as u64, nh as u64) {
        return Err(AssetError::InvalidScale(scale));
    }
    Ok((nw, nh))
}

fn rescale(pixels: RgbaImage, (nw, nh): (u32, u32)) -> RgbaImage {
    if pixels.dimensions() == (nw, nh) {
        return pixels;
    }
    if nw == 0 || nh == 0 {
        return RgbaImage::new(nw, nh);
    }
    imageops::resize(&pixels, nw, nh, FilterType::Nearest)
}

/// Copy the `width`x`height` region at (`x`, `y`) of `sheet` into `dst`.
/// Source pixels outside the sheet leave `dst` untouched.
fn copy_region(
    sheet: &RgbaImage,
    dst: &mut RgbaImage,
    x: i32,
    y: i32,
    blend: impl Fn(Rgba<u8>, Rgba<u8>) -> Rgba<u8>,
) {
    let (sw, sh) = sheet.dimensions();
    let (dw, dh) = dst.dimensions();
    for dy in 0..dh {
        let sy = y + dy as i32;
        if sy < 0 || sy >= sh as i32 {
            continue;
        }
        for dx in 0..dw {
            let sx = x + dx as i32;
            if sx < 0 || sx >= sw as i32 {
                continue;
            }
            let src = *sheet.get_pixel(sx as u32, sy as u32);
            let under = *dst.get_pixel(dx, dy);
            dst.put_pixel(dx, dy, blend(src, under));
        }
    }
}

/// Composite `src` over an opaque `dst`, dropping alpha.
fn over_opaque(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let a = src.0[3] as u32;
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
    Rgba([
        mix(src.0[0], dst.0[0]),
        mix(src.0[1], dst.0[1]),
        mix(src.0[2], dst.0[2]),
        255,
    ])
}

/// Cut a region out of `sheet` onto an opaque black canvas, apply the
/// optional colorkey, then scale.
///
/// Regions reaching past the sheet edge are padded with black (which the
/// colorkey turns transparent when it is black). Scaling truncates the
/// resulting size to whole pixels and uses nearest-neighbour sampling.
pub fn extract_frame(
    sheet: &Frame,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    colorkey: Option<Color>,
    scale: f32,
) -> Result<Frame, AssetError> {
    let size = target_size(width, height, scale)?;
    let mut pixels = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
    copy_region(sheet.pixels(), &mut pixels, x, y, over_opaque);
    if let Some(key) = colorkey {
        apply_colorkey(&mut pixels, key);
    }
    Ok(Frame::new(rescale(pixels, size), colorkey))
}

/// Like [`extract_frame`] but keeps the source alpha channel untouched and
/// never applies a colorkey. Used for artwork with soft edges.
pub fn extract_frame_alpha(
    sheet: &Frame,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    scale: f32,
) -> Result<Frame, AssetError> {
    let size = target_size(width, height, scale)?;
    let mut pixels = RgbaImage::new(width, height);
    copy_region(sheet.pixels(), &mut pixels, x, y, |src, _| src);
    Ok(Frame::new(rescale(pixels, size), None))
}
