//! Fixed-resolution render target.
//!
//! The canvas is replayed into a texture at the logical resolution, which is
//! then scaled into the window. Windowed mode draws it 1:1; fullscreen draws
//! it letterboxed.

use raylib::ffi::{self, TextureFilter};
use raylib::prelude::*;

pub struct RenderTarget {
    /// The underlying raylib render texture.
    pub texture: RenderTexture2D,
    /// Logical render width in pixels.
    pub game_width: u32,
    /// Logical render height in pixels.
    pub game_height: u32,
}

impl RenderTarget {
    /// Create a render target at the logical resolution with point
    /// filtering.
    pub fn new(
        rl: &mut RaylibHandle,
        th: &RaylibThread,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        let texture = rl
            .load_render_texture(th, width, height)
            .map_err(|e| format!("Failed to create render texture: {}", e))?;
        unsafe {
            ffi::SetTextureFilter(texture.texture, TextureFilter::TEXTURE_FILTER_POINT as i32);
        }
        Ok(Self {
            texture,
            game_width: width,
            game_height: height,
        })
    }

    /// Source rectangle for drawing this texture.
    ///
    /// Negative height flips the Y axis, compensating for OpenGL's inverted
    /// texture coordinates.
    pub fn source_rect(&self) -> Rectangle {
        Rectangle {
            x: 0.0,
            y: 0.0,
            width: self.game_width as f32,
            height: -(self.game_height as f32),
        }
    }
}
