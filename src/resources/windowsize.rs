//! Window size and letterbox math.
//!
//! The game always renders at its logical 800x600 resolution. In fullscreen
//! the OS window is larger, so the logical image is scaled to fit with bars
//! on the sides or top and bottom, and mouse positions are mapped back.

use raylib::prelude::*;

/// Current window size in pixels.
///
/// This represents the actual OS window dimensions, not the game's internal
/// render resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl WindowSize {
    /// Largest uniform scale at which a `game_width`x`game_height` image
    /// fits inside the window.
    pub fn fit_scale(&self, game_width: u32, game_height: u32) -> f32 {
        let sx = self.w as f32 / game_width as f32;
        let sy = self.h as f32 / game_height as f32;
        sx.min(sy)
    }

    /// Centered destination rectangle for the logical image. The leftover
    /// window area forms bars on two opposite sides.
    pub fn letterbox(&self, game_width: u32, game_height: u32) -> Rectangle {
        let scale = self.fit_scale(game_width, game_height);
        let width = game_width as f32 * scale;
        let height = game_height as f32 * scale;
        Rectangle {
            x: (self.w as f32 - width) * 0.5,
            y: (self.h as f32 - height) * 0.5,
            width,
            height,
        }
    }

    /// Map a window-space position to logical screen coordinates, clamped to
    /// the game area. Positions over the bars land on the nearest edge.
    pub fn window_to_game_pos(&self, window_pos: Vector2, game_width: u32, game_height: u32) -> (i32, i32) {
        let dest = self.letterbox(game_width, game_height);
        let scale = self.fit_scale(game_width, game_height);
        let max_x = game_width.saturating_sub(1) as f32;
        let max_y = game_height.saturating_sub(1) as f32;
        (
            ((window_pos.x - dest.x) / scale).clamp(0.0, max_x) as i32,
            ((window_pos.y - dest.y) / scale).clamp(0.0, max_y) as i32,
        )
    }
}
