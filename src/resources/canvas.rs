//! Draw surface handed to states.
//!
//! States do not talk to the renderer directly. They record fills and blits
//! on a [`Canvas`]; the platform replays the command list when presenting.
//! The list persists between frames like a real surface would: a fill
//! discards everything drawn before it.

use raylib::prelude::Color;

use crate::components::frame::Frame;

#[derive(Debug, Clone)]
pub enum DrawCmd {
    Fill(Color),
    Blit { frame: Frame, x: i32, y: i32 },
}

#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    commands: Vec<DrawCmd>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Logical size; the platform scales this area into the window.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Cover the whole surface with `color`.
    pub fn fill(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCmd::Fill(color));
    }

    /// Draw `frame` with its top-left corner at `pos`.
    pub fn blit(&mut self, frame: &Frame, pos: (i32, i32)) {
        self.commands.push(DrawCmd::Blit {
            frame: frame.clone(),
            x: pos.0,
            y: pos.1,
        });
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }
}
