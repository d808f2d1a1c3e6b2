//! Raw input events.
//!
//! The platform layer translates whatever its window system reports into
//! [`InputEvent`]s, and [`Control`](crate::control::Control) consumes them
//! once per tick. Only the events the game loop reacts to are modelled.

use raylib::prelude::KeyboardKey;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Window close requested.
    Quit,
    KeyDown(KeyboardKey),
    KeyUp(KeyboardKey),
    /// Mouse button pressed at `pos`, in logical screen coordinates.
    MouseDown {
        pos: (i32, i32),
        left: bool,
        right: bool,
    },
}
