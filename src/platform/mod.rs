//! Window, clock, audio and presentation behind one trait.
//!
//! [`Control`](crate::control::Control) talks to the outside world only
//! through [`Platform`]. The game binary uses
//! [`RaylibPlatform`](raylib::RaylibPlatform); tests drive the loop with a
//! scripted implementation.
//!
//! # Submodules
//!
//! - [`raylib`] – raylib-backed window, render target, texture cache and
//!   audio bridge.

pub mod raylib;

use crate::events::input::InputEvent;
use crate::resources::canvas::Canvas;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Fullscreen,
    Windowed,
}

pub trait Platform {
    /// Drain input that arrived since the last call.
    fn poll_events(&mut self) -> Vec<InputEvent>;
    /// Wall-clock milliseconds since the platform started.
    fn ticks_ms(&self) -> f64;
    fn set_display_mode(&mut self, mode: DisplayMode);
    fn set_caption(&mut self, caption: &str);
    /// Fire a sound cue by id. Unknown ids are ignored.
    fn play_sound(&mut self, id: &str);
    /// Target ticks per second; [`present`](Platform::present) waits to
    /// honor it.
    fn set_tick_rate(&mut self, fps: f64);
    /// Show the canvas and wait out the rest of the tick.
    fn present(&mut self, canvas: &Canvas);
}
