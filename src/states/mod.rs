//! Game screens as finite-state-machine states.
//!
//! Every screen implements [`State`]. [`Control`](crate::control::Control)
//! keeps one boxed instance per screen in a [`StateRegistry`] and drives the
//! active one through its lifecycle:
//!
//! 1. [`State::startup`] once per transition into the screen. It receives
//!    the current game time and the `persist` payload handed over by the
//!    previous screen, and may request window or sound side effects through
//!    [`Effects`].
//! 2. [`State::update`] once per tick while active. It draws onto the canvas
//!    and raises `done` when the screen wants to leave.
//! 3. [`State::cleanup`] once on the way out. It clears `done` and gives the
//!    `persist` payload back for the next screen.
//!
//! The transient per-visit fields shared by every screen live in
//! [`StateCore`].
//!
//! # Submodules
//!
//! - [`screen`] – timed informational screens (victory, lose)

pub mod screen;

use std::mem;

use log::warn;
use rustc_hash::FxHashMap;

use crate::resources::canvas::Canvas;
use crate::resources::gameinfo::GameInfo;

/// Mouse position in logical screen coordinates.
pub type MousePos = (i32, i32);

/// Mouse buttons pressed since the previous update. Valid for one update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseClick {
    pub left: bool,
    pub right: bool,
}

impl MouseClick {
    pub fn any(&self) -> bool {
        self.left || self.right
    }
}

/// Per-visit bookkeeping common to all screens.
#[derive(Debug, Clone, Default)]
pub struct StateCore {
    pub start_time: f64,
    pub current_time: f64,
    pub done: bool,
    /// Successor identifier; `None` until the screen decides.
    pub next: Option<String>,
    pub persist: GameInfo,
    active: bool,
}

impl StateCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_next(next: impl Into<String>) -> Self {
        Self {
            next: Some(next.into()),
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enter the screen. Returns false, changing nothing, when the screen
    /// is already active.
    pub fn begin(&mut self, current_time: f64, persist: GameInfo) -> bool {
        if self.active {
            warn!("startup on an already active state ignored");
            return false;
        }
        self.active = true;
        self.done = false;
        self.start_time = current_time;
        self.current_time = current_time;
        self.persist = persist;
        true
    }

    /// Leave the screen, handing back the persist payload.
    pub fn finish(&mut self) -> GameInfo {
        self.done = false;
        self.active = false;
        mem::take(&mut self.persist)
    }

    /// Game time spent in this visit.
    pub fn elapsed(&self) -> f64 {
        self.current_time - self.start_time
    }
}

/// Side effects a screen asks for on startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    caption: Option<String>,
    sounds: Vec<String>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = Some(caption.into());
    }

    pub fn play_sound(&mut self, id: impl Into<String>) {
        self.sounds.push(id.into());
    }

    pub fn take_caption(&mut self) -> Option<String> {
        self.caption.take()
    }

    pub fn drain_sounds(&mut self) -> Vec<String> {
        mem::take(&mut self.sounds)
    }

    pub fn is_empty(&self) -> bool {
        self.caption.is_none() && self.sounds.is_empty()
    }
}

pub trait State {
    fn core(&self) -> &StateCore;
    fn core_mut(&mut self) -> &mut StateCore;

    /// Called once per transition into this state. Redundant calls while
    /// active are ignored.
    fn startup(&mut self, current_time: f64, persist: GameInfo, effects: &mut Effects);

    /// Called once per tick while active.
    fn update(
        &mut self,
        surface: &mut Canvas,
        current_time: f64,
        mouse_pos: Option<MousePos>,
        mouse_click: MouseClick,
    );

    /// Called once when transitioning out. Resets `done` and returns the
    /// payload for the next state.
    fn cleanup(&mut self) -> GameInfo {
        self.core_mut().finish()
    }

    fn done(&self) -> bool {
        self.core().done
    }

    fn next(&self) -> Option<&str> {
        self.core().next.as_deref()
    }
}

/// Screen identifier to screen.
pub type StateRegistry = FxHashMap<String, Box<dyn State>>;
