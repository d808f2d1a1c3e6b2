//! Game loop driver and state-transition orchestrator.
//!
//! [`Control`] owns the save data, the screen registry, the active screen
//! and the game clock. Each tick of [`Control::run`]:
//!
//! 1. drains input: quit, the reserved display-mode keys, and mouse clicks,
//!    which stay visible to exactly one update;
//! 2. advances the game clock (wall-clock ms × game-speed multiplier);
//! 3. switches screens when the active one is done;
//! 4. updates the active screen;
//! 5. clears the one-shot mouse state;
//! 6. presents the canvas, which also waits out the tick.
//!
//! Transitioning to [`EXIT`] stops the loop at once: the outgoing screen is
//! not cleaned up.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde_json::json;

use crate::constants::{BASE_FPS, CURRENT_TIME, EXIT, GAME_RATE, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::events::input::InputEvent;
use crate::platform::Platform;
use crate::resources::canvas::Canvas;
use crate::resources::gameinfo::{GameInfo, SaveOutcome};
use crate::resources::input::InputBindings;
use crate::resources::worldtime::WorldTime;
use crate::states::{Effects, MouseClick, MousePos, State, StateRegistry};

#[derive(Debug, Clone, PartialEq)]
pub enum ControlError {
    /// A transition or the start screen named a screen not in the registry.
    UnknownState { name: String },
    /// A screen raised `done` without naming a successor.
    NoNextState { from: String },
    /// The save's game-speed multiplier is not a positive number.
    InvalidGameRate(serde_json::Value),
    /// The loop was started before [`Control::setup_states`].
    NotSetUp,
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::UnknownState { name } => write!(f, "unknown state '{name}'"),
            ControlError::NoNextState { from } => {
                write!(f, "state '{from}' finished without a next state")
            }
            ControlError::InvalidGameRate(v) => write!(f, "invalid game rate {v}"),
            ControlError::NotSetUp => write!(f, "no states installed"),
        }
    }
}

impl std::error::Error for ControlError {}

/// Result of [`Control::flip_state`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The successor was [`EXIT`]; nothing was cleaned up or started.
    Exit,
    Switched { from: String, to: String },
}

/// Why [`Control::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    /// Window close requested.
    Quit,
    /// A screen transitioned to [`EXIT`].
    Exit,
}

fn lookup<'a>(
    registry: &'a mut StateRegistry,
    name: Option<&str>,
) -> Result<&'a mut Box<dyn State>, ControlError> {
    let name = name.ok_or(ControlError::NotSetUp)?;
    registry
        .get_mut(name)
        .ok_or_else(|| ControlError::UnknownState {
            name: name.to_string(),
        })
}

pub struct Control {
    game_info: GameInfo,
    save_path: PathBuf,
    save_outcome: SaveOutcome,
    registry: StateRegistry,
    state_name: Option<String>,
    current_time: f64,
    clock: WorldTime,
    mouse_pos: Option<MousePos>,
    mouse_click: MouseClick,
    bindings: InputBindings,
    fps: f64,
    done: bool,
    canvas: Canvas,
    effects: Effects,
}

impl Control {
    /// Load (or recover) the save at `save_path` and derive the tick rate
    /// from the default base rate.
    pub fn new(save_path: impl Into<PathBuf>) -> Result<Self, ControlError> {
        Self::with_base_fps(save_path, BASE_FPS)
    }

    pub fn with_base_fps(save_path: impl Into<PathBuf>, base_fps: f64) -> Result<Self, ControlError> {
        let save_path = save_path.into();
        let (mut game_info, save_outcome) =
            GameInfo::load_or_recover(&save_path, &GameInfo::defaults());
        let rate = match game_info.game_rate() {
            Some(rate) if rate.is_finite() && rate > 0.0 => rate,
            _ => {
                let raw = game_info
                    .get(GAME_RATE)
                    .cloned()
                    .unwrap_or(serde_json::Value::Null);
                return Err(ControlError::InvalidGameRate(raw));
            }
        };
        game_info.set(CURRENT_TIME, json!(0));
        let fps = base_fps * rate;
        info!("Game rate {} -> {} ticks per second", rate, fps);
        Ok(Self {
            game_info,
            save_path,
            save_outcome,
            registry: StateRegistry::default(),
            state_name: None,
            current_time: 0.0,
            clock: WorldTime::with_scale(rate),
            mouse_pos: None,
            mouse_click: MouseClick::default(),
            bindings: InputBindings::default(),
            fps,
            done: false,
            canvas: Canvas::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            effects: Effects::new(),
        })
    }

    /// Install the registry and start `start_state` with the current time
    /// and the full save data.
    pub fn setup_states(
        &mut self,
        registry: StateRegistry,
        start_state: &str,
    ) -> Result<(), ControlError> {
        if !registry.contains_key(start_state) {
            return Err(ControlError::UnknownState {
                name: start_state.to_string(),
            });
        }
        self.registry = registry;
        self.state_name = Some(start_state.to_string());
        info!("Starting in state '{}'", start_state);
        let state = lookup(&mut self.registry, self.state_name.as_deref())?;
        state.startup(self.current_time, self.game_info.clone(), &mut self.effects);
        Ok(())
    }

    /// Drain platform input for this tick.
    pub fn event_loop(&mut self, platform: &mut impl Platform) {
        for event in platform.poll_events() {
            match event {
                InputEvent::Quit => self.done = true,
                InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => {
                    if let Some(mode) = self.bindings.handle(&event) {
                        info!("Switching display mode to {:?}", mode);
                        platform.set_display_mode(mode);
                    }
                }
                InputEvent::MouseDown { pos, left, right } => {
                    self.mouse_pos = Some(pos);
                    self.mouse_click.left |= left;
                    self.mouse_click.right |= right;
                    debug!(
                        "click at ({:3}, {:3}) left={} right={}",
                        pos.0, pos.1, left, right
                    );
                }
            }
        }
        self.bindings.settle();
    }

    /// Advance the clock, switch screens if needed and update the active
    /// screen. Returns [`Stop::Exit`] when a screen transitioned to
    /// [`EXIT`].
    pub fn update(&mut self, platform: &mut impl Platform) -> Result<Option<Stop>, ControlError> {
        self.current_time = self.clock.advance_to(platform.ticks_ms());

        if lookup(&mut self.registry, self.state_name.as_deref())?.done() {
            if self.flip_state()? == Transition::Exit {
                return Ok(Some(Stop::Exit));
            }
            self.apply_effects(platform);
        }

        let state = lookup(&mut self.registry, self.state_name.as_deref())?;
        state.update(
            &mut self.canvas,
            self.current_time,
            self.mouse_pos,
            self.mouse_click,
        );
        self.mouse_pos = None;
        self.mouse_click = MouseClick::default();
        Ok(None)
    }

    /// Move from the active screen to its successor.
    ///
    /// With [`EXIT`] as successor nothing is touched. Otherwise the outgoing
    /// screen is cleaned up and its payload handed unmodified to the
    /// incoming screen's startup.
    pub fn flip_state(&mut self) -> Result<Transition, ControlError> {
        let from = self.state_name.clone().ok_or(ControlError::NotSetUp)?;
        let outgoing = lookup(&mut self.registry, Some(&from))?;
        let to = outgoing
            .next()
            .map(str::to_string)
            .ok_or_else(|| ControlError::NoNextState { from: from.clone() })?;
        if to == EXIT {
            info!("State '{}' requested exit", from);
            return Ok(Transition::Exit);
        }
        if !self.registry.contains_key(&to) {
            return Err(ControlError::UnknownState { name: to });
        }

        info!("Transitioning from {} to {}", from, to);
        let persist = lookup(&mut self.registry, Some(&from))?.cleanup();
        self.state_name = Some(to.clone());
        let incoming = lookup(&mut self.registry, Some(&to))?;
        incoming.startup(self.current_time, persist, &mut self.effects);
        Ok(Transition::Switched { from, to })
    }

    fn apply_effects(&mut self, platform: &mut impl Platform) {
        if let Some(caption) = self.effects.take_caption() {
            platform.set_caption(&caption);
        }
        for id in self.effects.drain_sounds() {
            platform.play_sound(&id);
        }
    }

    /// Run until quit or exit.
    pub fn run(&mut self, platform: &mut impl Platform) -> Result<Stop, ControlError> {
        if self.state_name.is_none() {
            return Err(ControlError::NotSetUp);
        }
        platform.set_tick_rate(self.fps);
        self.apply_effects(platform);
        while !self.done {
            self.event_loop(platform);
            if let Some(stop) = self.update(platform)? {
                return Ok(stop);
            }
            platform.present(&self.canvas);
        }
        info!("Quit requested");
        Ok(Stop::Quit)
    }

    pub fn game_info(&self) -> &GameInfo {
        &self.game_info
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    pub fn save_outcome(&self) -> &SaveOutcome {
        &self.save_outcome
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn state_name(&self) -> Option<&str> {
        self.state_name.as_deref()
    }

    pub fn state(&self) -> Option<&dyn State> {
        let name = self.state_name.as_deref()?;
        self.registry.get(name).map(|s| &**s)
    }

    pub fn mouse_pos(&self) -> Option<MousePos> {
        self.mouse_pos
    }

    pub fn mouse_click(&self) -> MouseClick {
        self.mouse_click
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }
}
