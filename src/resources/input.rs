//! Reserved key bindings.
//!
//! Two keys are handled by the engine itself rather than by states: one
//! switches to fullscreen, the other back to a window. [`InputBindings`]
//! holds them together with their per-tick key state so the platform can
//! report transitions.

use raylib::prelude::KeyboardKey;

use crate::events::input::InputEvent;
use crate::platform::DisplayMode;

#[derive(Debug, Clone, Copy)]
/// Boolean key state with an associated keyboard binding.
pub struct BoolState {
    /// Whether the key is currently held.
    pub active: bool,
    /// Whether the key was pressed this tick.
    pub just_pressed: bool,
    /// Whether the key was released this tick.
    pub just_released: bool,

    /// The key bound to this action.
    pub key_binding: KeyboardKey,
}

impl BoolState {
    pub fn bound_to(key_binding: KeyboardKey) -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_binding,
        }
    }

    /// Clear the one-tick edge flags.
    pub fn settle(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
    }

    /// Update from an input event; returns true when the event concerned
    /// this binding.
    pub fn apply(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::KeyDown(key) if key == self.key_binding => {
                self.just_pressed = !self.active;
                self.active = true;
                true
            }
            InputEvent::KeyUp(key) if key == self.key_binding => {
                self.just_released = self.active;
                self.active = false;
                true
            }
            _ => false,
        }
    }
}

impl Default for BoolState {
    fn default() -> Self {
        Self::bound_to(KeyboardKey::KEY_NULL)
    }
}

/// The engine-level shortcuts.
#[derive(Debug, Clone)]
pub struct InputBindings {
    pub fullscreen: BoolState,
    pub windowed: BoolState,
}

impl Default for InputBindings {
    fn default() -> Self {
        Self {
            fullscreen: BoolState::bound_to(KeyboardKey::KEY_F),
            windowed: BoolState::bound_to(KeyboardKey::KEY_U),
        }
    }
}

impl InputBindings {
    /// Feed one event; returns the display mode to switch to, if the event
    /// pressed one of the reserved keys.
    pub fn handle(&mut self, event: &InputEvent) -> Option<DisplayMode> {
        if self.fullscreen.apply(event) && self.fullscreen.just_pressed {
            return Some(DisplayMode::Fullscreen);
        }
        if self.windowed.apply(event) && self.windowed.just_pressed {
            return Some(DisplayMode::Windowed);
        }
        None
    }

    pub fn settle(&mut self) {
        self.fullscreen.settle();
        self.windowed.settle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_keys_map_to_display_modes() {
        let mut bindings = InputBindings::default();
        assert_eq!(
            bindings.handle(&InputEvent::KeyDown(KeyboardKey::KEY_F)),
            Some(DisplayMode::Fullscreen)
        );
        assert_eq!(
            bindings.handle(&InputEvent::KeyDown(KeyboardKey::KEY_U)),
            Some(DisplayMode::Windowed)
        );
        assert_eq!(bindings.handle(&InputEvent::KeyDown(KeyboardKey::KEY_A)), None);
    }

    #[test]
    fn test_held_key_does_not_retrigger() {
        let mut bindings = InputBindings::default();
        let down = InputEvent::KeyDown(KeyboardKey::KEY_F);
        assert!(bindings.handle(&down).is_some());
        bindings.settle();
        assert!(bindings.handle(&down).is_none());
        bindings.handle(&InputEvent::KeyUp(KeyboardKey::KEY_F));
        assert!(bindings.fullscreen.just_released);
        bindings.settle();
        assert!(bindings.handle(&down).is_some());
    }
}
