//! Timed informational screens.
//!
//! A [`TimedScreen`] shows one full-screen image over a white background for
//! `end_time` milliseconds of game time, then raises `done`. The victory and
//! lose screens are the same type with a different [`ScreenKind`]: they differ
//! only in image, caption and the sound cues fired on entry.

use log::debug;

use crate::components::frame::{Frame, extract_frame};
use crate::constants::{
    BLACK, GAME_LOSE_IMAGE, GAME_VICTORY_IMAGE, LEVEL, ORIGINAL_CAPTION, SCREEN_HEIGHT,
    SCREEN_WIDTH, SOUND_LOSE, SOUND_SCREAM, SOUND_WIN, WHITE,
};
use crate::resources::assettable::{AssetError, AssetTable};
use crate::resources::canvas::Canvas;
use crate::resources::gameinfo::GameInfo;
use crate::states::{Effects, MouseClick, MousePos, State, StateCore};

/// Display time in milliseconds of game time.
pub const DEFAULT_END_TIME: f64 = 3000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Victory,
    Lose,
}

impl ScreenKind {
    pub fn image_name(self) -> &'static str {
        match self {
            ScreenKind::Victory => GAME_VICTORY_IMAGE,
            ScreenKind::Lose => GAME_LOSE_IMAGE,
        }
    }

    pub fn caption(self) -> String {
        match self {
            ScreenKind::Victory => format!("{ORIGINAL_CAPTION}: Victory!"),
            ScreenKind::Lose => format!("{ORIGINAL_CAPTION}: Defeat!"),
        }
    }

    /// Cues fired together on entry.
    pub fn sounds(self) -> &'static [&'static str] {
        match self {
            ScreenKind::Victory => &[SOUND_WIN],
            ScreenKind::Lose => &[SOUND_LOSE, SOUND_SCREAM],
        }
    }
}

#[derive(Debug, Clone)]
pub struct TimedScreen {
    core: StateCore,
    kind: ScreenKind,
    image: Frame,
    end_time: f64,
}

impl TimedScreen {
    /// Build the screen, cutting its image out of the asset table.
    pub fn new(kind: ScreenKind, assets: &AssetTable) -> Result<Self, AssetError> {
        let sheet = assets.image(kind.image_name())?;
        let image = extract_frame(sheet, 0, 0, SCREEN_WIDTH, SCREEN_HEIGHT, Some(BLACK), 1.0)?;
        Ok(Self {
            core: StateCore::with_next(LEVEL),
            kind,
            image,
            end_time: DEFAULT_END_TIME,
        })
    }

    pub fn victory(assets: &AssetTable) -> Result<Self, AssetError> {
        Self::new(ScreenKind::Victory, assets)
    }

    pub fn lose(assets: &AssetTable) -> Result<Self, AssetError> {
        Self::new(ScreenKind::Lose, assets)
    }

    /// Screen to go to when the time is up.
    pub fn with_next(mut self, next: impl Into<String>) -> Self {
        self.core.next = Some(next.into());
        self
    }

    pub fn with_end_time(mut self, end_time: f64) -> Self {
        self.end_time = end_time;
        self
    }

    pub fn kind(&self) -> ScreenKind {
        self.kind
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn image(&self) -> &Frame {
        &self.image
    }
}

impl State for TimedScreen {
    fn core(&self) -> &StateCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut StateCore {
        &mut self.core
    }

    fn startup(&mut self, current_time: f64, persist: GameInfo, effects: &mut Effects) {
        if !self.core.begin(current_time, persist) {
            return;
        }
        debug!("{:?} screen shown at {}", self.kind, current_time);
        effects.set_caption(self.kind.caption());
        for id in self.kind.sounds() {
            effects.play_sound(*id);
        }
    }

    fn update(
        &mut self,
        surface: &mut Canvas,
        current_time: f64,
        _mouse_pos: Option<MousePos>,
        _mouse_click: MouseClick,
    ) {
        self.core.current_time = current_time;
        if current_time - self.core.start_time < self.end_time {
            surface.fill(WHITE);
            surface.blit(&self.image, (0, 0));
        } else {
            self.core.done = true;
        }
    }
}
