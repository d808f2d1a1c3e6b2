//! raylib-backed [`Platform`].
//!
//! Owns the window, the fixed-resolution [`RenderTarget`], the
//! [`TextureStore`] and, optionally, the [`AudioBridge`]. Canvas commands are
//! replayed into the render target, which is then scaled into the window
//! with letterboxing. Pacing is left to raylib's target FPS.

use log::{error, info, warn};
use raylib::ffi;
use raylib::prelude::*;

use crate::constants::{BLACK, SCREEN_HEIGHT, SCREEN_WIDTH, WHITE};
use crate::events::input::InputEvent;
use crate::platform::{DisplayMode, Platform};
use crate::resources::audio::AudioBridge;
use crate::resources::canvas::{Canvas, DrawCmd};
use crate::resources::gameconfig::GameConfig;
use crate::resources::rendertarget::RenderTarget;
use crate::resources::texturestore::TextureStore;
use crate::resources::windowsize::WindowSize;

pub struct RaylibPlatform {
    rl: RaylibHandle,
    thread: RaylibThread,
    target: RenderTarget,
    textures: TextureStore,
    audio: Option<AudioBridge>,
    /// Window size used when leaving fullscreen.
    windowed_size: (u32, u32),
    /// Keys reported down and not yet released.
    held: Vec<KeyboardKey>,
}

impl RaylibPlatform {
    /// Open the window described by `config`.
    pub fn new(config: &GameConfig, caption: &str) -> Result<Self, String> {
        let (w, h) = config.window_size();
        let (mut rl, thread) = raylib::init()
            .size(w as i32, h as i32)
            .title(caption)
            .build();
        // Disable ESC to exit
        rl.set_exit_key(None);
        rl.set_target_fps(config.base_fps.round().max(1.0) as u32);
        if let Some(icon) = config.icon_file() {
            match Image::load_image(&icon.to_string_lossy()) {
                Ok(image) => rl.set_window_icon(&image),
                Err(e) => warn!("Window icon {} not loaded: {}", icon.display(), e),
            }
        }

        let target = RenderTarget::new(&mut rl, &thread, SCREEN_WIDTH, SCREEN_HEIGHT)?;
        let mut platform = Self {
            rl,
            thread,
            target,
            textures: TextureStore::new(),
            audio: None,
            windowed_size: (w, h),
            held: Vec::new(),
        };
        if config.fullscreen {
            platform.set_display_mode(DisplayMode::Fullscreen);
        }
        Ok(platform)
    }

    /// Route sound cues through `bridge`.
    pub fn with_audio(mut self, bridge: AudioBridge) -> Self {
        self.audio = Some(bridge);
        self
    }

    /// Stop the audio thread. The window closes when `self` drops.
    pub fn shutdown(mut self) {
        if let Some(bridge) = self.audio.take() {
            bridge.shutdown();
        }
    }

    fn window_size(&self) -> WindowSize {
        WindowSize {
            w: self.rl.get_screen_width(),
            h: self.rl.get_screen_height(),
        }
    }

    fn enter_fullscreen(&mut self) {
        if self.rl.is_window_fullscreen() {
            return;
        }
        info!("Entering full screen mode");
        let monitor: i32 = unsafe { ffi::GetCurrentMonitor() };
        let monitor_width = unsafe { ffi::GetMonitorWidth(monitor) };
        let monitor_height = unsafe { ffi::GetMonitorHeight(monitor) };
        info!("Monitor dimensions: {}x{}", monitor_width, monitor_height);
        self.rl.set_window_size(monitor_width, monitor_height);
        self.rl.toggle_fullscreen();
        if self.rl.is_window_fullscreen() {
            info!("Full screen enabled");
        } else {
            error!("Failed to enable full screen");
        }
    }

    fn leave_fullscreen(&mut self) {
        if !self.rl.is_window_fullscreen() {
            return;
        }
        self.rl.toggle_fullscreen();
        let (w, h) = self.windowed_size;
        self.rl.set_window_size(w as i32, h as i32);
        self.rl.restore_window();
        if !self.rl.is_window_fullscreen() {
            info!("Full screen disabled");
        } else {
            error!("Failed to disable full screen");
        }
    }
}

impl Platform for RaylibPlatform {
    fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if self.rl.window_should_close() {
            events.push(InputEvent::Quit);
        }

        let rl = &self.rl;
        self.held.retain(|key| {
            let up = rl.is_key_up(*key);
            if up {
                events.push(InputEvent::KeyUp(*key));
            }
            !up
        });
        while let Some(key) = self.rl.get_key_pressed() {
            if !self.held.contains(&key) {
                self.held.push(key);
            }
            events.push(InputEvent::KeyDown(key));
        }

        let left = self
            .rl
            .is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT);
        let right = self
            .rl
            .is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_RIGHT);
        if left || right {
            let pos = self.window_size().window_to_game_pos(
                self.rl.get_mouse_position(),
                SCREEN_WIDTH,
                SCREEN_HEIGHT,
            );
            events.push(InputEvent::MouseDown { pos, left, right });
        }

        if let Some(audio) = &self.audio {
            audio.poll();
        }
        events
    }

    fn ticks_ms(&self) -> f64 {
        self.rl.get_time() * 1000.0
    }

    fn set_display_mode(&mut self, mode: DisplayMode) {
        match mode {
            DisplayMode::Fullscreen => self.enter_fullscreen(),
            DisplayMode::Windowed => self.leave_fullscreen(),
        }
    }

    fn set_caption(&mut self, caption: &str) {
        self.rl.set_window_title(&self.thread, caption);
    }

    fn play_sound(&mut self, id: &str) {
        if let Some(audio) = &self.audio {
            audio.play(id);
        }
    }

    fn set_tick_rate(&mut self, fps: f64) {
        self.rl.set_target_fps(fps.round().max(1.0) as u32);
    }

    fn present(&mut self, canvas: &Canvas) {
        for cmd in canvas.commands() {
            if let DrawCmd::Blit { frame, .. } = cmd {
                self.textures.prepare(&mut self.rl, &self.thread, frame);
            }
        }

        let window = self.window_size();
        let Self {
            rl,
            thread,
            target,
            textures,
            ..
        } = self;
        let (logical_w, logical_h) = canvas.size();
        let dest = window.letterbox(logical_w, logical_h);
        let source = target.source_rect();

        let mut d = rl.begin_drawing(thread);
        {
            let mut t = d.begin_texture_mode(thread, &mut target.texture);
            for cmd in canvas.commands() {
                match cmd {
                    DrawCmd::Fill(color) => t.clear_background(*color),
                    DrawCmd::Blit { frame, x, y } => {
                        if let Some(tex) = textures.get(frame.id()) {
                            t.draw_texture(tex, *x, *y, WHITE);
                        }
                    }
                }
            }
        }
        d.clear_background(BLACK);
        d.draw_texture_pro(&target.texture, source, dest, Vector2::zero(), 0.0, WHITE);
        drop(d);

        textures.end_frame();
    }
}
