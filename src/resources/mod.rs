//! Long-lived data shared by the loop, the screens and the platform.
//!
//! Overview
//! - `assettable` – name to image/animation table and the [`GameAssets`](assettable::GameAssets) handle
//! - `audio` – bridge and channels for the background audio thread
//! - `canvas` – draw-command surface handed to screens
//! - `gameconfig` – INI-backed window, timing and path settings
//! - `gameinfo` – persisted save data and its recovery policy
//! - `input` – reserved display-mode key bindings
//! - `rendertarget` – fixed-resolution framebuffer
//! - `texturestore` – GPU textures keyed by frame id
//! - `windowsize` – window dimensions and letterbox math
//! - `worldtime` – game clock scaled by the game-speed multiplier
pub mod assettable;
pub mod audio;
pub mod canvas;
pub mod gameconfig;
pub mod gameinfo;
pub mod input;
pub mod rendertarget;
pub mod texturestore;
pub mod windowsize;
pub mod worldtime;
