//! Lawn Defense runtime core.
//!
//! The state-machine game loop, sprite animation and asset loading behind a
//! 2D lawn-defense game, exposed as a library for the game binary and the
//! integration tests.
//!
//! # Project Structure
//!
//! - [`components`] – frames, collision masks, rectangles, animated entities
//! - [`constants`] – identifiers, save keys, colors and default paths
//! - [`control`] – the loop driver and state-transition orchestrator
//! - [`events`] – input events and audio-thread messages
//! - [`platform`] – window, clock, audio and presentation behind a trait
//! - [`resources`] – asset table, save data, config, canvas and other shared data
//! - [`states`] – game screens and the state trait
//! - [`systems`] – asset loader and audio thread

pub mod components;
pub mod constants;
pub mod control;
pub mod events;
pub mod platform;
pub mod resources;
pub mod states;
pub mod systems;
