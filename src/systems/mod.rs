//! Startup and background work.
//!
//! Submodules overview
//! - [`audio`] – the dedicated audio thread and its channel bookkeeping
//! - [`loader`] – walk the graphics tree into an asset table and read the
//!   collision-rect tables

pub mod audio;
pub mod loader;
