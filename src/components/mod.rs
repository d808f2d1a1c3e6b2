//! Sprite building blocks.
//!
//! Submodules overview:
//! - [`animated`] – looping frame animation with a per-frame collision mask
//! - [`frame`] – immutable RGBA frames plus crop, colorkey and scale helpers
//! - [`mask`] – per-pixel collision mask derived from a frame
//! - [`rect`] – integer rectangle, also the collision-rect JSON shape

pub mod animated;
pub mod frame;
pub mod mask;
pub mod rect;
