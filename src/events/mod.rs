//! Messages crossing component boundaries.
//!
//! Submodules:
//! - [`audio`] – commands and messages for the background audio thread
//! - [`input`] – raw input events reported by the platform
pub mod audio;
pub mod input;
