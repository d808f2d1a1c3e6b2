//! GPU texture cache keyed by frame id.
//!
//! Frames live on the CPU side; the first time one is presented its pixels
//! are uploaded and the texture is kept under the frame's id. Uploads happen
//! in [`TextureStore::prepare`] before drawing starts, since drawing holds
//! the raylib handle. Textures not drawn for [`EVICT_AFTER`] presents are
//! released.

use std::io::Cursor;

use image::ImageFormat;
use log::{debug, warn};
use raylib::prelude::*;
use rustc_hash::FxHashMap;

use crate::components::frame::Frame;

/// Presents a texture may go unused before it is dropped.
pub const EVICT_AFTER: u64 = 600;

struct Entry {
    texture: Texture2D,
    last_used: u64,
}

#[derive(Default)]
pub struct TextureStore {
    map: FxHashMap<u64, Entry>,
    generation: u64,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `frame` has a texture, uploading it on first use. Returns
    /// false when the upload failed; the failure is logged.
    pub fn prepare(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread, frame: &Frame) -> bool {
        let generation = self.generation;
        if let Some(entry) = self.map.get_mut(&frame.id()) {
            entry.last_used = generation;
            return true;
        }
        let Some(texture) = upload(rl, thread, frame) else {
            return false;
        };
        debug!(
            "uploaded frame {} ({}x{})",
            frame.id(),
            frame.width(),
            frame.height()
        );
        self.map.insert(
            frame.id(),
            Entry {
                texture,
                last_used: generation,
            },
        );
        true
    }

    pub fn get(&self, frame_id: u64) -> Option<&Texture2D> {
        self.map.get(&frame_id).map(|e| &e.texture)
    }

    /// Mark the end of a present and drop stale textures.
    pub fn end_frame(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        self.map
            .retain(|_, e| generation.saturating_sub(e.last_used) <= EVICT_AFTER);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn upload(rl: &mut RaylibHandle, thread: &RaylibThread, frame: &Frame) -> Option<Texture2D> {
    if frame.width() == 0 || frame.height() == 0 {
        return None;
    }
    let mut png = Cursor::new(Vec::new());
    if let Err(e) = frame.pixels().write_to(&mut png, ImageFormat::Png) {
        warn!("Failed to encode frame {}: {}", frame.id(), e);
        return None;
    }
    let image = match Image::load_image_from_mem(".png", png.get_ref()) {
        Ok(image) => image,
        Err(e) => {
            warn!("Failed to stage frame {}: {}", frame.id(), e);
            return None;
        }
    };
    match rl.load_texture_from_image(thread, &image) {
        Ok(texture) => Some(texture),
        Err(e) => {
            warn!("Failed to upload frame {}: {}", frame.id(), e);
            None
        }
    }
}
