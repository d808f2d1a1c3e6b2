//! Looping frame animation with a per-frame collision mask.
//!
//! An [`AnimatedEntity`] takes its frames from the asset table once, at
//! construction, scaled and colorkeyed against black. Every
//! [`update`](AnimatedEntity::update) advances one frame, wrapping at the
//! end, and recomputes the visible image and its mask. There is no terminal
//! frame; [`pause`](AnimatedEntity::pause) is the only way to hold one.

use crate::components::frame::{Frame, extract_frame};
use crate::components::mask::Mask;
use crate::components::rect::Rect;
use crate::constants::BLACK;
use crate::resources::assettable::{AssetError, AssetTable};
use crate::resources::canvas::Canvas;

#[derive(Debug, Clone)]
pub struct AnimatedEntity {
    name: String,
    /// Consumer-defined tag, e.g. an equipment slot.
    index: usize,
    frames: Vec<Frame>,
    frame_index: usize,
    image: Frame,
    mask: Mask,
    position: (i32, i32),
    paused: bool,
}

impl AnimatedEntity {
    pub fn new(
        assets: &AssetTable,
        name: &str,
        index: usize,
        scale: f32,
    ) -> Result<Self, AssetError> {
        let source = assets.frames(name)?;
        if source.is_empty() {
            return Err(AssetError::EmptyAnimation {
                name: name.to_string(),
            });
        }
        let frames = source
            .iter()
            .map(|f| extract_frame(f, 0, 0, f.width(), f.height(), Some(BLACK), scale))
            .collect::<Result<Vec<_>, _>>()?;
        let image = frames[0].clone();
        let mask = Mask::from_frame(&image);
        Ok(Self {
            name: name.to_string(),
            index,
            frames,
            frame_index: 0,
            image,
            mask,
            position: (0, 0),
            paused: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Currently visible frame.
    pub fn image(&self) -> &Frame {
        &self.image
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.position = (x, y);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Jump to `index` (wrapped into range) and refresh image and mask.
    pub fn set_frame_index(&mut self, index: usize) {
        self.frame_index = index % self.frames.len();
        self.refresh();
    }

    /// Advance one frame. Does nothing while paused.
    pub fn update(&mut self) {
        if self.paused {
            return;
        }
        self.frame_index = (self.frame_index + 1) % self.frames.len();
        self.refresh();
    }

    fn refresh(&mut self) {
        self.image = self.frames[self.frame_index].clone();
        self.mask = Mask::from_frame(&self.image);
    }

    /// Bounds of the visible frame at the current position.
    pub fn rect(&self) -> Rect {
        let (w, h) = self.image.size();
        Rect::new(self.position.0, self.position.1, w as i32, h as i32)
    }

    /// Pixel-exact overlap test against another entity.
    pub fn collides_with(&self, other: &AnimatedEntity) -> bool {
        if !self.rect().intersects(&other.rect()) {
            return false;
        }
        let offset = (
            other.position.0 - self.position.0,
            other.position.1 - self.position.1,
        );
        self.mask.overlap(&other.mask, offset).is_some()
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        canvas.blit(&self.image, self.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::assettable::{AnimationSequence, Asset};
    use image::{Rgba, RgbaImage};

    /// Frame `i` is `i + 1` pixels wide so frames are easy to tell apart.
    fn table_with(name: &str, count: u32) -> AssetTable {
        let frames = (0..count)
            .map(|i| Frame::new(RgbaImage::from_pixel(i + 1, 2, Rgba([200, 0, 0, 255])), None))
            .collect();
        let mut table = AssetTable::new();
        table
            .insert(name, Asset::Animation(AnimationSequence::from_frames(frames)))
            .unwrap();
        table
    }

    #[test]
    fn test_new_starts_on_first_frame() {
        let table = table_with("Walk", 3);
        let entity = AnimatedEntity::new(&table, "Walk", 2, 1.0).unwrap();
        assert_eq!(entity.frame_count(), 3);
        assert_eq!(entity.frame_index(), 0);
        assert_eq!(entity.index(), 2);
        assert_eq!(entity.image().width(), 1);
        assert_eq!(entity.mask().count(), 2);
    }

    #[test]
    fn test_update_wraps_modulo_frame_count() {
        let table = table_with("Walk", 5);
        let mut entity = AnimatedEntity::new(&table, "Walk", 0, 1.0).unwrap();
        for n in 1..=17usize {
            entity.update();
            assert_eq!(entity.frame_index(), n % 5);
            assert_eq!(entity.image().width() as usize, n % 5 + 1);
            assert_eq!(entity.mask().count(), (n % 5 + 1) * 2);
        }
    }

    #[test]
    fn test_update_from_any_start_index() {
        let table = table_with("Walk", 4);
        for start in 0..4usize {
            let mut entity = AnimatedEntity::new(&table, "Walk", 0, 1.0).unwrap();
            entity.set_frame_index(start);
            for _ in 0..10 {
                entity.update();
            }
            assert_eq!(entity.frame_index(), (start + 10) % 4);
        }
    }

    #[test]
    fn test_pause_holds_frame() {
        let table = table_with("Walk", 3);
        let mut entity = AnimatedEntity::new(&table, "Walk", 0, 1.0).unwrap();
        entity.update();
        entity.pause();
        entity.update();
        assert_eq!(entity.frame_index(), 1);
        entity.resume();
        entity.update();
        assert_eq!(entity.frame_index(), 2);
    }

    #[test]
    fn test_scale_applies_once() {
        let table = table_with("Walk", 2);
        let entity = AnimatedEntity::new(&table, "Walk", 0, 2.0).unwrap();
        assert_eq!(entity.image().size(), (2, 4));
    }

    #[test]
    fn test_unknown_asset() {
        let table = table_with("Walk", 2);
        let err = AnimatedEntity::new(&table, "Run", 0, 1.0).unwrap_err();
        assert!(matches!(err, AssetError::AssetNotFound { .. }));
    }

    #[test]
    fn test_empty_animation() {
        let mut table = AssetTable::new();
        table
            .insert("Nothing", Asset::Animation(AnimationSequence::from_frames(Vec::new())))
            .unwrap();
        let err = AnimatedEntity::new(&table, "Nothing", 0, 1.0).unwrap_err();
        assert!(matches!(err, AssetError::EmptyAnimation { .. }));
    }

    #[test]
    fn test_single_image_is_one_frame_animation() {
        let mut table = AssetTable::new();
        table
            .insert("Sun", Asset::Image(Frame::new(RgbaImage::new(3, 3), None)))
            .unwrap();
        let mut entity = AnimatedEntity::new(&table, "Sun", 0, 1.0).unwrap();
        entity.update();
        assert_eq!(entity.frame_count(), 1);
        assert_eq!(entity.frame_index(), 0);
    }

    #[test]
    fn test_collides_with_uses_masks() {
        let table = table_with("Walk", 1);
        let mut a = AnimatedEntity::new(&table, "Walk", 0, 4.0).unwrap();
        let mut b = AnimatedEntity::new(&table, "Walk", 1, 4.0).unwrap();
        a.set_position(0, 0);
        b.set_position(3, 7);
        assert!(a.collides_with(&b));
        b.set_position(4, 0);
        assert!(!a.collides_with(&b));
    }

    #[test]
    fn test_draw_blits_current_frame_at_position() {
        let table = table_with("Walk", 2);
        let mut entity = AnimatedEntity::new(&table, "Walk", 0, 1.0).unwrap();
        entity.set_position(10, 20);
        let mut canvas = Canvas::new(800, 600);
        entity.draw(&mut canvas);
        assert_eq!(canvas.commands().len(), 1);
    }
}
