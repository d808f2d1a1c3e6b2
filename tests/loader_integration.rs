//! Loader integration tests: asset trees on disk into asset tables.

use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage, Rgba, RgbaImage};

use lawndefense::components::animated::AnimatedEntity;
use lawndefense::components::rect::Rect;
use lawndefense::constants::{PLANT_IMAGE_RECT, WHITE, ZOMBIE_IMAGE_RECT};
use lawndefense::resources::assettable::{Asset, AssetError};
use lawndefense::systems::loader::{
    load_all_graphics_default, load_collision_rects, load_game_assets, load_image_frames,
};

/// Opaque RGBA image `width` pixels wide and one pixel high.
fn write_rgba(path: &Path, width: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbaImage::from_pixel(width, 1, Rgba([200, 40, 40, 255]))
        .save(path)
        .unwrap();
}

fn write_frames(dir: &Path, name: &str, indices: &[u32]) {
    for &i in indices {
        write_rgba(&dir.join(format!("{name}_{i}.png")), i + 1);
    }
}

// =============================================================================
// Animation folders
// =============================================================================

#[test]
fn contiguous_frames_load_in_index_order() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("Plants").join("Foo");
    // written out of order on purpose
    write_frames(&dir, "Foo", &[3, 0, 4, 1, 2]);

    let table = load_all_graphics_default(root.path()).unwrap();
    let frames = table.frames("Foo").unwrap();
    assert_eq!(frames.len(), 5);
    let widths: Vec<u32> = frames.iter().map(|f| f.width()).collect();
    assert_eq!(widths, vec![1, 2, 3, 4, 5]);
}

#[test]
fn gap_in_frame_indices_fails() {
    let root = tempfile::tempdir().unwrap();
    write_frames(&root.path().join("Plants").join("Foo"), "Foo", &[0, 2]);

    let err = load_all_graphics_default(root.path()).unwrap_err();
    match err {
        AssetError::NonContiguousFrameIndex { name, missing, .. } => {
            assert_eq!(name, "Foo");
            assert_eq!(missing, 1);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn frames_not_starting_at_zero_fail() {
    let root = tempfile::tempdir().unwrap();
    write_frames(&root.path().join("Plants").join("Foo"), "Foo", &[1, 2]);
    let err = load_all_graphics_default(root.path()).unwrap_err();
    assert!(matches!(err, AssetError::NonContiguousFrameIndex { missing: 0, .. }));
}

#[test]
fn nested_folders_yield_one_animation_each() {
    let root = tempfile::tempdir().unwrap();
    let zombie = root.path().join("Zombies").join("ConeheadZombie");
    write_frames(&zombie.join("ConeheadZombieAttack"), "ConeheadZombieAttack", &[0, 1]);
    write_frames(&zombie.join("ConeheadZombieDie"), "ConeheadZombieDie", &[0, 1, 2]);

    let table = load_all_graphics_default(root.path()).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.frames("ConeheadZombieAttack").unwrap().len(), 2);
    assert_eq!(table.frames("ConeheadZombieDie").unwrap().len(), 3);
    assert!(!table.contains("ConeheadZombie"));
}

#[test]
fn loose_images_next_to_animation_folders_are_ignored() {
    let root = tempfile::tempdir().unwrap();
    let zombie = root.path().join("Zombies").join("Zombie");
    write_frames(&zombie.join("ZombieWalk"), "ZombieWalk", &[0]);
    write_rgba(&zombie.join("stray.png"), 2);

    let table = load_all_graphics_default(root.path()).unwrap();
    assert_eq!(table.names(), vec!["ZombieWalk"]);
}

#[test]
fn non_image_files_are_skipped() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("Plants").join("Foo");
    write_frames(&dir, "Foo", &[0, 1]);
    fs::write(dir.join("notes.txt"), "frame timing").unwrap();
    fs::write(dir.join("Thumbs.db"), [0u8; 4]).unwrap();

    let table = load_all_graphics_default(root.path()).unwrap();
    assert_eq!(table.frames("Foo").unwrap().len(), 2);
}

#[test]
fn badly_named_frame_fails() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("Plants").join("Foo");
    write_frames(&dir, "Foo", &[0]);
    write_rgba(&dir.join("Bar_1.png"), 1);

    let err = load_all_graphics_default(root.path()).unwrap_err();
    assert!(matches!(err, AssetError::BadFrameName { .. }));
}

#[test]
fn empty_animation_folder_fails() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir_all(root.path().join("Plants").join("Foo")).unwrap();
    let err = load_all_graphics_default(root.path()).unwrap_err();
    assert!(matches!(err, AssetError::EmptyAnimation { ref name } if name == "Foo"));
}

#[test]
fn duplicate_index_with_different_extension_fails() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("Plants").join("Foo");
    write_frames(&dir, "Foo", &[0]);
    RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255]))
        .save(dir.join("Foo_0.bmp"))
        .unwrap();

    let err = load_image_frames(&dir, "Foo", WHITE, &["png", "bmp"]).unwrap_err();
    assert!(matches!(err, AssetError::DuplicateFrameIndex { index: 0, .. }));
}

#[test]
fn duplicate_asset_names_across_categories_fail() {
    let root = tempfile::tempdir().unwrap();
    write_frames(&root.path().join("Plants").join("Foo"), "Foo", &[0]);
    write_frames(&root.path().join("Cards").join("Foo"), "Foo", &[0]);

    let err = load_all_graphics_default(root.path()).unwrap_err();
    assert!(matches!(err, AssetError::DuplicateAsset { ref name } if name == "Foo"));
}

// =============================================================================
// Still images and transparency
// =============================================================================

#[test]
fn opaque_image_gets_white_colorkey() {
    let root = tempfile::tempdir().unwrap();
    let path = root.path().join("Screen").join("GameVictory.png");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut img = RgbImage::from_pixel(2, 1, Rgb([255, 255, 255]));
    img.put_pixel(1, 0, Rgb([10, 200, 10]));
    img.save(&path).unwrap();

    let table = load_all_graphics_default(root.path()).unwrap();
    let frame = table.image("GameVictory").unwrap();
    assert_eq!(frame.colorkey().map(|c| (c.r, c.g, c.b)), Some((255, 255, 255)));
    assert_eq!(frame.pixel(0, 0).0[3], 0);
    assert_eq!(frame.pixel(1, 0).0[3], 255);
}

#[test]
fn image_with_alpha_keeps_it() {
    let root = tempfile::tempdir().unwrap();
    let path = root.path().join("Screen").join("Glow.png");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut img = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 255]));
    img.put_pixel(1, 0, Rgba([255, 255, 0, 90]));
    img.save(&path).unwrap();

    let table = load_all_graphics_default(root.path()).unwrap();
    let frame = table.image("Glow").unwrap();
    assert!(frame.colorkey().is_none());
    // white stays opaque: no colorkey on alpha images
    assert_eq!(frame.pixel(0, 0).0[3], 255);
    assert_eq!(frame.pixel(1, 0).0[3], 90);
}

#[test]
fn root_level_files_are_ignored() {
    let root = tempfile::tempdir().unwrap();
    write_rgba(&root.path().join("Loose.png"), 3);
    write_frames(&root.path().join("Plants").join("Foo"), "Foo", &[0]);

    let table = load_all_graphics_default(root.path()).unwrap();
    assert!(!table.contains("Loose"));
    assert!(matches!(table.get("Foo").unwrap(), Asset::Animation(_)));
}

#[test]
fn missing_root_is_an_io_error() {
    let root = tempfile::tempdir().unwrap();
    let err = load_all_graphics_default(&root.path().join("nope")).unwrap_err();
    assert!(matches!(err, AssetError::Io { .. }));
}

// =============================================================================
// Collision rects
// =============================================================================

#[test]
fn collision_rects_accept_array_and_object_forms() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zombie.json");
    fs::write(
        &path,
        r#"{"ZOMBIE_IMAGE_RECT": {
            "Zombie": {"x": 62, "width": 90},
            "ConeheadZombie": [1, 2, 3, 4]
        }}"#,
    )
    .unwrap();

    let rects = load_collision_rects(&path, ZOMBIE_IMAGE_RECT).unwrap();
    assert_eq!(rects.len(), 2);
    assert_eq!(rects["Zombie"], Rect::new(62, 0, 90, 0));
    assert_eq!(rects["ConeheadZombie"], Rect::new(1, 2, 3, 4));
}

#[test]
fn collision_rects_missing_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plant.json");
    fs::write(&path, r#"{"SOMETHING_ELSE": {}}"#).unwrap();

    let err = load_collision_rects(&path, PLANT_IMAGE_RECT).unwrap_err();
    assert!(matches!(err, AssetError::MissingKey { ref key, .. } if key == PLANT_IMAGE_RECT));
}

#[test]
fn collision_rects_malformed_json_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plant.json");
    fs::write(&path, "{ not json").unwrap();
    let err = load_collision_rects(&path, PLANT_IMAGE_RECT).unwrap_err();
    assert!(matches!(err, AssetError::Json { .. }));
}

// =============================================================================
// Whole startup load
// =============================================================================

#[test]
fn game_assets_feed_animated_entities() {
    let root = tempfile::tempdir().unwrap();
    let gfx = root.path().join("graphics");
    write_frames(&gfx.join("Plants").join("Peashooter"), "Peashooter", &[0, 1, 2]);
    let zombie = root.path().join("zombie.json");
    let plant = root.path().join("plant.json");
    fs::write(&zombie, r#"{"ZOMBIE_IMAGE_RECT": {}}"#).unwrap();
    fs::write(&plant, r#"{"PLANT_IMAGE_RECT": {"Peashooter": [0, 0, 3, 1]}}"#).unwrap();

    let assets = load_game_assets(&gfx, &zombie, &plant).unwrap();
    assert!(assets.zombie_rects.is_empty());
    assert_eq!(assets.plant_rects["Peashooter"], Rect::new(0, 0, 3, 1));

    let mut pea = AnimatedEntity::new(&assets.graphics, "Peashooter", 0, 1.0).unwrap();
    let start = pea.frame_index();
    for n in 1..=7 {
        pea.update();
        assert_eq!(pea.frame_index(), (start + n) % 3);
    }
    assert_eq!(pea.image().width() as usize, pea.frame_index() + 1);
}
