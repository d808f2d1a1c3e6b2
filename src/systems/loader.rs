//! Asset directory loader.
//!
//! Builds the [`AssetTable`] from the graphics directory tree:
//!
//! ```text
//! graphics/
//!   Screen/                      category
//!     GameVictory.png            -> still image "GameVictory"
//!   Plants/
//!     Peashooter/                no subfolders: one animation "Peashooter"
//!       Peashooter_0.png
//!       Peashooter_1.png
//!   Zombies/
//!     ConeheadZombie/            has subfolders: one animation per subfolder
//!       ConeheadZombieAttack/
//!         ConeheadZombieAttack_0.png
//! ```
//!
//! Files directly under the root are ignored. Frame indices must run from 0
//! without gaps. Images decoded with an alpha channel keep it; opaque images
//! get the loader colorkey applied.
//!
//! The collision-rect tables are loaded here as well, see
//! [`load_collision_rects`].

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use raylib::prelude::Color;
use rustc_hash::FxHashMap;

use crate::components::frame::{Frame, apply_colorkey};
use crate::components::rect::Rect;
use crate::constants::{ACCEPTED_EXTENSIONS, PLANT_IMAGE_RECT, WHITE, ZOMBIE_IMAGE_RECT};
use crate::resources::assettable::{
    AnimationSequence, Asset, AssetError, AssetTable, GameAssets,
};

/// Directory entries sorted by file name so loading order is stable.
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, AssetError> {
    let io_err = |source| AssetError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        entries.push(entry.map_err(io_err)?.path());
    }
    entries.sort();
    Ok(entries)
}

/// File or folder name without its extension.
fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_accepted(path: &Path, accept: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| accept.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

/// Decode one image file into a frame.
pub fn load_image(path: &Path, colorkey: Color) -> Result<Frame, AssetError> {
    let decoded = image::open(path).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    if decoded.color().has_alpha() {
        Ok(Frame::new(decoded.to_rgba8(), None))
    } else {
        let mut pixels = decoded.to_rgba8();
        apply_colorkey(&mut pixels, colorkey);
        Ok(Frame::new(pixels, Some(colorkey)))
    }
}

/// Parse the index out of `<name>_<index>`.
fn frame_index(name: &str, file: &Path) -> Result<u32, AssetError> {
    let bad = || AssetError::BadFrameName {
        name: name.to_string(),
        file: file.to_path_buf(),
    };
    let file_stem = stem(file);
    let digits = file_stem
        .strip_prefix(name)
        .and_then(|rest| rest.strip_prefix('_'))
        .ok_or_else(bad)?;
    digits.parse::<u32>().map_err(|_| bad())
}

/// Load every accepted image in `dir` as frame `<name>_<index>`.
pub fn load_image_frames(
    dir: &Path,
    name: &str,
    colorkey: Color,
    accept: &[&str],
) -> Result<AnimationSequence, AssetError> {
    let mut indexed = BTreeMap::new();
    for file in sorted_entries(dir)? {
        if !file.is_file() || !is_accepted(&file, accept) {
            continue;
        }
        let index = frame_index(name, &file)?;
        let frame = load_image(&file, colorkey)?;
        if indexed.insert(index, frame).is_some() {
            return Err(AssetError::DuplicateFrameIndex {
                name: name.to_string(),
                folder: dir.to_path_buf(),
                index,
            });
        }
    }
    if indexed.is_empty() {
        return Err(AssetError::EmptyAnimation {
            name: name.to_string(),
        });
    }
    AnimationSequence::from_indexed(name, dir, indexed)
}

fn insert_animation(
    table: &mut AssetTable,
    dir: &Path,
    colorkey: Color,
    accept: &[&str],
) -> Result<(), AssetError> {
    let name = stem(dir);
    let seq = load_image_frames(dir, &name, colorkey, accept)?;
    debug!("animation '{}': {} frames", name, seq.len());
    table.insert(name, Asset::Animation(seq))
}

/// Walk `root` and build the asset table.
pub fn load_all_graphics(
    root: &Path,
    colorkey: Color,
    accept: &[&str],
) -> Result<AssetTable, AssetError> {
    let mut table = AssetTable::new();
    for category in sorted_entries(root)? {
        if !category.is_dir() {
            continue;
        }
        for entry in sorted_entries(&category)? {
            if entry.is_dir() {
                let children = sorted_entries(&entry)?;
                let subdirs: Vec<&PathBuf> = children.iter().filter(|p| p.is_dir()).collect();
                if subdirs.is_empty() {
                    insert_animation(&mut table, &entry, colorkey, accept)?;
                } else {
                    if children.iter().any(|p| p.is_file() && is_accepted(p, accept)) {
                        warn!(
                            "{}: images next to animation folders are ignored",
                            entry.display()
                        );
                    }
                    for sub in subdirs {
                        insert_animation(&mut table, sub, colorkey, accept)?;
                    }
                }
            } else if is_accepted(&entry, accept) {
                let name = stem(&entry);
                let frame = load_image(&entry, colorkey)?;
                debug!("image '{}': {}x{}", name, frame.width(), frame.height());
                table.insert(name, Asset::Image(frame))?;
            }
        }
    }
    info!("Loaded {} graphics from {}", table.len(), root.display());
    Ok(table)
}

/// [`load_all_graphics`] with a white colorkey and the default extensions.
pub fn load_all_graphics_default(root: &Path) -> Result<AssetTable, AssetError> {
    load_all_graphics(root, WHITE, ACCEPTED_EXTENSIONS)
}

/// Read the entity-name to rectangle table stored under `key` in `path`.
pub fn load_collision_rects(
    path: &Path,
    key: &str,
) -> Result<FxHashMap<String, Rect>, AssetError> {
    let raw = fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let json_err = |source| AssetError::Json {
        path: path.to_path_buf(),
        source,
    };
    let mut doc: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&raw).map_err(json_err)?;
    let table = doc.remove(key).ok_or_else(|| AssetError::MissingKey {
        path: path.to_path_buf(),
        key: key.to_string(),
    })?;
    serde_json::from_value(table).map_err(json_err)
}

/// Load graphics and both collision-rect tables.
pub fn load_game_assets(
    graphics_dir: &Path,
    zombie_rects: &Path,
    plant_rects: &Path,
) -> Result<GameAssets, AssetError> {
    let graphics = load_all_graphics_default(graphics_dir)?;
    let zombie_rects = load_collision_rects(zombie_rects, ZOMBIE_IMAGE_RECT)?;
    let plant_rects = load_collision_rects(plant_rects, PLANT_IMAGE_RECT)?;
    info!(
        "Loaded {} zombie rects, {} plant rects",
        zombie_rects.len(),
        plant_rects.len()
    );
    Ok(GameAssets {
        graphics,
        zombie_rects,
        plant_rects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_index_parsing() {
        let p = Path::new("dir/Peashooter_12.png");
        assert_eq!(frame_index("Peashooter", p).unwrap(), 12);
        assert_eq!(frame_index("Peashooter", Path::new("Peashooter_03.png")).unwrap(), 3);
    }

    #[test]
    fn test_frame_index_rejects_foreign_names() {
        for file in ["Sunflower_1.png", "Peashooter1.png", "Peashooter_x.png", "Peashooter_.png"] {
            let err = frame_index("Peashooter", Path::new(file)).unwrap_err();
            assert!(matches!(err, AssetError::BadFrameName { .. }), "{file}");
        }
    }

    #[test]
    fn test_is_accepted_case_insensitive() {
        assert!(is_accepted(Path::new("a.PNG"), ACCEPTED_EXTENSIONS));
        assert!(is_accepted(Path::new("a.webp"), ACCEPTED_EXTENSIONS));
        assert!(!is_accepted(Path::new("a.txt"), ACCEPTED_EXTENSIONS));
        assert!(!is_accepted(Path::new("noext"), ACCEPTED_EXTENSIONS));
    }
}
