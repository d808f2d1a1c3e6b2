//! Asset table: logical name to still image or animation.
//!
//! The table is filled once at startup by
//! [`load_all_graphics`](crate::systems::loader::load_all_graphics) and is
//! read-only afterwards. [`GameAssets`] bundles it with the two
//! collision-rect tables into the single immutable handle handed to states
//! and entities.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use rustc_hash::FxHashMap;

use crate::components::frame::Frame;
use crate::components::rect::Rect;

/// Failures while building or querying the asset table.
///
/// All of these are fatal at startup: they mean the asset pack on disk does
/// not match what the game expects.
#[derive(Debug)]
pub enum AssetError {
    AssetNotFound {
        name: String,
    },
    EmptyAnimation {
        name: String,
    },
    NonContiguousFrameIndex {
        name: String,
        folder: PathBuf,
        missing: u32,
    },
    DuplicateFrameIndex {
        name: String,
        folder: PathBuf,
        index: u32,
    },
    BadFrameName {
        name: String,
        file: PathBuf,
    },
    DuplicateAsset {
        name: String,
    },
    NotAnImage {
        name: String,
    },
    InvalidScale(f32),
    FrameTooLarge {
        width: u32,
        height: u32,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    MissingKey {
        path: PathBuf,
        key: String,
    },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::AssetNotFound { name } => write!(f, "asset '{name}' not found"),
            AssetError::EmptyAnimation { name } => {
                write!(f, "animation '{name}' has no frames")
            }
            AssetError::NonContiguousFrameIndex {
                name,
                folder,
                missing,
            } => write!(
                f,
                "animation '{name}' in {} is missing frame {missing}",
                folder.display()
            ),
            AssetError::DuplicateFrameIndex {
                name,
                folder,
                index,
            } => write!(
                f,
                "animation '{name}' in {} has frame {index} more than once",
                folder.display()
            ),
            AssetError::BadFrameName { name, file } => write!(
                f,
                "file {} is not named '{name}_<index>'",
                file.display()
            ),
            AssetError::DuplicateAsset { name } => {
                write!(f, "asset name '{name}' is used more than once")
            }
            AssetError::NotAnImage { name } => {
                write!(f, "asset '{name}' is an animation, expected a single image")
            }
            AssetError::InvalidScale(scale) => write!(f, "invalid scale factor {scale}"),
            AssetError::FrameTooLarge { width, height } => {
                write!(f, "frame region {width}x{height} is too large")
            }
            AssetError::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            AssetError::Decode { path, source } => {
                write!(f, "failed to decode {}: {source}", path.display())
            }
            AssetError::Json { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
            AssetError::MissingKey { path, key } => {
                write!(f, "{} has no top-level key '{key}'", path.display())
            }
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io { source, .. } => Some(source),
            AssetError::Decode { source, .. } => Some(source),
            AssetError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Ordered frames of one animation, indexed contiguously from 0.
#[derive(Debug, Clone)]
pub struct AnimationSequence {
    frames: Vec<Frame>,
}

impl AnimationSequence {
    /// Build from frames keyed by their file index. Indices must be exactly
    /// `0..n`.
    pub fn from_indexed(
        name: &str,
        folder: impl Into<PathBuf>,
        indexed: BTreeMap<u32, Frame>,
    ) -> Result<Self, AssetError> {
        let mut frames = Vec::with_capacity(indexed.len());
        for (expected, (index, frame)) in (0u32..).zip(indexed) {
            if index != expected {
                return Err(AssetError::NonContiguousFrameIndex {
                    name: name.to_string(),
                    folder: folder.into(),
                    missing: expected,
                });
            }
            frames.push(frame);
        }
        Ok(Self { frames })
    }

    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum Asset {
    Image(Frame),
    Animation(AnimationSequence),
}

impl Asset {
    /// Frames in playback order; a still image is a one-frame sequence.
    pub fn frames(&self) -> &[Frame] {
        match self {
            Asset::Image(frame) => std::slice::from_ref(frame),
            Asset::Animation(seq) => seq.frames(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Asset::Image(_) => "image",
            Asset::Animation(_) => "animation",
        }
    }
}

/// Name to asset mapping. Names are unique.
#[derive(Debug, Clone, Default)]
pub struct AssetTable {
    assets: FxHashMap<String, Asset>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset; a name already present is rejected.
    pub fn insert(&mut self, name: impl Into<String>, asset: Asset) -> Result<(), AssetError> {
        let name = name.into();
        if self.assets.contains_key(&name) {
            return Err(AssetError::DuplicateAsset { name });
        }
        self.assets.insert(name, asset);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Asset, AssetError> {
        self.assets.get(name).ok_or_else(|| AssetError::AssetNotFound {
            name: name.to_string(),
        })
    }

    /// Look up a single still image.
    pub fn image(&self, name: &str) -> Result<&Frame, AssetError> {
        match self.get(name)? {
            Asset::Image(frame) => Ok(frame),
            Asset::Animation(_) => Err(AssetError::NotAnImage {
                name: name.to_string(),
            }),
        }
    }

    pub fn frames(&self, name: &str) -> Result<&[Frame], AssetError> {
        self.get(name).map(Asset::frames)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Asset names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.assets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Everything loaded from disk at startup, shared read-only.
#[derive(Debug, Clone, Default)]
pub struct GameAssets {
    pub graphics: AssetTable,
    pub zombie_rects: FxHashMap<String, Rect>,
    pub plant_rects: FxHashMap<String, Rect>,
}
