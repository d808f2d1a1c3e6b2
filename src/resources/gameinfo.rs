//! Persisted game data.
//!
//! [`GameInfo`] is a flat key/value map (progress, settings, game speed)
//! stored as one JSON document. On load it is merged against the canonical
//! defaults: keys the schema does not know are dropped, keys the save lacks
//! are filled in and the merged result is written back. Any failure to read
//! the save falls back to the defaults, which are then written as a fresh
//! save.
//!
//! The save is written with sorted keys and four-space indentation. The
//! in-memory [`CURRENT_TIME`] key is never written.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use log::{debug, error, info, warn};
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::constants::{
    CURRENT_TIME, GAME_RATE, LEVEL_COMPLETIONS, LEVEL_NUM, LITTLEGAME_COMPLETIONS,
    LITTLEGAME_NUM, SOUND_VOLUME,
};

/// Keys that live only in memory.
const RESERVED_KEYS: &[&str] = &[CURRENT_TIME];

/// Why a save file could not be used.
#[derive(Debug)]
pub enum SaveLoadError {
    NotFound,
    Io(io::Error),
    Parse(serde_json::Error),
    /// Valid JSON whose top level is not an object.
    NotAnObject,
}

impl fmt::Display for SaveLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveLoadError::NotFound => write!(f, "save file not found"),
            SaveLoadError::Io(e) => write!(f, "save file unreadable: {e}"),
            SaveLoadError::Parse(e) => write!(f, "save file malformed: {e}"),
            SaveLoadError::NotAnObject => write!(f, "save file is not a JSON object"),
        }
    }
}

impl std::error::Error for SaveLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveLoadError::Io(e) => Some(e),
            SaveLoadError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

/// What happened while loading the save.
#[derive(Debug)]
pub enum SaveOutcome {
    /// Save matched the schema, nothing written.
    Loaded,
    /// Save lacked some schema keys; the merged data was written back.
    Rewritten,
    /// Save unusable; defaults were adopted and written.
    Recovered(SaveLoadError),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct GameInfo {
    values: BTreeMap<String, Value>,
}

impl GameInfo {
    /// The canonical schema with its default values.
    pub fn defaults() -> Self {
        let mut info = GameInfo::default();
        info.set(GAME_RATE, json!(1));
        info.set(LEVEL_NUM, json!(1));
        info.set(LEVEL_COMPLETIONS, json!(0));
        info.set(LITTLEGAME_NUM, json!(1));
        info.set(LITTLEGAME_COMPLETIONS, json!(0));
        info.set(SOUND_VOLUME, json!(1.0));
        info
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Game-speed multiplier, if present and numeric.
    pub fn game_rate(&self) -> Option<f64> {
        self.get(GAME_RATE).and_then(Value::as_f64)
    }

    /// Merge `loaded` against `defaults`.
    ///
    /// Returns the merged data and whether any schema key had to be filled
    /// from the defaults. Keys outside the schema are dropped.
    pub fn merge_with_defaults(loaded: &Map<String, Value>, defaults: &GameInfo) -> (GameInfo, bool) {
        let mut merged = GameInfo::default();
        let mut needs_rewrite = false;
        for (key, default) in &defaults.values {
            match loaded.get(key) {
                Some(value) => merged.set(key.clone(), value.clone()),
                None => {
                    merged.set(key.clone(), default.clone());
                    needs_rewrite = true;
                }
            }
        }
        for key in loaded.keys().filter(|k| !defaults.contains_key(k)) {
            debug!("Dropping unknown save key '{}'", key);
        }
        (merged, needs_rewrite)
    }

    /// Read and parse a save file.
    pub fn read_save(path: &Path) -> Result<Map<String, Value>, SaveLoadError> {
        let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SaveLoadError::NotFound,
            _ => SaveLoadError::Io(e),
        })?;
        match serde_json::from_str::<Value>(&raw).map_err(SaveLoadError::Parse)? {
            Value::Object(map) => Ok(map),
            _ => Err(SaveLoadError::NotAnObject),
        }
    }

    /// Serialized save text: sorted keys, four-space indent, reserved keys
    /// left out.
    pub fn to_save_string(&self) -> String {
        let persisted: BTreeMap<&str, &Value> = self
            .values
            .iter()
            .filter(|(k, _)| !RESERVED_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        // Serializing a map of strings to JSON values into memory cannot fail.
        if persisted.serialize(&mut ser).is_err() {
            return String::from("{}");
        }
        String::from_utf8(buf).unwrap_or_else(|_| String::from("{}"))
    }

    /// Write the save file, creating its directory when missing.
    pub fn write_save(&self, path: &Path) -> io::Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, self.to_save_string())
    }

    /// Load the save at `path`, merging and rewriting as needed, or fall back
    /// to `defaults`.
    ///
    /// Write failures are logged and the in-memory data is kept, so the game
    /// still runs with session-only persistence.
    pub fn load_or_recover(path: &Path, defaults: &GameInfo) -> (GameInfo, SaveOutcome) {
        match Self::read_save(path) {
            Ok(loaded) => {
                let (merged, needs_rewrite) = Self::merge_with_defaults(&loaded, defaults);
                if needs_rewrite {
                    info!("Save {} lacks some keys, rewriting", path.display());
                    if let Err(e) = merged.write_save(path) {
                        error!("Failed to rewrite save {}: {}", path.display(), e);
                    }
                    (merged, SaveOutcome::Rewritten)
                } else {
                    (merged, SaveOutcome::Loaded)
                }
            }
            Err(cause) => {
                warn!(
                    "Using default game data ({}): {}",
                    path.display(),
                    cause
                );
                if let Err(e) = defaults.write_save(path) {
                    error!("Failed to write default save {}: {}", path.display(), e);
                }
                (defaults.clone(), SaveOutcome::Recovered(cause))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_map(info: &GameInfo) -> Map<String, Value> {
        info.values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    #[test]
    fn test_merge_defaults_is_idempotent() {
        let defaults = GameInfo::defaults();
        let (merged, needs_rewrite) = GameInfo::merge_with_defaults(&as_map(&defaults), &defaults);
        assert!(!needs_rewrite);
        assert_eq!(merged, defaults);
    }

    #[test]
    fn test_merge_fills_missing_and_keeps_loaded() {
        let defaults = GameInfo::defaults();
        let mut loaded = Map::new();
        loaded.insert(LEVEL_NUM.to_string(), json!(7));
        let (merged, needs_rewrite) = GameInfo::merge_with_defaults(&loaded, &defaults);
        assert!(needs_rewrite);
        assert_eq!(merged.len(), defaults.len());
        assert_eq!(merged.get(LEVEL_NUM), Some(&json!(7)));
        assert_eq!(merged.get(GAME_RATE), defaults.get(GAME_RATE));
    }

    #[test]
    fn test_merge_drops_unknown_keys() {
        let defaults = GameInfo::defaults();
        let mut loaded = as_map(&defaults);
        loaded.insert("future feature".to_string(), json!(true));
        let (merged, needs_rewrite) = GameInfo::merge_with_defaults(&loaded, &defaults);
        assert!(!needs_rewrite);
        assert!(!merged.contains_key("future feature"));
    }

    #[test]
    fn test_save_string_sorted_and_without_reserved_keys() {
        let mut info = GameInfo::defaults();
        info.set(CURRENT_TIME, json!(1234));
        let text = info.to_save_string();
        assert!(!text.contains(CURRENT_TIME));
        assert!(text.contains("\n    \"game rate\": 1"));
        let rate = text.find(GAME_RATE).unwrap();
        let level = text.find(LEVEL_NUM).unwrap();
        let volume = text.find(SOUND_VOLUME).unwrap();
        assert!(rate < level && level < volume);
    }

    #[test]
    fn test_game_rate_accepts_int_and_float() {
        let mut info = GameInfo::defaults();
        assert_eq!(info.game_rate(), Some(1.0));
        info.set(GAME_RATE, json!(1.5));
        assert_eq!(info.game_rate(), Some(1.5));
        info.set(GAME_RATE, json!("fast"));
        assert_eq!(info.game_rate(), None);
    }
}
