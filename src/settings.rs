//! Player settings stored as TOML
//!
//! Lives in the platform config dir (e.g. ~/.config/tetris-engine/settings.toml).
//! Missing fields fall back to their defaults, so a partial file is fine.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub keys: KeyBindings,
    pub gameplay: GameplaySettings,
    pub visual: VisualSettings,
}

/// Key names per action. Each entry accepts a single string or an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub move_left: KeyList,
    pub move_right: KeyList,
    pub soft_drop: KeyList,
    pub hard_drop: KeyList,
    pub rotate_cw: KeyList,
    pub rotate_ccw: KeyList,
    pub hold: KeyList,
    pub toggle_ghost: KeyList,
    pub reset: KeyList,
    pub quit: KeyList,
}

/// One or more key names, written as `"x"` or `["x", "Up"]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "OneOrMany", into = "OneOrMany")]
pub struct KeyList(pub Vec<String>);

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for KeyList {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(key) => KeyList(vec![key]),
            OneOrMany::Many(keys) => KeyList(keys),
        }
    }
}

impl From<KeyList> for OneOrMany {
    fn from(list: KeyList) -> Self {
        let mut keys = list.0;
        if keys.len() == 1 {
            OneOrMany::One(keys.remove(0))
        } else {
            OneOrMany::Many(keys)
        }
    }
}

impl KeyList {
    fn of(keys: &[&str]) -> Self {
        KeyList(keys.iter().map(|k| k.to_string()).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Delayed Auto Shift in milliseconds
    pub das_ms: u64,
    /// Auto Repeat Rate in milliseconds
    pub arr_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    pub show_ghost: bool,
    pub block_style: BlockStyle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockStyle {
    #[default]
    Solid,
    Bracket,
    Round,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: KeyList::of(&["Left"]),
            move_right: KeyList::of(&["Right"]),
            soft_drop: KeyList::of(&["Down"]),
            hard_drop: KeyList::of(&["Space"]),
            rotate_cw: KeyList::of(&["Up", "x"]),
            rotate_ccw: KeyList::of(&["z"]),
            hold: KeyList::of(&["c", "Shift"]),
            toggle_ghost: KeyList::of(&["g"]),
            reset: KeyList::of(&["r"]),
            quit: KeyList::of(&["q", "Esc"]),
        }
    }
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            das_ms: 170,
            arr_ms: 50,
        }
    }
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            show_ghost: true,
            block_style: BlockStyle::Solid,
        }
    }
}

impl VisualSettings {
    /// (filled, ghost) glyph pairs for one grid cell
    pub fn block_chars(&self) -> (&'static str, &'static str) {
        match self.block_style {
            BlockStyle::Bracket => ("[]", ".."),
            BlockStyle::Round => ("()", ".."),
            BlockStyle::Solid => ("██", "░░"),
        }
    }
}

impl Settings {
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "tetris-engine", "tetris-engine")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from disk. A missing or unreadable file yields defaults.
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("no config directory, using default settings");
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => Self::from_toml(&contents).unwrap_or_else(|e| {
                warn!("ignoring {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                debug!("no settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse settings: {}", e))
    }

    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))
    }

    /// Write settings to disk, creating the config dir if needed
    pub fn save(&self) -> Result<(), String> {
        let (Some(dir), Some(path)) = (Self::config_dir(), Self::settings_path()) else {
            return Err("Could not determine config directory".to_string());
        };

        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create config dir: {}", e))?;
        fs::write(&path, self.to_toml()?)
            .map_err(|e| format!("Failed to write settings: {}", e))?;

        debug!("settings saved to {}", path.display());
        Ok(())
    }
}
