use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::SettingsError;
use crate::keymap::same_key;

/// Session settings. Snapshotted into the click worker when a run starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cps: f64,
    pub limit: ClickLimit,
    pub button: MouseButton,
    pub kind: ClickKind,
    pub hotkey: Hotkey,
    pub stop_key: Key,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cps: 1.0,
            limit: ClickLimit::Infinite,
            button: MouseButton::Left,
            kind: ClickKind::Single,
            hotkey: Hotkey::default_toggle(),
            stop_key: Key::Escape,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.cps.is_finite() || self.cps <= 0.0 {
            return Err(SettingsError::InvalidRate);
        }
        if self.limit == ClickLimit::Bounded(0) {
            return Err(SettingsError::InvalidLimit);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickLimit {
    Infinite,
    Bounded(u64),
}

impl ClickLimit {
    /// Whether `performed` clicks still leave room for another one.
    #[must_use]
    pub fn allows(&self, performed: u64) -> bool {
        match self {
            ClickLimit::Infinite => true,
            ClickLimit::Bounded(max) => performed < *max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn label(&self) -> &'static str {
        match self {
            MouseButton::Left => "Left",
            MouseButton::Right => "Right",
            MouseButton::Middle => "Middle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickKind {
    Single,
    /// Two clicks sent as one operation; still one interval per double click.
    Double,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hotkey {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub meta: bool,
    pub key: Key,
}

impl Hotkey {
    pub fn default_toggle() -> Self {
        Self { ctrl: false, alt: false, shift: false, meta: false, key: Key::F6 }
    }

    #[must_use]
    pub fn matches_combo(&self, ctrl: bool, alt: bool, shift: bool, meta: bool, key: &Key) -> bool {
        self.ctrl == ctrl && self.alt == alt && self.shift == shift && self.meta == meta && same_key(&self.key, key)
    }
}

impl Display for Hotkey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mods = [(self.ctrl, "Ctrl"), (self.alt, "Alt"), (self.shift, "Shift"), (self.meta, "Meta")];
        for (_, name) in mods.iter().filter(|(on, _)| *on) {
            write!(f, "{name}+")?;
        }
        write!(f, "{}", self.key)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Key {
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    Space,
    Enter,
    Escape,
    Char(char),
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            other => write!(f, "{other:?}"),
        }
    }
}

pub fn config_file_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "cps-clicker", "cps-clicker").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Startup defaults. The file is optional and only ever read.
pub fn load_settings(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(s) => match toml::from_str::<Settings>(&s) {
            Ok(settings) => {
                info!("Loaded startup settings from {}", path.display());
                settings
            }
            Err(e) => {
                error!("Failed to parse settings TOML: {}", e);
                Settings::default()
            }
        },
        Err(_) => Settings::default(),
    }
}
