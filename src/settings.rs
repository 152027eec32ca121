//! Settings loaded from TOML
//!
//! Read from ~/.config/blocktris/settings.toml (or platform equivalent).
//! Every section is optional; missing values take their defaults.

use crate::error::Error;
use crate::game::LoopState;
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub keys: KeyBindings,
    pub gameplay: GameplaySettings,
    pub visual: VisualSettings,
}

/// Key bindings (stored as strings for easy editing)
/// Each intent can have one or more keys bound to it
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys")]
    pub shift_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys")]
    pub shift_right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys")]
    pub rotate: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys")]
    pub boost: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys")]
    pub quit: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct KeysVisitor;

    impl<'de> Visitor<'de> for KeysVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or array of strings")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut keys = Vec::new();
            while let Some(key) = seq.next_element::<String>()? {
                keys.push(key);
            }
            Ok(keys)
        }
    }

    deserializer.deserialize_any(KeysVisitor)
}

/// Gameplay settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameplaySettings {
    /// Ticks between gravity steps
    pub ticks_per_fall: u32,
    /// Divides ticks_per_fall while boost is held
    pub boost_multiplier: u32,
    /// Target frame rate
    pub fps: u32,
    /// Fixed seed for the figure generator; random when absent
    pub seed: Option<u64>,
}

/// Visual settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Block style: "solid", "bracket", "round"
    pub block_style: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            shift_left: vec!["Left".to_string(), "a".to_string()],
            shift_right: vec!["Right".to_string(), "d".to_string()],
            rotate: vec!["Up".to_string(), "w".to_string()],
            boost: vec!["Down".to_string(), "s".to_string()],
            quit: vec!["Esc".to_string(), "q".to_string()],
        }
    }
}

impl Default for GameplaySettings {
    fn default() -> Self {
        Self {
            ticks_per_fall: 25,
            boost_multiplier: 5,
            fps: 60,
            seed: None,
        }
    }
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            block_style: "solid".to_string(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "blocktris", "blocktris")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
    }

    /// Load settings from file, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory, using defaults");
            return Self::default();
        };

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No settings at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_toml_str(&contents) {
            Ok(settings) => {
                info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse and validate settings
    pub fn from_toml_str(contents: &str) -> Result<Self, Error> {
        let settings: Settings = toml::from_str(contents)?;
        settings.loop_state()?;
        if settings.gameplay.fps == 0 {
            return Err(Error::InvalidArgument("fps must be at least 1".to_string()));
        }
        Ok(settings)
    }

    /// Gravity cadence described by these settings
    pub fn loop_state(&self) -> Result<LoopState, Error> {
        LoopState::new(self.gameplay.ticks_per_fall, self.gameplay.boost_multiplier)
    }
}

impl VisualSettings {
    /// Get the block characters based on style
    pub fn block_chars(&self) -> &'static str {
        match self.block_style.as_str() {
            "bracket" => "[]",
            "round" => "()",
            _ => "██", // "solid" or default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings.gameplay.ticks_per_fall, 25);
        assert_eq!(settings.gameplay.boost_multiplier, 5);
        assert_eq!(settings.gameplay.fps, 60);
        assert_eq!(settings.gameplay.seed, None);
        assert_eq!(settings.keys.quit, vec!["Esc".to_string(), "q".to_string()]);
    }

    #[test]
    fn test_partial_sections() {
        let settings = Settings::from_toml_str(
            r#"
            [gameplay]
            ticks_per_fall = 30
            seed = 1234

            [keys]
            rotate = "x"
            boost = ["Down", "j"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.gameplay.ticks_per_fall, 30);
        assert_eq!(settings.gameplay.boost_multiplier, 5);
        assert_eq!(settings.gameplay.seed, Some(1234));
        assert_eq!(settings.keys.rotate, vec!["x".to_string()]);
        assert_eq!(settings.keys.boost, vec!["Down".to_string(), "j".to_string()]);
        assert_eq!(settings.keys.shift_left, KeyBindings::default().shift_left);
    }

    #[test]
    fn test_malformed_toml() {
        let err = Settings::from_toml_str("[gameplay\nfps = ").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_invalid_cadence() {
        let err = Settings::from_toml_str("[gameplay]\nticks_per_fall = 0").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = Settings::from_toml_str("[gameplay]\nticks_per_fall = 3\nboost_multiplier = 4")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        let err = Settings::from_toml_str("[gameplay]\nfps = 0").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_block_chars() {
        let mut visual = VisualSettings::default();
        assert_eq!(visual.block_chars(), "██");
        visual.block_style = "bracket".to_string();
        assert_eq!(visual.block_chars(), "[]");
        visual.block_style = "unknown".to_string();
        assert_eq!(visual.block_chars(), "██");
    }
}
