//! Game configuration (window, flight tuning, key bindings). Loaded from config.ron at startup.

use input::ControlBindings;
use serde::{Deserialize, Serialize};

use crate::aircraft::AircraftConfig;

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Enable vsync (recommended to avoid tearing).
    #[serde(default = "default_true")]
    pub vsync: bool,
    /// Start in fullscreen.
    #[serde(default)]
    pub fullscreen: bool,
    /// Fixed terrain seed. `None` picks a fresh one each run.
    #[serde(default)]
    pub terrain_seed: Option<u64>,
    #[serde(default)]
    pub flight: AircraftConfig,
    #[serde(default)]
    pub controls: ControlBindings,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_true() -> bool {
    true
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            vsync: default_true(),
            fullscreen: false,
            terrain_seed: None,
            flight: AircraftConfig::default(),
            controls: ControlBindings::default(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        if let Ok(data) = std::fs::read_to_string(&path) {
            match Self::from_ron(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Parse a config document. Missing fields take their defaults.
    pub fn from_ron(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Terrain seed for this run: the configured one, or a random one.
    pub fn resolve_terrain_seed(&self) -> u64 {
        self.terrain_seed.unwrap_or_else(rand::random)
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::KeyCode;

    #[test]
    fn empty_document_gives_defaults() {
        let config = GameConfig::from_ron("()").unwrap();
        assert_eq!(config.window_width, 1280);
        assert_eq!(config.window_height, 720);
        assert!(config.vsync);
        assert!(!config.fullscreen);
        assert_eq!(config.terrain_seed, None);
        assert_eq!(config.flight, AircraftConfig::default());
        assert_eq!(config.controls, ControlBindings::default());
    }

    #[test]
    fn partial_sections_fill_in_the_rest() {
        let config = GameConfig::from_ron(
            "(terrain_seed: Some(99), flight: (max_speed: 20.0), controls: (fire_guns: KeyF))",
        )
        .unwrap();
        assert_eq!(config.terrain_seed, Some(99));
        assert_eq!(config.resolve_terrain_seed(), 99);
        assert_eq!(config.flight.max_speed, 20.0);
        assert_eq!(config.flight.min_speed, 1.0);
        assert_eq!(config.controls.fire_guns, KeyCode::KeyF);
        assert_eq!(config.controls.fire_rockets, KeyCode::KeyC);
    }

    #[test]
    fn pretty_output_parses_back() {
        let mut config = GameConfig::default();
        config.window_width = 1920;
        config.flight.rotate_speed = 1.5;
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let parsed = GameConfig::from_ron(&text).unwrap();
        assert_eq!(parsed.window_width, 1920);
        assert_eq!(parsed.flight, config.flight);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(GameConfig::from_ron("(window_width: \"wide\")").is_err());
    }
}
