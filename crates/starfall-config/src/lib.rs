//! Configuration file handling for starfall.
//!
//! The config lives at `<config dir>/starfall/config.toml`. Every section is
//! optional: missing keys fall back to their defaults, and a missing file is
//! the same as an empty one.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};
use starfall_core::{LayerSet, Motion, NebulaParams, Preset, StarfieldParams, TechLinesParams};
use thiserror::Error;

/// File name inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Errors raised while reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve a configuration directory")]
    NoConfigDir,
    #[error("config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Display and runtime settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Target frames per second.
    pub fps: u32,
    /// Surface pixels per terminal column.
    pub cell_width: f32,
    /// Surface pixels per terminal row.
    pub cell_height: f32,
    pub motion: Motion,
    pub layers: LayerSet,
    pub preset: Preset,
    /// Fixed random seed; absent for a different sky every run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub show_help: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            cell_width: 8.0,
            cell_height: 16.0,
            motion: Motion::Full,
            layers: LayerSet::All,
            preset: Preset::Portfolio,
            seed: None,
            show_help: true,
        }
    }
}

impl DisplayConfig {
    /// Frame budget for the configured rate, never below 1 fps.
    pub fn frame_interval_ms(&self) -> u64 {
        1000 / u64::from(self.fps.max(1))
    }
}

/// Complete starfall configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub starfield: StarfieldParams,
    pub nebula: NebulaParams,
    pub tech_lines: TechLinesParams,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_preset(Preset::default())
    }
}

impl Config {
    /// Defaults with every layer tuned by `preset`.
    pub fn with_preset(preset: Preset) -> Self {
        Self {
            display: DisplayConfig {
                preset,
                ..DisplayConfig::default()
            },
            starfield: preset.starfield(),
            nebula: preset.nebula(),
            tech_lines: preset.tech_lines(),
        }
    }

    /// Switch to `preset`, replacing every layer's parameters.
    pub fn apply_preset(&mut self, preset: Preset) {
        let display = DisplayConfig {
            preset,
            ..self.display
        };
        *self = Self {
            display,
            ..Self::with_preset(preset)
        };
    }

    /// Default config file location.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("", "", "starfall").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse TOML text.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Render as TOML text.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save to `path`, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        fs::write(path, self.to_toml()?).map_err(io_err)?;
        debug!("saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("starfall-config-{}-{name}", std::process::id()))
            .join(CONFIG_FILE)
    }

    #[test]
    fn default_config_uses_page_tuning() {
        let config = Config::default();
        assert_eq!(config.display.preset, Preset::Portfolio);
        assert_eq!(config.starfield.shoot_rate, 0.003);
        assert_eq!(config.nebula.blobs, 7);
        assert_eq!(config.display.fps, 30);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::parse(
            r#"
            [display]
            motion = "reduced"
            layers = "tech-lines"
            seed = 1234

            [starfield]
            trail_length = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.display.motion, Motion::Reduced);
        assert_eq!(config.display.layers, LayerSet::TechLines);
        assert_eq!(config.display.seed, Some(1234));
        assert_eq!(config.display.fps, 30);
        assert_eq!(config.starfield.trail_length, 30);
        assert_eq!(config.starfield.max_meteors, 24);
        assert_eq!(config.nebula, Config::default().nebula);
    }

    #[test]
    fn bad_values_are_parse_errors() {
        assert!(Config::parse("[display]\nlayers = \"clouds\"").is_err());
        assert!(Config::parse("[starfield]\ndensity = \"lots\"").is_err());
    }

    #[test]
    fn serialized_config_mentions_every_section() {
        let text = Config::default().to_toml().unwrap();
        for section in ["[display]", "[starfield]", "[nebula]", "[tech_lines]"] {
            assert!(text.contains(section), "missing {section}");
        }
    }

    #[test]
    fn save_then_load_from_disk() {
        let path = scratch("roundtrip");
        let mut config = Config::default();
        config.display.motion = Motion::Reduced;
        config.display.seed = Some(7);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn missing_file_loads_defaults() {
        let path = scratch("missing");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn broken_file_reports_its_path() {
        let path = scratch("broken");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[display\nfps = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn preset_switch_keeps_display_settings() {
        let mut config = Config::default();
        config.display.fps = 60;
        config.apply_preset(Preset::Component);
        assert_eq!(config.display.fps, 60);
        assert_eq!(config.display.preset, Preset::Component);
        assert_eq!(config.starfield, StarfieldParams::default());
    }

    #[test]
    fn frame_interval_guards_zero_fps() {
        let display = DisplayConfig {
            fps: 0,
            ..DisplayConfig::default()
        };
        assert_eq!(display.frame_interval_ms(), 1000);
        assert_eq!(DisplayConfig::default().frame_interval_ms(), 33);
    }
}
