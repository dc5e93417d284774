//! User configuration loaded from `config.toml`.

use std::fs;
use std::path::PathBuf;

use color_eyre::eyre::{WrapErr, eyre};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tessera_core::{ColorScheme, Palette, TileSize};
use tracing::Level;

/// Which grid behavior draws the background.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Shape-masked fade grid.
    #[default]
    Masked,
    /// Fully tiled grid with random activation.
    Tiled,
}

impl StrategyKind {
    /// Switch to the other behavior.
    pub fn toggle(self) -> Self {
        match self {
            StrategyKind::Masked => StrategyKind::Tiled,
            StrategyKind::Tiled => StrategyKind::Masked,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::Masked => "masked",
            StrategyKind::Tiled => "tiled",
        }
    }
}

/// Application configuration. Every field is optional in the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub strategy: StrategyKind,
    pub color_scheme: ColorScheme,
    pub tile_size: TileSize,
    /// Enables file logging at this level (`error` … `trace`).
    pub log_level: Option<String>,
    pub palette: Palette,
}

impl Config {
    /// Project directories for tessera, if a home directory is known.
    pub fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "tessera")
    }

    /// Location of the config file.
    pub fn path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load the config file, falling back to defaults when it does not exist.
    pub fn load() -> color_eyre::Result<Self> {
        let Some(path) = Self::path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&raw).wrap_err_with(|| format!("failed to parse {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Parsed log level, `None` when logging is off.
    pub fn log_level(&self) -> color_eyre::Result<Option<Level>> {
        self.log_level
            .as_deref()
            .map(|level| {
                level
                    .parse::<Level>()
                    .map_err(|_| eyre!("invalid log_level {level:?}"))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::Rgb;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_toml("").expect("parses"), Config::default());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.strategy, StrategyKind::Masked);
        assert_eq!(config.color_scheme, ColorScheme::Light);
        assert_eq!(config.tile_size, TileSize::Large);
        assert_eq!(config.log_level().expect("valid"), None);
    }

    #[test]
    fn test_parse_fields() {
        let config = Config::from_toml(
            r##"
strategy = "tiled"
color_scheme = "dark"
tile_size = "small"
log_level = "debug"

[palette.dark]
page = "#000000"
idle = "rgb(10, 10, 10)"
hover = "#202020"
pulse = "#303030"
"##,
        )
        .expect("parses");

        assert_eq!(config.strategy, StrategyKind::Tiled);
        assert_eq!(config.color_scheme, ColorScheme::Dark);
        assert_eq!(config.tile_size, TileSize::Small);
        assert_eq!(config.log_level().expect("valid"), Some(Level::DEBUG));
        assert_eq!(config.palette.dark.idle, Rgb::new(10, 10, 10));
        assert_eq!(config.palette.dark.hover, Rgb::new(32, 32, 32));
        // Untouched scheme keeps the built-in colors.
        assert_eq!(config.palette.light, Palette::default().light);
    }

    #[test]
    fn test_invalid_color_is_an_error() {
        let result = Config::from_toml(
            r##"
[palette.light]
page = "#fff"
idle = "#000000"
hover = "#000000"
pulse = "#000000"
"##,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let config = Config {
            log_level: Some("loud".to_string()),
            ..Default::default()
        };
        assert!(config.log_level().is_err());
    }

    #[test]
    fn test_strategy_toggle() {
        assert_eq!(StrategyKind::Masked.toggle(), StrategyKind::Tiled);
        assert_eq!(StrategyKind::Tiled.toggle(), StrategyKind::Masked);
    }
}
