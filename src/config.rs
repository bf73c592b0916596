//! Application configuration module
//!
//! This module centralizes the behavioral settings using `confy` for
//! serialization and OS-specific config directory management, and resolves
//! the directories that hold themes, hand sets and textures.

use crate::constant::{
    APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, ASSETS_DIR, ASSETS_ENV, DEFAULT_THEME_NAME,
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, HANDS_DIR, TEXTURES_DIR, THEMES_DIR,
};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Confy(#[from] confy::ConfyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct Config {
    pub settings: Settings,
}

impl Config {
    /// Load configuration from disk, creating default if it doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        let settings: Settings = confy::load(APP_NAME, None)?;
        info!("Load config from {:?}", Self::config_path()?);
        Ok(Self { settings })
    }

    /// Save current configuration to disk
    pub fn save(&self) -> Result<(), ConfigError> {
        store_settings(&self.settings)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(confy::get_configuration_file_path(APP_NAME, None)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Falling back to default settings: {}", e);
            Self {
                settings: Settings::default(),
            }
        })
    }
}

/// Write settings with confy; shared by `Config::save` and the saver thread
pub fn store_settings(settings: &Settings) -> Result<(), ConfigError> {
    confy::store(APP_NAME, None, settings)?;
    info!("Save config to {:?}", Config::config_path()?);
    Ok(())
}

/// Behavioral settings. Appearance lives in themes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Last known window position; unset until the window has been moved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_x: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_y: Option<i32>,
    pub width: u32,
    pub height: u32,

    pub clock_size: u32,
    pub show_date_box: bool,
    pub show_second_hand: bool,
    /// Minute hand jumps between minute marks instead of sweeping
    pub minute_hand_snap: bool,
    pub always_on_top: bool,

    pub active_theme_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            clock_size: 400,
            show_date_box: true,
            show_second_hand: true,
            minute_hand_snap: true,
            always_on_top: false,
            active_theme_name: DEFAULT_THEME_NAME.to_string(),
        }
    }
}

impl Settings {
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.window_x = Some(x);
        self.window_y = Some(y);
    }

    pub fn position(&self) -> Option<(i32, i32)> {
        self.window_x.zip(self.window_y)
    }
}

/// Filesystem locations used by the application
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Per-user data root (themes, hands, textures)
    pub data_dir: PathBuf,
    /// Read-only assets shipped with the application
    pub assets_dir: PathBuf,
    /// XDG autostart directory
    pub autostart_dir: PathBuf,
}

impl AppPaths {
    pub fn resolve() -> Self {
        let data_dir =
            if let Some(proj_dirs) = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME) {
                proj_dirs.config_dir().to_path_buf()
            } else {
                PathBuf::from("data")
            };

        let autostart_dir = if let Some(base) = BaseDirs::new() {
            base.config_dir().join("autostart")
        } else {
            data_dir.join("autostart")
        };

        Self {
            data_dir,
            assets_dir: resolve_assets_dir(),
            autostart_dir,
        }
    }

    /// Paths rooted at arbitrary directories, used by tests and tools
    pub fn with_roots(data_dir: &Path, assets_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            assets_dir: assets_dir.to_path_buf(),
            autostart_dir: data_dir.join("autostart"),
        }
    }

    pub fn themes_dir(&self) -> PathBuf {
        self.data_dir.join(THEMES_DIR)
    }

    pub fn bundled_themes_dir(&self) -> PathBuf {
        self.assets_dir.join(THEMES_DIR)
    }

    pub fn user_hands_dir(&self) -> PathBuf {
        self.data_dir.join(HANDS_DIR)
    }

    pub fn builtin_hands_dir(&self) -> PathBuf {
        self.assets_dir.join(HANDS_DIR)
    }

    pub fn user_textures_dir(&self) -> PathBuf {
        self.data_dir.join(TEXTURES_DIR)
    }

    pub fn builtin_textures_dir(&self) -> PathBuf {
        self.assets_dir.join(TEXTURES_DIR)
    }
}

/// `$DESK_CLOCK_ASSETS`, then `assets/` beside the executable, then `./assets`
fn resolve_assets_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(ASSETS_ENV) {
        return PathBuf::from(dir);
    }

    if let Ok(exe) = std::env::current_exe()
        && let Some(exe_dir) = exe.parent()
    {
        let candidate = exe_dir.join(ASSETS_DIR);
        if candidate.is_dir() {
            return candidate;
        }
    }

    PathBuf::from(ASSETS_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.position(), None);
        assert_eq!(settings.clock_size, 400);
        assert!(settings.show_date_box);
        assert!(settings.minute_hand_snap);
        assert_eq!(settings.active_theme_name, "default");
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"window_x": 10, "window_y": 20, "always_on_top": true}"#)
                .unwrap();
        assert_eq!(settings.position(), Some((10, 20)));
        assert!(settings.always_on_top);
        assert_eq!(settings.width, 400);
        assert_eq!(settings.height, 460);
    }

    #[test]
    fn test_position_requires_both_coordinates() {
        let mut settings = Settings {
            window_x: Some(5),
            ..Settings::default()
        };
        assert_eq!(settings.position(), None);

        settings.set_position(7, 8);
        assert_eq!(settings.position(), Some((7, 8)));
    }

    #[test]
    fn test_paths_layout() {
        let paths = AppPaths::with_roots(Path::new("/data"), Path::new("/assets"));
        assert_eq!(paths.themes_dir(), PathBuf::from("/data/themes"));
        assert_eq!(paths.user_hands_dir(), PathBuf::from("/data/hands"));
        assert_eq!(paths.builtin_hands_dir(), PathBuf::from("/assets/hands"));
        assert_eq!(paths.bundled_themes_dir(), PathBuf::from("/assets/themes"));
        assert_eq!(paths.builtin_textures_dir(), PathBuf::from("/assets/textures"));
    }
}
