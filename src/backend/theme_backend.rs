use crate::constant::DEFAULT_THEME_NAME;
use crate::theme::Theme;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info, warn};

const THEME_EXTENSION: &str = "json";

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid theme name: {0:?}")]
    InvalidName(String),

    #[error("The default theme is built in and cannot be {0}")]
    DefaultTheme(&'static str),
}

/// One JSON file per theme inside `themes_dir`
pub struct ThemeStore {
    themes_dir: PathBuf,
}

impl ThemeStore {
    pub fn new(themes_dir: PathBuf) -> Self {
        Self { themes_dir }
    }

    pub fn themes_dir(&self) -> &Path {
        &self.themes_dir
    }

    pub fn theme_path(&self, name: &str) -> PathBuf {
        self.themes_dir.join(format!("{}.{}", name, THEME_EXTENSION))
    }

    /// Theme names found on disk, always including `default`, sorted
    pub fn list(&self) -> Vec<String> {
        let mut names = vec![DEFAULT_THEME_NAME.to_string()];

        match fs::read_dir(&self.themes_dir) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.extension().and_then(|s| s.to_str()) == Some(THEME_EXTENSION)
                        && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                        && stem != DEFAULT_THEME_NAME
                    {
                        names.push(stem.to_string());
                    }
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Could not list themes in {:?}: {}", self.themes_dir, e),
        }

        names.sort();
        names
    }

    /// Read a theme file strictly; errors are returned to the caller
    pub fn read(&self, name: &str) -> Result<Theme, ThemeError> {
        if name == DEFAULT_THEME_NAME {
            return Ok(Theme::default());
        }
        let content = fs::read_to_string(self.theme_path(name))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load a theme for display. A missing or corrupted file yields the
    /// defaults; the corrupted file is left on disk untouched.
    pub fn load(&self, name: &str) -> ActiveTheme {
        let properties = match self.read(name) {
            Ok(theme) => theme,
            Err(ThemeError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Theme '{}' not found, using defaults", name);
                Theme::default()
            }
            Err(e) => {
                error!(
                    "Theme file {:?} is corrupted ({}), falling back to defaults",
                    self.theme_path(name),
                    e
                );
                Theme::default()
            }
        };
        ActiveTheme::clean(name.to_string(), properties)
    }

    pub fn write(&self, name: &str, theme: &Theme) -> Result<(), ThemeError> {
        validate_name(name)?;
        if name == DEFAULT_THEME_NAME {
            return Err(ThemeError::DefaultTheme("saved"));
        }
        fs::create_dir_all(&self.themes_dir)?;
        let content = serde_json::to_string_pretty(theme)?;
        fs::write(self.theme_path(name), content)?;
        info!("Saved theme '{}'", name);
        Ok(())
    }

    /// Save the active theme to its own file and clear its dirty flag
    pub fn save(&self, theme: &mut ActiveTheme) -> Result<(), ThemeError> {
        self.write(&theme.name, &theme.properties)?;
        theme.dirty = false;
        Ok(())
    }

    /// Write the active theme's values under `new_name` and make that the
    /// active theme
    pub fn save_as(&self, theme: &mut ActiveTheme, new_name: &str) -> Result<(), ThemeError> {
        let new_name = new_name.trim();
        let mut copy = theme.duplicate(new_name);
        self.save(&mut copy)?;
        *theme = copy;
        Ok(())
    }

    pub fn delete(&self, name: &str) -> Result<(), ThemeError> {
        if name == DEFAULT_THEME_NAME {
            return Err(ThemeError::DefaultTheme("deleted"));
        }
        validate_name(name)?;
        match fs::remove_file(self.theme_path(name)) {
            Ok(()) => {
                info!("Deleted theme '{}'", name);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Copy bundled theme files that the user doesn't have yet. Existing user
    /// themes are never overwritten. Returns the number of themes installed.
    pub fn install_bundled(&self, bundled_dir: &Path) -> Result<usize, ThemeError> {
        if !bundled_dir.is_dir() {
            return Ok(0);
        }
        fs::create_dir_all(&self.themes_dir)?;

        let mut installed = 0;
        for entry in fs::read_dir(bundled_dir)? {
            let src = entry?.path();
            if src.extension().and_then(|s| s.to_str()) != Some(THEME_EXTENSION) {
                continue;
            }
            let Some(file_name) = src.file_name() else {
                continue;
            };
            let dst = self.themes_dir.join(file_name);
            if dst.exists() {
                continue;
            }
            fs::copy(&src, &dst)?;
            installed += 1;
        }

        if installed > 0 {
            info!("Installed {} bundled theme(s)", installed);
        }
        Ok(installed)
    }
}

/// Theme names become file names
pub fn validate_name(name: &str) -> Result<(), ThemeError> {
    let invalid = name.is_empty()
        || name != name.trim()
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(ThemeError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// The theme currently applied to the clock, with unsaved-changes tracking
#[derive(Debug, Clone)]
pub struct ActiveTheme {
    name: String,
    properties: Theme,
    dirty: bool,
}

impl ActiveTheme {
    pub fn clean(name: String, properties: Theme) -> Self {
        Self {
            name,
            properties,
            dirty: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_THEME_NAME
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn properties(&self) -> &Theme {
        &self.properties
    }

    /// Apply an edit; the theme becomes dirty only if a value changed
    pub fn update(&mut self, edit: impl FnOnce(&mut Theme)) -> bool {
        let before = self.properties.clone();
        edit(&mut self.properties);
        let changed = self.properties != before;
        self.dirty |= changed;
        changed
    }

    /// Record that the current values were handed to storage
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// A write of `name` failed after it was queued. If that is this theme,
    /// its values are unsaved again. Returns whether this theme was affected.
    pub fn save_failed(&mut self, name: &str) -> bool {
        let affected = self.name == name;
        self.dirty |= affected;
        affected
    }

    /// Copy of this theme under a new name, marked dirty
    pub fn duplicate(&self, new_name: &str) -> Self {
        Self {
            name: new_name.to_string(),
            properties: self.properties.clone(),
            dirty: true,
        }
    }
}

impl Default for ActiveTheme {
    fn default() -> Self {
        Self::clean(DEFAULT_THEME_NAME.to_string(), Theme::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn setup_test_store() -> (ThemeStore, PathBuf) {
        let test_dir = std::env::temp_dir().join(format!("test_themes_{}", Uuid::new_v4()));
        let store = ThemeStore::new(test_dir.join("themes"));
        (store, test_dir)
    }

    fn cleanup_test_dir(test_dir: &Path) {
        let _ = fs::remove_dir_all(test_dir);
    }

    #[test]
    fn test_list_always_contains_default() {
        let (store, test_dir) = setup_test_store();
        assert_eq!(store.list(), vec!["default"]);

        fs::create_dir_all(store.themes_dir()).unwrap();
        fs::write(store.theme_path("zebra"), "{}").unwrap();
        fs::write(store.theme_path("apple"), "{}").unwrap();
        fs::write(store.theme_path("default"), "{}").unwrap();
        fs::write(store.themes_dir().join("notes.txt"), "x").unwrap();

        assert_eq!(store.list(), vec!["apple", "default", "zebra"]);

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_save_and_load() {
        let (store, test_dir) = setup_test_store();

        let mut theme = ActiveTheme::clean("night".to_string(), Theme::default());
        theme.update(|t| t.background_color = [0.1, 0.1, 0.2]);
        assert!(theme.is_dirty());

        store.save(&mut theme).unwrap();
        assert!(!theme.is_dirty());

        let loaded = store.load("night");
        assert_eq!(loaded.name(), "night");
        assert!(!loaded.is_dirty());
        assert_eq!(loaded.properties().background_color, [0.1, 0.1, 0.2]);

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_default_theme_is_never_saved() {
        let (store, test_dir) = setup_test_store();

        let mut theme = ActiveTheme::default();
        theme.update(|t| t.show_numbers = false);
        assert!(matches!(
            store.save(&mut theme),
            Err(ThemeError::DefaultTheme(_))
        ));
        assert!(theme.is_dirty());
        assert!(!store.theme_path("default").exists());

        // A stray default.json on disk is ignored when loading
        fs::create_dir_all(store.themes_dir()).unwrap();
        fs::write(store.theme_path("default"), r#"{"show_numbers": false}"#).unwrap();
        assert!(store.load("default").properties().show_numbers);

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_corrupted_theme_falls_back_to_defaults() {
        let (store, test_dir) = setup_test_store();
        fs::create_dir_all(store.themes_dir()).unwrap();
        fs::write(store.theme_path("broken"), "{ not json").unwrap();

        let loaded = store.load("broken");
        assert_eq!(loaded.name(), "broken");
        assert_eq!(loaded.properties(), &Theme::default());
        assert!(!loaded.is_dirty());

        // File left as-is
        let content = fs::read_to_string(store.theme_path("broken")).unwrap();
        assert_eq!(content, "{ not json");

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_missing_theme_uses_defaults() {
        let (store, test_dir) = setup_test_store();
        let loaded = store.load("ghost");
        assert_eq!(loaded.properties(), &Theme::default());
        assert!(store.read("ghost").is_err());
        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_update_tracks_real_changes_only() {
        let mut theme = ActiveTheme::default();
        assert!(!theme.update(|t| t.show_numbers = true));
        assert!(!theme.is_dirty());

        assert!(theme.update(|t| t.number_size = 0.2));
        assert!(theme.is_dirty());
    }

    #[test]
    fn test_duplicate_is_dirty_copy() {
        let mut theme = ActiveTheme::clean("base".to_string(), Theme::default());
        theme.update(|t| t.rim_width = 0.05);

        let copy = theme.duplicate("base_copy");
        assert_eq!(copy.name(), "base_copy");
        assert!(copy.is_dirty());
        assert_eq!(copy.properties(), theme.properties());
    }

    #[test]
    fn test_save_as_switches_active_theme() {
        let (store, test_dir) = setup_test_store();

        let mut theme = ActiveTheme::default();
        theme.update(|t| t.use_roman_numerals = true);
        store.save_as(&mut theme, "  roman ").unwrap();

        assert_eq!(theme.name(), "roman");
        assert!(!theme.is_dirty());
        assert!(store.read("roman").unwrap().use_roman_numerals);

        let mut other = ActiveTheme::default();
        assert!(matches!(
            store.save_as(&mut other, "default"),
            Err(ThemeError::DefaultTheme(_))
        ));
        assert!(matches!(
            store.save_as(&mut other, "   "),
            Err(ThemeError::InvalidName(_))
        ));
        assert!(other.is_default());

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_delete() {
        let (store, test_dir) = setup_test_store();
        let mut theme = ActiveTheme::clean("gone".to_string(), Theme::default());
        store.save(&mut theme).unwrap();
        assert!(store.list().contains(&"gone".to_string()));

        store.delete("gone").unwrap();
        assert!(!store.list().contains(&"gone".to_string()));
        assert!(store.delete("gone").is_ok());
        assert!(store.delete("default").is_err());

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_install_bundled_never_overwrites() {
        let (store, test_dir) = setup_test_store();
        let bundled = test_dir.join("bundled");
        fs::create_dir_all(&bundled).unwrap();
        fs::write(bundled.join("mine.json"), r#"{"show_numbers": false}"#).unwrap();
        fs::write(bundled.join("fresh.json"), r#"{"rim_width": 0.03}"#).unwrap();
        fs::write(bundled.join("README"), "skip me").unwrap();

        fs::create_dir_all(store.themes_dir()).unwrap();
        fs::write(store.theme_path("mine"), r#"{"show_numbers": true}"#).unwrap();

        assert_eq!(store.install_bundled(&bundled).unwrap(), 1);
        assert!(store.read("mine").unwrap().show_numbers);
        assert_eq!(store.read("fresh").unwrap().rim_width, 0.03);
        assert!(!store.themes_dir().join("README").exists());

        assert_eq!(store.install_bundled(&bundled).unwrap(), 0);
        assert_eq!(
            store.install_bundled(&test_dir.join("missing")).unwrap(),
            0
        );

        cleanup_test_dir(&test_dir);
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("night_owl").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(" padded").is_err());
        assert!(validate_name("../escape").is_err());
        assert!(validate_name(".hidden").is_err());
    }

    #[test]
    fn test_failed_save_makes_theme_dirty_again() {
        let mut theme = ActiveTheme::clean("night".to_string(), Theme::default());
        theme.update(|t| t.rim_width = 0.05);
        theme.mark_saved();
        assert!(!theme.is_dirty());

        assert!(!theme.save_failed("other"));
        assert!(!theme.is_dirty());

        assert!(theme.save_failed("night"));
        assert!(theme.is_dirty());
        assert_eq!(theme.properties().rim_width, 0.05);
    }
}
