//! Key-value store for user preferences (last searched city, theme).
//!
//! The aggregator never reads or writes preferences; front-ends inject a
//! store and decide when to consult it.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

pub const LAST_CITY_KEY: &str = "lastCity";
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Theme {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(anyhow!("Unknown theme '{value}'. Supported themes: light, dark.")),
        }
    }
}

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn last_city(&self) -> Option<String> {
        self.get(LAST_CITY_KEY).filter(|c| !c.trim().is_empty())
    }

    fn set_last_city(&mut self, city: &str) -> Result<()> {
        self.set(LAST_CITY_KEY, city)
    }

    /// Stored theme; anything other than "dark" reads as light.
    fn theme(&self) -> Theme {
        match self.get(THEME_KEY).as_deref() {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.set(THEME_KEY, theme.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// TOML-backed store; every `set` is written through to disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at the platform data directory.
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Open (or lazily create) the store at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Ok(Self {
                path,
                values: BTreeMap::new(),
            });
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read preferences file: {}", path.display()))?;
        let values = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse preferences file: {}", path.display()))?;

        Ok(Self { path, values })
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "forecast", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(dirs.data_dir().join("preferences.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(&self.values)
            .context("Failed to serialize preferences to TOML")?;
        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write preferences file: {}", self.path.display()))
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_overwrites_values() {
        let mut store = MemoryStore::new();
        store.set(LAST_CITY_KEY, "Oslo").unwrap();
        store.set(LAST_CITY_KEY, "Bergen").unwrap();

        assert_eq!(store.get(LAST_CITY_KEY).as_deref(), Some("Bergen"));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn memory_store_defaults() {
        let store = MemoryStore::new();
        assert_eq!(store.last_city(), None);
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn blank_last_city_reads_as_none() {
        let mut store = MemoryStore::new();
        store.set_last_city("  ").unwrap();
        assert_eq!(store.last_city(), None);

        store.set_last_city("Oslo").unwrap();
        assert_eq!(store.last_city().as_deref(), Some("Oslo"));
    }

    #[test]
    fn theme_round_trips_through_string() {
        let mut store = MemoryStore::new();
        store.set_theme(Theme::Dark).unwrap();

        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(store.theme(), Theme::Dark);
        assert_eq!(store.theme().toggled(), Theme::Light);
    }

    #[test]
    fn unknown_theme_is_rejected() {
        let err = Theme::try_from("sepia").unwrap_err();
        assert!(err.to_string().contains("Unknown theme"));
        assert_eq!(Theme::try_from("DARK").unwrap(), Theme::Dark);
    }

    #[test]
    fn file_store_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.toml");

        let mut store = FileStore::open(&path).unwrap();
        store.set_last_city("Lisbon, PT").unwrap();
        store.set_theme(Theme::Dark).unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.last_city().as_deref(), Some("Lisbon, PT"));
        assert_eq!(reopened.theme(), Theme::Dark);
    }

    #[test]
    fn file_store_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "this is = = not toml").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse preferences file"));
    }
}
