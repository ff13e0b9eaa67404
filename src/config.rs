use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// One selectable test length. `label` is what the menu shows; `seconds` is
/// how long the countdown actually runs, which need not match the label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DurationOption {
    pub label: String,
    pub caption: String,
    pub seconds: u32,
}

impl DurationOption {
    pub fn new(label: &str, caption: &str, seconds: u32) -> Self {
        Self {
            label: label.to_string(),
            caption: caption.to_string(),
            seconds,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub durations: Vec<DurationOption>,
    pub default_duration: Option<String>,
    pub sound: bool,
    pub report_base_url: Option<String>,
    pub paragraphs_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            durations: vec![
                DurationOption::new("15", "seconds", 15),
                DurationOption::new("30", "seconds", 30),
                DurationOption::new("60", "seconds", 60),
                DurationOption::new("3", "minutes", 180),
            ],
            default_duration: None,
            sound: true,
            report_base_url: None,
            paragraphs_path: None,
        }
    }
}

impl Config {
    pub fn duration(&self, label: &str) -> Result<&DurationOption> {
        self.durations
            .iter()
            .find(|d| d.label == label)
            .ok_or_else(|| Error::UnknownDuration {
                label: label.to_string(),
            })
    }

    /// Countdown length behind a menu label
    pub fn duration_for(&self, label: &str) -> Result<u32> {
        self.duration(label).map(|d| d.seconds)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
    fn exists(&self) -> bool;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "typedash") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("typedash_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable config");
                }
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        assert!(!store.exists());
        store.save(&cfg).unwrap();
        assert!(store.exists());
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            durations: vec![DurationOption::new("5", "seconds", 5)],
            default_duration: Some("5".into()),
            sound: false,
            report_base_url: Some("http://localhost:5001".into()),
            paragraphs_path: Some(PathBuf::from("/tmp/data.json")),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{{{").unwrap();
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{"sound": false}"#).unwrap();
        let loaded = FileConfigStore::with_path(&path).load();
        assert!(!loaded.sound);
        assert_eq!(loaded.durations, Config::default().durations);
    }

    #[test]
    fn three_minute_label_runs_for_180_seconds() {
        let cfg = Config::default();
        assert_eq!(cfg.duration_for("3").unwrap(), 180);
        assert_eq!(cfg.duration_for("15").unwrap(), 15);
        assert_eq!(cfg.duration_for("60").unwrap(), 60);
    }

    #[test]
    fn unknown_label_is_an_error() {
        let cfg = Config::default();
        assert_matches!(
            cfg.duration_for("45"),
            Err(Error::UnknownDuration { label }) if label == "45"
        );
    }
}
