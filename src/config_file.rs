use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::messages::Messages;

const CONFIG_DIR_NAME: &str = "foodee";
const CONFIG_FILE_NAME: &str = "config.json";

/// Settings shared by the window and the CLI.
///
/// Every key is optional; a missing file means all defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub model_path: Option<PathBuf>,
    pub labels_path: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub last_browse_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub messages: HashMap<String, String>,

    /// Where this config was loaded from; relative paths resolve against it
    #[serde(skip)]
    source: Option<PathBuf>,
}

impl AppConfig {
    /// Default location: `<config dir>/foodee/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load `explicit` if given, otherwise the default location if it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                Some(path) => Ok(Self {
                    source: Some(path),
                    ..Self::default()
                }),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: AppConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config.source = Some(path.to_path_buf());

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Write back to the file this config came from.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.source else {
            anyhow::bail!("no config location available");
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    pub fn model_path(&self) -> PathBuf {
        self.resolve(self.model_path.as_deref(), "best.onnx")
    }

    pub fn labels_path(&self) -> PathBuf {
        self.resolve(self.labels_path.as_deref(), "labels.txt")
    }

    pub fn database_path(&self) -> PathBuf {
        self.resolve(self.database_path.as_deref(), "food.db")
    }

    pub fn log_dir(&self) -> PathBuf {
        match &self.log_dir {
            Some(dir) => self.resolve(Some(dir), "logs"),
            None => self
                .source
                .as_deref()
                .and_then(Path::parent)
                .map(|dir| dir.join("logs"))
                .unwrap_or_else(|| PathBuf::from(".logs")),
        }
    }

    /// Localized text table with this config's overrides applied
    pub fn messages(&self) -> Messages {
        Messages::with_overrides(&self.messages)
    }

    fn resolve(&self, configured: Option<&Path>, default_name: &str) -> PathBuf {
        let path = configured.unwrap_or_else(|| Path::new(default_name));
        if path.is_absolute() {
            return path.to_path_buf();
        }
        // Defaults stay relative to the working directory when no file was loaded
        match self.source.as_deref().and_then(Path::parent) {
            Some(base) if configured.is_some() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::MessageId;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::default();
        assert_eq!(config.model_path(), PathBuf::from("best.onnx"));
        assert_eq!(config.labels_path(), PathBuf::from("labels.txt"));
        assert_eq!(config.database_path(), PathBuf::from("food.db"));
        assert_eq!(config.log_dir(), PathBuf::from(".logs"));
    }

    #[test]
    fn test_relative_paths_resolve_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "modelPath": "models/best.onnx", "databasePath": "/data/food.db" }"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.model_path(), dir.path().join("models/best.onnx"));
        assert_eq!(config.database_path(), PathBuf::from("/data/food.db"));
        assert_eq!(config.labels_path(), PathBuf::from("labels.txt"));
        assert_eq!(config.log_dir(), dir.path().join("logs"));
    }

    #[test]
    fn test_message_overrides_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "messages": { "warning_title": "Warning" } }"#).unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.messages().get(MessageId::WarningTitle), "Warning");
    }

    #[test]
    fn test_parse_error_mentions_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn test_save_round_trips_browse_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{}").unwrap();

        let mut config = AppConfig::load_from(&path).unwrap();
        config.last_browse_dir = Some(PathBuf::from("/home/user/Pictures"));
        config.save().unwrap();

        let reloaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(
            reloaded.last_browse_dir,
            Some(PathBuf::from("/home/user/Pictures"))
        );
    }

    #[test]
    fn test_save_without_location_fails() {
        assert!(AppConfig::default().save().is_err());
    }
}
