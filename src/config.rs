//! Sandstone configuration
//!
//! Read from a TOML file; every field is optional and keys are camelCase
//! throughout, matching the JSON files:
//!
//! ```toml
//! dataDir = "/home/me/.local/share/sandstone"
//!
//! [study]
//! includeNew = true
//! cardLimit = 20
//! focusWeak = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::flashcards::{FlashcardError, Result, StudyModeConfig};

const APP_DIR_NAME: &str = "sandstone";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SandstoneConfig {
    /// Where decks and review history live; platform data dir when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Defaults for `study` when no flags are given
    pub study: StudyModeConfig,
}

impl SandstoneConfig {
    /// Load the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Platform config file location (e.g. ~/.config/sandstone/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR_NAME).join("config.toml"))
    }

    /// Configured data directory, falling back to the platform default
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }
}

/// Platform data directory (e.g. ~/.local/share/sandstone)
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|p| p.join(APP_DIR_NAME))
        .ok_or(FlashcardError::DataDirNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = SandstoneConfig::load(&temp.path().join("nope.toml")).unwrap();
        assert_eq!(config, SandstoneConfig::default());
        assert!(config.study.include_new);
    }

    #[test]
    fn test_load_partial_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "dataDir = \"/tmp/sandstone\"\n\n[study]\ncardLimit = 20\nfocusWeak = true\n",
        )
        .unwrap();

        let config = SandstoneConfig::load(&path).unwrap();
        assert_eq!(config.resolve_data_dir().unwrap(), PathBuf::from("/tmp/sandstone"));
        assert_eq!(config.study.card_limit, Some(20));
        assert!(config.study.focus_weak);
        assert!(config.study.include_review);
        assert!(!config.study.shuffle);
    }

    #[test]
    fn test_keys_are_camel_case() {
        let config = SandstoneConfig {
            data_dir: Some(PathBuf::from("/srv/sandstone")),
            study: StudyModeConfig {
                card_limit: Some(10),
                ..StudyModeConfig::default()
            },
        };
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("dataDir"));
        assert!(text.contains("cardLimit"));
        assert!(!text.contains("data_dir"));
        assert!(!text.contains("card_limit"));

        let parsed: SandstoneConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[study]\ncardLimit = \"many\"\n").unwrap();

        assert!(matches!(
            SandstoneConfig::load(&path),
            Err(FlashcardError::Config(_))
        ));
    }
}
