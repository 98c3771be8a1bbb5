//! Configuration management.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::telemetry::LoggingConfig;
use crate::views::DEFAULT_RECENT_LIMIT;

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TutorConfig {
    /// Where ledger collections are stored
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Derived view settings
    #[serde(default)]
    pub views: ViewsConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding one JSON file per collection
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ViewsConfig {
    /// Entries shown in "recent" lists
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf { PathBuf::from(".tutor") }
fn default_recent_limit() -> usize { DEFAULT_RECENT_LIMIT }

impl TutorConfig {
    /// Load configuration from `TUTOR__`-prefixed environment variables.
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("TUTOR").separator("__"))
            .build()?;

        let cfg: TutorConfig = config.try_deserialize()?;
        Ok(cfg)
    }

    /// Load from a file (if it exists), then apply environment overrides.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("TUTOR").separator("__"))
            .build()?;

        let cfg: TutorConfig = config.try_deserialize()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::LogFormat;

    #[test]
    fn test_defaults() {
        let cfg = TutorConfig::default();
        assert_eq!(cfg.storage.data_dir, PathBuf::from(".tutor"));
        assert_eq!(cfg.views.recent_limit, 20);
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tutor.toml");
        std::fs::write(
            &path,
            "[storage]\ndata_dir = \"/srv/tutor\"\n\n[logging]\nformat = \"json\"\n\n[views]\nrecent_limit = 5\n",
        )
        .unwrap();

        let cfg = TutorConfig::from_file(&path).unwrap();
        assert_eq!(cfg.storage.data_dir, PathBuf::from("/srv/tutor"));
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.views.recent_limit, 5);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = TutorConfig::from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.storage, StorageConfig::default());
    }
}
