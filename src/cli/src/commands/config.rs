//! Configuration management commands.
//!
//! Stores CLI configuration in `~/.tutor/config.toml`. Runtime settings
//! (logging, storage, views) are read from `~/.tutor/tutor.toml` or the file
//! passed with `--config`.

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tutor_core::config::TutorConfig;

use crate::output::{self, OutputFormat};

/// Keys the CLI reads back.
const KNOWN_KEYS: [&str; 2] = ["data-dir", "current-student"];

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key (data-dir or current-student)
        key: String,
        /// Value to set
        value: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Show all configuration
    Show,

    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Persistent CLI configuration stored on disk.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

/// Return the path to the configuration file (`~/.tutor/config.toml`).
fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".tutor").join("config.toml"))
}

/// Default runtime settings file (`~/.tutor/tutor.toml`).
pub fn settings_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".tutor").join("tutor.toml"))
}

/// Load runtime settings from `explicit`, else the default settings file.
/// A missing file yields defaults; `TUTOR__` env vars override either.
pub fn load_settings(explicit: Option<&Path>) -> Result<TutorConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match settings_path() {
            Ok(path) => path,
            Err(_) => return TutorConfig::load(),
        },
    };
    TutorConfig::from_file(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))
}

/// Load the CLI configuration from disk, returning defaults if the file does
/// not exist.
fn load_config() -> Result<CliConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(CliConfig::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let cfg: CliConfig =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    Ok(cfg)
}

/// Save the CLI configuration to disk, creating the directory if needed.
fn save_config(cfg: &CliConfig) -> Result<()> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(cfg).context("Failed to serialize config")?;
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Load a single value from the config file, if set.
pub fn load_value(key: &str) -> Option<String> {
    load_config()
        .ok()
        .and_then(|cfg| cfg.values.get(key).cloned())
}

/// Set a single value and write the file back.
pub fn store_value(key: &str, value: &str) -> Result<()> {
    let mut cfg = load_config()?;
    cfg.values.insert(key.to_string(), value.to_string());
    save_config(&cfg)
}

/// Remove a single value, if present.
pub fn clear_value(key: &str) -> Result<()> {
    let mut cfg = load_config()?;
    if cfg.values.remove(key).is_some() {
        save_config(&cfg)?;
    }
    Ok(())
}

pub fn execute(cmd: ConfigCommands, format: OutputFormat) -> Result<()> {
    match cmd {
        ConfigCommands::Set { key, value } => {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                output::print_warning(&format!(
                    "Unknown key '{}' (known: {})",
                    key,
                    KNOWN_KEYS.join(", ")
                ));
            }
            store_value(&key, &value)?;

            match format {
                OutputFormat::Table => {
                    output::print_success(&format!("{} = {}", key, value));
                }
                _ => {
                    output::print_item(
                        &serde_json::json!({ "key": key, "value": value }),
                        format,
                    )?;
                }
            }
        }

        ConfigCommands::Get { key } => {
            let cfg = load_config()?;
            match cfg.values.get(&key) {
                Some(value) => match format {
                    OutputFormat::Table => println!("{}", value),
                    _ => {
                        output::print_item(
                            &serde_json::json!({ "key": key, "value": value }),
                            format,
                        )?;
                    }
                },
                None => {
                    output::print_error(&format!("Key '{}' not found", key));
                }
            }
        }

        ConfigCommands::Show => {
            let cfg = load_config()?;

            if cfg.values.is_empty() {
                output::print_info("No configuration values set.");
                return Ok(());
            }

            match format {
                OutputFormat::Table => {
                    output::print_header("Configuration");
                    for (k, v) in &cfg.values {
                        output::print_detail(k, v);
                    }
                }
                _ => output::print_item(&cfg.values, format)?,
            }
        }

        ConfigCommands::Reset { force } => {
            if !force {
                output::print_info(
                    "This will reset all CLI configuration. Use --force to confirm.",
                );
                return Ok(());
            }

            let path = config_path()?;
            if path.exists() {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
            }

            output::print_success("Configuration reset to defaults");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_toml_shape() {
        let mut cfg = CliConfig::default();
        cfg.values.insert("data-dir".into(), "/srv/tutor".into());
        cfg.values.insert("current-student".into(), "student-1".into());

        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: CliConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.values, cfg.values);
        assert!(text.contains("[values]"));
    }

    #[test]
    fn test_load_settings_reads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tutor.toml");
        std::fs::write(&path, "[views]\nrecent_limit = 5\n").unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.views.recent_limit, 5);
    }

    #[test]
    fn test_load_settings_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(settings.views.recent_limit, TutorConfig::default().views.recent_limit);
    }

    #[test]
    fn test_settings_file_is_separate_from_cli_values() {
        let settings = settings_path().unwrap();
        let values = config_path().unwrap();
        assert_eq!(settings.parent(), values.parent());
        assert_ne!(settings, values);
    }

    #[test]
    fn test_empty_file_is_default() {
        let parsed: CliConfig = toml::from_str("").unwrap();
        assert!(parsed.values.is_empty());
    }
}
