use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{
    errors::FormError,
    utils::{
        self,
        persistence::{load_json, save_json},
    },
};

const DEFAULT_COLLECTION: &str = "members";

/// Keys accepted by `config set`.
pub const CONFIG_KEYS: &[&str] = &["store_path", "collection", "audible_alerts"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_audible_alerts")]
    pub audible_alerts: bool,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.into()
}

fn default_audible_alerts() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: None,
            collection: default_collection(),
            audible_alerts: default_audible_alerts(),
        }
    }
}

impl Config {
    /// Record store file: the configured one, or `members.json` in the app dir.
    pub fn resolved_store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(utils::default_store_file)
    }

    /// Updates one setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), FormError> {
        match key {
            "store_path" => {
                self.store_path = if value.trim().is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "collection" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(FormError::Config("collection name must not be empty".into()));
                }
                self.collection = value.to_string();
            }
            "audible_alerts" => {
                self.audible_alerts = match value.trim().to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    other => {
                        return Err(FormError::Config(format!(
                            "`{other}` is not a boolean (use true/false)"
                        )))
                    }
                };
            }
            other => {
                return Err(FormError::Config(format!(
                    "unknown setting `{other}` (expected one of: {})",
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// `(key, value)` pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "store_path",
                self.resolved_store_path().display().to_string(),
            ),
            ("collection", self.collection.clone()),
            ("audible_alerts", self.audible_alerts.to_string()),
        ]
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::with_path(utils::config_file())
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the stored config; a missing file yields the defaults.
    pub fn load(&self) -> Result<Config, FormError> {
        Ok(load_json(&self.path)?.unwrap_or_default())
    }

    pub fn save(&self, config: &Config) -> Result<(), FormError> {
        save_json(config, &self.path)?;
        tracing::info!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
