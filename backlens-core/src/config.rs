// User configuration stored as config.json in the config directory

use crate::error::{CoreError, Result};
use backlens_client::ApiClient;
use backlens_client::client::{DEFAULT_API_BASE, DEFAULT_APP_NAME, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_DIR: &str = "~/.config/backlens/";
pub const CONFIG_FILE: &str = "config.json";
/// Plain-text key file the data backend reads; used when config.json has no key.
pub const API_KEY_FILE: &str = "api.txt";
pub const API_KEY_ENV: &str = "BACKLENS_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub app_name: String,
    pub timeout_secs: u64,
    /// Directory of saved analyses, `<data_dir>/<domain>/index.json`
    pub data_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            data_dir: "~/.config/backlens/data".to_string(),
        }
    }
}

/// Expand a leading `~` the way the CLI defaults are written.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

impl Config {
    /// Load from `dir`, falling back to defaults for a missing file. An empty
    /// key is filled from `api.txt`, then from the environment.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        let mut config = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| CoreError::io(&path, e))?;
            serde_json::from_str(&contents).map_err(|e| CoreError::json(&path, e))?
        } else {
            debug!("No config at {}, using defaults", path.display());
            Config::default()
        };

        if config.api_key.trim().is_empty() {
            let key_path = dir.join(API_KEY_FILE);
            if key_path.exists() {
                config.api_key = fs::read_to_string(&key_path)
                    .map_err(|e| CoreError::io(&key_path, e))?
                    .trim()
                    .to_string();
            }
        }

        if config.api_key.trim().is_empty() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                config.api_key = key.trim().to_string();
            }
        }

        Ok(config)
    }

    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|e| CoreError::io(dir, e))?;
        let path = dir.join(CONFIG_FILE);
        let contents = serde_json::to_string_pretty(self).map_err(|e| CoreError::json(&path, e))?;
        fs::write(&path, contents).map_err(|e| CoreError::io(&path, e))?;
        Ok(path)
    }

    pub fn data_dir(&self) -> PathBuf {
        expand_path(&self.data_dir)
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Build a provider client from these settings.
    pub fn client(&self) -> Result<ApiClient> {
        if !self.has_api_key() {
            return Err(CoreError::Config(format!(
                "no API key configured (run `backlens init --api-key <KEY>` or set {})",
                API_KEY_ENV
            )));
        }

        let client = ApiClient::with_timeout(self.api_key.trim(), self.timeout_secs)?
            .with_base_url(&self.api_base)?
            .with_app_name(self.app_name.clone());
        Ok(client)
    }
}
