use std::fmt;
use std::path::Path;

use log::{debug, info};
use serde::Deserialize;
use tokio::fs;

/// Local updater settings, read from `config.toml`.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Tag of the last release that was fully installed.
    pub current_version: String,
    #[serde(rename = "elden_ring_game_path")]
    pub install_path: String,
    #[serde(rename = "github_read_token")]
    pub access_token: String,
    /// Keep the local `ersc_settings.ini` instead of the one shipped in the archive.
    #[serde(rename = "ignore_ini_file")]
    pub ignore_existing_settings: bool,
}

// The token stays out of log output.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("current_version", &self.current_version)
            .field("install_path", &self.install_path)
            .field("access_token", &"<redacted>")
            .field("ignore_existing_settings", &self.ignore_existing_settings)
            .finish()
    }
}

impl Config {
    pub fn parse(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("invalid config: {e}"))
    }

    pub async fn load(path: &Path) -> Result<Self, String> {
        info!("config: reading {}", path.display());
        let contents = fs::read_to_string(path).await.map_err(|e| {
            format!(
                "could not find or read the config file [{}]: {e}",
                path.display()
            )
        })?;
        let config = Self::parse(&contents)
            .map_err(|e| format!("could not parse the config file [{}]: {e}", path.display()))?;
        debug!("config: loaded {config:?}");
        Ok(config)
    }
}
