use std::path::PathBuf;

/// Upstream GitHub account publishing the mod releases.
pub const REPO_OWNER: &str = "LukeYui";
/// Upstream repository holding the published releases.
pub const REPO_NAME: &str = "EldenRingSeamlessCoopRelease";
/// The only asset name accepted at index 0 of a release.
pub const RELEASE_ASSET_NAME: &str = "ersc.zip";
/// Archive entry preserved when `ignore_ini_file` is set.
pub const SETTINGS_ENTRY: &str = "SeamlessCoop/ersc_settings.ini";

pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const GITHUB_API_VERSION: &str = "2022-11-28";

const CONFIG_FILE: &str = "config.toml";

/// Endpoint returning the latest published release of the upstream repository.
pub fn latest_release_url() -> String {
    format!("{GITHUB_API_BASE}/repos/{REPO_OWNER}/{REPO_NAME}/releases/latest")
}

/// Config file location, relative to the working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(".").join(CONFIG_FILE)
}

pub fn user_agent() -> String {
    format!("ersc-updater/{}", env!("CARGO_PKG_VERSION"))
}
