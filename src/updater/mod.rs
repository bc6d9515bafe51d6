use log::{debug, info};

use crate::engine::models::{ReleaseAsset, ReleaseInfo};
use crate::env::RELEASE_ASSET_NAME;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    UpToDate,
    UpdateAvailable {
        latest_version: String,
        download_url: String,
    },
}

/// Decide whether `release` should be installed over `current_version`.
///
/// Tags are compared by exact string equality, so any difference (including a
/// remote tag that sorts lower) counts as an update.
///
/// # Errors
/// Returns an error string when an update is due but the release does not carry
/// a usable `ersc.zip` as its first asset.
pub fn check_for_updates(
    current_version: &str,
    release: &ReleaseInfo,
) -> Result<UpdateStatus, String> {
    if release.tag_name == current_version {
        debug!("updater: tag {} matches local version", release.tag_name);
        return Ok(UpdateStatus::UpToDate);
    }

    info!(
        "updater: remote tag {} differs from local {}",
        release.tag_name, current_version
    );
    let asset = validate_assets(release)?;
    Ok(UpdateStatus::UpdateAvailable {
        latest_version: release.tag_name.clone(),
        download_url: asset.browser_download_url.clone(),
    })
}

/// Only the first asset is considered; a matching asset further down the list is not used.
fn validate_assets(release: &ReleaseInfo) -> Result<&ReleaseAsset, String> {
    let asset = release
        .assets
        .first()
        .ok_or_else(|| format!("no assets for release [{}]", release.tag_name))?;
    if asset.name != RELEASE_ASSET_NAME {
        return Err(format!(
            "only expecting one asset named {RELEASE_ASSET_NAME}, but found [{}] instead",
            asset.name
        ));
    }
    if asset.browser_download_url.is_empty() {
        return Err(format!("missing download URL for {RELEASE_ASSET_NAME}"));
    }
    Ok(asset)
}
