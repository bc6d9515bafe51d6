use std::path::Path;

use log::info;

use crate::config::Config;
use crate::engine::models::ReleaseInfo;
use crate::engine::state::RunOutcome;
use crate::installer;
use crate::storage::StorageManager;
use crate::updater::{self, UpdateStatus};
use crate::util::format_size;

pub mod models;
pub mod state;

/// Where release metadata and archives come from.
#[allow(async_fn_in_trait)]
pub trait ReleaseSource {
    async fn latest_release(&mut self) -> Result<ReleaseInfo, String>;
    async fn download(&mut self, url: &str) -> Result<Vec<u8>, String>;
}

pub struct UpdateEngine<S> {
    config: Config,
    storage: StorageManager,
    source: S,
}

impl<S: ReleaseSource> UpdateEngine<S> {
    pub fn new(config: Config, storage: StorageManager, source: S) -> Self {
        Self {
            config,
            storage,
            source,
        }
    }

    /// Run one update pass. With `check_only` the run stops once an update is known to be
    /// available and valid.
    ///
    /// The recorded version is only rewritten after every archive entry was extracted.
    pub async fn run(&mut self, check_only: bool) -> Result<RunOutcome, String> {
        let release = self.source.latest_release().await?;
        let current = self.config.current_version.clone();

        let (latest_version, download_url) =
            match updater::check_for_updates(&current, &release)? {
                UpdateStatus::UpToDate => {
                    return Ok(RunOutcome::UpToDate { version: current });
                }
                UpdateStatus::UpdateAvailable {
                    latest_version,
                    download_url,
                } => (latest_version, download_url),
            };

        println!("New version available! Upgrade: [{current} → {latest_version}]");
        if check_only {
            return Ok(RunOutcome::UpdateAvailable {
                current_version: current,
                latest_version,
            });
        }

        println!("Downloading zip from: {download_url}");
        let data = self.source.download(&download_url).await?;
        info!("engine: downloaded {}", format_size(data.len()));

        let report = installer::install_archive(
            &data,
            Path::new(&self.config.install_path),
            self.config.ignore_existing_settings,
        )?;

        self.storage.write_current_version(&latest_version).await?;
        self.config.current_version = latest_version.clone();

        Ok(RunOutcome::Updated {
            previous_version: current,
            version: latest_version,
            report,
        })
    }
}
