use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;

use crate::config::Config;
use crate::engine::UpdateEngine;
use crate::engine::state::RunOutcome;
use crate::networking::NetworkClient;
use crate::storage::StorageManager;

mod config;
mod engine;
mod env;
mod installer;
mod networking;
mod storage;
mod updater;
mod util;

#[derive(Parser, Debug)]
#[command(
    name = "ersc-updater",
    author,
    version,
    about = "Keeps an Elden Ring Seamless Co-op install in sync with the latest upstream release"
)]
struct Cli {
    /// Path to the updater config file.
    #[arg(short, long, default_value_os_t = env::default_config_path())]
    config: PathBuf,

    /// Report whether an update is available without installing it.
    #[arg(long)]
    check: bool,

    /// Print updater version and exit.
    #[arg(long)]
    version_only: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if cli.version_only {
        println!("ersc-updater {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    let result = run(&cli).await;
    match &result {
        Ok(outcome) => println!("{}", summary(outcome)),
        Err(err) => eprintln!("error: {err}"),
    }
    ExitCode::from(exit_status(&result))
}

/// Every failure collapses to status 1.
fn exit_status(result: &Result<RunOutcome, String>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

async fn run(cli: &Cli) -> Result<RunOutcome, String> {
    let config = Config::load(&cli.config).await?;
    let network = NetworkClient::new(config.access_token.clone());
    let storage = StorageManager::new(&cli.config);
    let mut engine = UpdateEngine::new(config, storage, network);
    engine.run(cli.check).await
}

fn summary(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::UpToDate { version } => format!("Up to date! [{version}]"),
        RunOutcome::UpdateAvailable {
            current_version,
            latest_version,
        } => format!(
            "Installed [{current_version}], run without --check to install [{latest_version}]"
        ),
        RunOutcome::Updated {
            previous_version,
            version,
            report,
        } => format!(
            "Updated to latest version [{version}] (was [{previous_version}])\n\
             {} files written, {} skipped",
            report.written, report.skipped
        ),
    }
}
