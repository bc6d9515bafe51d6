use crate::installer::InstallReport;

/// How a run of the updater ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    UpToDate {
        version: String,
    },
    /// Reported by `--check`; nothing was downloaded.
    UpdateAvailable {
        current_version: String,
        latest_version: String,
    },
    Updated {
        previous_version: String,
        version: String,
        report: InstallReport,
    },
}
