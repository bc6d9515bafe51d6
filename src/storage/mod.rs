use std::path::PathBuf;

use log::{debug, info};
use regex::{NoExpand, Regex};
use tokio::fs;

const VERSION_PATTERN: &str = r#"current_version\s*=\s*".*""#;

/// Persists the installed version back into the config file.
#[derive(Clone, Debug)]
pub struct StorageManager {
    config_path: PathBuf,
}

impl StorageManager {
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Rewrite the `current_version` line in place, leaving every other byte untouched.
    pub async fn write_current_version(&self, version: &str) -> Result<(), String> {
        let path = &self.config_path;
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| format!("could not read file {} [{e}]", path.display()))?;
        let updated = replace_version(&content, version)?;
        if updated == content {
            debug!("storage: no current_version line changed in {}", path.display());
        }
        fs::write(path, updated.as_bytes()).await.map_err(|e| {
            format!(
                "could not update file {} with latest version [{e}]",
                path.display()
            )
        })?;
        info!("storage: recorded version {version} in {}", path.display());
        Ok(())
    }
}

fn replace_version(content: &str, version: &str) -> Result<String, String> {
    let re = Regex::new(VERSION_PATTERN).map_err(|e| format!("invalid version pattern: {e}"))?;
    let replacement = format!(r#"current_version = "{version}""#);
    Ok(re.replace_all(content, NoExpand(&replacement)).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"current_version = "v1.0.0"
elden_ring_game_path = "./test_output/"
github_read_token = "test_token"
ignore_ini_file = true
"#;

    #[test]
    fn replaces_only_the_version_line() {
        let updated = replace_version(CONFIG, "v2.0.0").unwrap();
        let expected = CONFIG.replace(r#""v1.0.0""#, r#""v2.0.0""#);
        assert_eq!(updated, expected);

        let before: Vec<_> = CONFIG.lines().collect();
        let after: Vec<_> = updated.lines().collect();
        assert_eq!(after[0], r#"current_version = "v2.0.0""#);
        assert_eq!(before[1..], after[1..]);
    }

    #[test]
    fn normalises_spacing_around_equals() {
        let updated = replace_version("current_version=\"v1\"\n", "v2").unwrap();
        assert_eq!(updated, "current_version = \"v2\"\n");
    }

    #[test]
    fn inserts_tag_literally() {
        let updated = replace_version(CONFIG, "v$1.0").unwrap();
        assert!(updated.starts_with(r#"current_version = "v$1.0""#));
    }

    #[test]
    fn unmatched_content_is_unchanged() {
        let content = "# no version here\nignore_ini_file = false\n";
        assert_eq!(replace_version(content, "v9").unwrap(), content);
    }

    #[test]
    fn keeps_comments_and_crlf_line_endings() {
        let content = "# updater settings\r\ncurrent_version = \"v1\"\r\nignore_ini_file = true\r\n";
        let updated = replace_version(content, "v2").unwrap();
        assert_eq!(
            updated,
            "# updater settings\r\ncurrent_version = \"v2\"\r\nignore_ini_file = true\r\n"
        );
    }

    #[tokio::test]
    async fn rewrites_config_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, CONFIG).unwrap();

        let storage = StorageManager::new(&path);
        storage.write_current_version("v2.0.0").await.unwrap();

        let expected = CONFIG.replace("v1.0.0", "v2.0.0");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), expected);
    }

    #[tokio::test]
    async fn missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path().join("config.toml"));
        let err = storage.write_current_version("v2.0.0").await.unwrap_err();
        assert!(err.starts_with("could not read file"), "{err}");
    }
}
