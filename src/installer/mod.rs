use std::fs::{self, OpenOptions};
use std::io::{self, Cursor};
use std::path::Path;

use log::{debug, info, warn};
use zip::read::ZipArchive;

use crate::env::SETTINGS_ENTRY;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub written: usize,
    pub skipped: usize,
}

/// Extract the zip archive in `data` over `output_dir`.
///
/// Existing files at matching paths are overwritten. When `keep_settings` is set the
/// bundled `SeamlessCoop/ersc_settings.ini` is left out so the local copy survives.
/// The first failing entry aborts the install; entries already written stay on disk.
pub fn install_archive(
    data: &[u8],
    output_dir: &Path,
    keep_settings: bool,
) -> Result<InstallReport, String> {
    info!(
        "install: extracting {} bytes into {}",
        data.len(),
        output_dir.display()
    );
    let mut archive =
        ZipArchive::new(Cursor::new(data)).map_err(|e| format!("error reading zip file: {e}"))?;
    let mut report = InstallReport::default();

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| format!("zip entry error: {e}"))?;

        if keep_settings && entry.name() == SETTINGS_ENTRY {
            warn!("install: {}", ignored_entry_message(entry.name()));
            report.skipped += 1;
            continue;
        }

        let relative = entry
            .enclosed_name()
            .ok_or_else(|| format!("refusing to extract unsafe path [{}]", entry.name()))?;
        let out_path = output_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| {
                format!("could not create directory {} [{e}]", out_path.display())
            })?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                format!("could not create directories for {} [{e}]", parent.display())
            })?;
        }

        let mut out_file = open_target(&out_path, entry.unix_mode())
            .map_err(|e| format!("could not open file {} [{e}]", out_path.display()))?;
        let copied = io::copy(&mut entry, &mut out_file)
            .map_err(|e| format!("could not write file {} [{e}]", out_path.display()))?;
        debug!("install: wrote {} ({copied} bytes)", out_path.display());
        report.written += 1;
    }

    info!(
        "install: {} files written, {} skipped",
        report.written, report.skipped
    );
    Ok(report)
}

fn ignored_entry_message(name: &str) -> String {
    format!("Ignoring [{name}] from zip file")
}

fn open_target(path: &Path, mode: Option<u32>) -> io::Result<fs::File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    apply_mode(&mut options, mode);
    options.open(path)
}

#[cfg(unix)]
fn apply_mode(options: &mut OpenOptions, mode: Option<u32>) {
    use std::os::unix::fs::OpenOptionsExt;

    // Only honoured when the file is created; existing files keep their permissions.
    if let Some(mode) = mode {
        options.mode(mode & 0o777);
    }
}

#[cfg(not(unix))]
fn apply_mode(_options: &mut OpenOptions, _mode: Option<u32>) {}

/// Build an in-memory zip with the given `(name, contents)` entries.
#[cfg(test)]
pub(crate) fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    use std::io::Write;
    use zip::write::{SimpleFileOptions, ZipWriter};

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::{SimpleFileOptions, ZipWriter};

    #[test]
    fn ignored_entry_message_names_the_entry() {
        assert_eq!(
            ignored_entry_message(SETTINGS_ENTRY),
            "Ignoring [SeamlessCoop/ersc_settings.ini] from zip file"
        );
    }

    fn sample_zip() -> Vec<u8> {
        build_zip(&[
            ("test.txt", b"test content"),
            ("SeamlessCoop/ersc_settings.ini", b"settings content"),
        ])
    }

    #[test]
    fn skips_settings_file_when_flag_is_set() {
        let dir = tempfile::tempdir().unwrap();
        let report = install_archive(&sample_zip(), dir.path(), true).unwrap();

        assert_eq!(report, InstallReport { written: 1, skipped: 1 });
        assert_eq!(fs::read(dir.path().join("test.txt")).unwrap(), b"test content");
        assert!(!dir.path().join("SeamlessCoop/ersc_settings.ini").exists());
    }

    #[test]
    fn writes_settings_file_when_flag_is_unset() {
        let dir = tempfile::tempdir().unwrap();
        let report = install_archive(&sample_zip(), dir.path(), false).unwrap();

        assert_eq!(report, InstallReport { written: 2, skipped: 0 });
        assert!(dir.path().join("test.txt").exists());
        assert_eq!(
            fs::read(dir.path().join("SeamlessCoop/ersc_settings.ini")).unwrap(),
            b"settings content"
        );
    }

    #[test]
    fn ignore_match_is_exact() {
        let data = build_zip(&[("Other/ersc_settings.ini", b"x")]);
        let dir = tempfile::tempdir().unwrap();
        install_archive(&data, dir.path(), true).unwrap();
        assert!(dir.path().join("Other/ersc_settings.ini").exists());
    }

    #[test]
    fn creates_missing_intermediate_directories() {
        let data = build_zip(&[("SeamlessCoop/locale/english/strings.json", b"{}")]);
        let dir = tempfile::tempdir().unwrap();
        install_archive(&data, dir.path(), false).unwrap();
        assert_eq!(
            fs::read(dir.path().join("SeamlessCoop/locale/english/strings.json")).unwrap(),
            b"{}"
        );
    }

    #[test]
    fn overwrites_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("test.txt"), b"a much longer stale installation file").unwrap();
        install_archive(&sample_zip(), dir.path(), true).unwrap();
        assert_eq!(fs::read(dir.path().join("test.txt")).unwrap(), b"test content");
    }

    #[test]
    fn keeps_earlier_files_when_a_later_entry_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A plain file where the archive expects a directory.
        fs::write(dir.path().join("blocked"), b"").unwrap();
        let data = build_zip(&[("first.txt", b"1"), ("blocked/second.txt", b"2")]);

        let err = install_archive(&data, dir.path(), false).unwrap_err();
        assert!(err.contains("could not create directories"), "{err}");
        assert_eq!(fs::read(dir.path().join("first.txt")).unwrap(), b"1");
    }

    #[test]
    fn rejects_garbage_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = install_archive(b"not a zip", dir.path(), false).unwrap_err();
        assert!(err.starts_with("error reading zip file"), "{err}");
    }

    #[test]
    fn rejects_entries_escaping_output_dir() {
        let data = build_zip(&[("../escape.txt", b"x")]);
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("game");
        fs::create_dir(&out).unwrap();

        let err = install_archive(&data, &out, false).unwrap_err();
        assert!(err.contains("unsafe path"), "{err}");
        assert!(!root.path().join("escape.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn applies_declared_unix_mode() {
        use std::os::unix::fs::PermissionsExt;

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(
                "launch.sh",
                SimpleFileOptions::default().unix_permissions(0o755),
            )
            .unwrap();
        writer.write_all(b"#!/bin/sh\n").unwrap();
        let data = writer.finish().unwrap().into_inner();

        let dir = tempfile::tempdir().unwrap();
        install_archive(&data, dir.path(), false).unwrap();
        let mode = fs::metadata(dir.path().join("launch.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
