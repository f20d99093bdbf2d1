use std::borrow::Cow;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Payloads longer than this are logged as a preview only.
pub const MAX_LOGGED_PAYLOAD: usize = 1000;
const PREVIEW_LEN: usize = 500;

/// The log file is rotated at startup once it reaches this size.
pub const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;
pub const BACKUP_COUNT: usize = 10;

fn filter() -> EnvFilter {
    EnvFilter::try_from_env("ECHOVIEW_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to stderr, for the headless subcommands.
pub fn init_stderr() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(io::stderr)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))
}

/// Log to ~/.echoview/logs/echoview.log; stdout belongs to the TUI.
/// Returns the file path so the UI can point at it.
pub fn init_file() -> Result<PathBuf> {
    let dir = crate::core::config::echoview_config_path("logs")?;
    fs::create_dir_all(&dir)?;
    let path = dir.join("echoview.log");
    rotate(&path, MAX_LOG_SIZE, BACKUP_COUNT)?;

    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))?;
    Ok(path)
}

fn backup_path(path: &Path, n: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{n}"));
    PathBuf::from(name)
}

/// Shift `path` to `path.1`, `path.1` to `path.2`, … once it reaches `max_size`.
/// The oldest backup beyond `backups` is deleted. Returns whether a rotation happened.
pub fn rotate(path: &Path, max_size: u64, backups: usize) -> io::Result<bool> {
    let size = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if size < max_size {
        return Ok(false);
    }

    if backups == 0 {
        fs::remove_file(path)?;
        return Ok(true);
    }

    let oldest = backup_path(path, backups);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for n in (1..backups).rev() {
        let from = backup_path(path, n);
        if from.exists() {
            fs::rename(&from, backup_path(path, n + 1))?;
        }
    }
    fs::rename(path, backup_path(path, 1))?;
    Ok(true)
}

/// Shorten a request/response body for logging (char-boundary safe).
pub fn preview(payload: &str) -> Cow<'_, str> {
    let total = payload.chars().count();
    if total <= MAX_LOGGED_PAYLOAD {
        return Cow::Borrowed(payload);
    }
    let head: String = payload.chars().take(PREVIEW_LEN).collect();
    Cow::Owned(format!("{head}... (truncated, original size: {total} chars)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_payloads_are_untouched() {
        let body = r#"{"text":"Hi Flask"}"#;
        assert!(matches!(preview(body), Cow::Borrowed(b) if b == body));
    }

    #[test]
    fn long_payloads_are_cut_to_a_preview() {
        let body = "é".repeat(1500);
        let out = preview(&body);
        assert!(out.starts_with(&"é".repeat(500)));
        assert!(!out.starts_with(&"é".repeat(501)));
        assert!(out.ends_with("(truncated, original size: 1500 chars)"));
    }

    #[test]
    fn boundary_length_is_not_truncated() {
        let body = "x".repeat(MAX_LOGGED_PAYLOAD);
        assert_eq!(preview(&body).len(), MAX_LOGGED_PAYLOAD);
    }

    #[test]
    fn small_or_missing_log_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("echoview.log");
        assert!(!rotate(&path, 10, 3).unwrap());

        fs::write(&path, "short").unwrap();
        assert!(!rotate(&path, 10, 3).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "short");
    }

    #[test]
    fn full_log_shifts_backups_and_drops_the_oldest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("echoview.log");
        fs::write(&path, "current log").unwrap();
        fs::write(backup_path(&path, 1), "one").unwrap();
        fs::write(backup_path(&path, 2), "two").unwrap();

        assert!(rotate(&path, 5, 2).unwrap());

        assert!(!path.exists());
        assert_eq!(fs::read_to_string(backup_path(&path, 1)).unwrap(), "current log");
        assert_eq!(fs::read_to_string(backup_path(&path, 2)).unwrap(), "one");
        assert!(!backup_path(&path, 3).exists());
    }
}
