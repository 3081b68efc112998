// Tracing setup.
// Server logs go to stderr. The desk owns the terminal, so it logs to a file in the cache dir.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::Result;

const DEFAULT_FILTER: &str = "folio=info,actix_web=info";
const LOG_FILE: &str = "desk.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Log to stderr, filtered by `RUST_LOG`.
pub fn init_stderr() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Get the base cache directory (~/.cache/folio on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "folio").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path of the desk log inside `dir`.
pub fn log_file_path(dir: &Path) -> PathBuf {
    dir.join(LOG_FILE)
}

/// Create `dir` if needed and open the desk log for appending.
pub fn open_log_file(dir: &Path) -> Result<File> {
    fs::create_dir_all(dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path(dir))?;
    Ok(file)
}

/// Log to the desk log file. Falls back to no logging when there is no cache directory.
pub fn init_desk() -> Result<Option<PathBuf>> {
    let Some(dir) = cache_dir() else {
        return Ok(None);
    };
    let file = open_log_file(&dir)?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(Some(log_file_path(&dir)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_log_file_path() {
        let dir = Path::new("/tmp/folio");
        assert_eq!(log_file_path(dir), PathBuf::from("/tmp/folio/desk.log"));
    }

    #[test]
    fn test_open_log_file_creates_and_appends() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("nested").join("cache");

        let mut file = open_log_file(&dir).unwrap();
        writeln!(file, "first").unwrap();
        drop(file);

        let mut file = open_log_file(&dir).unwrap();
        writeln!(file, "second").unwrap();
        drop(file);

        let contents = fs::read_to_string(log_file_path(&dir)).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn test_cache_dir_names_folio() {
        if let Some(dir) = cache_dir() {
            assert!(dir.to_string_lossy().contains("folio"));
        }
    }
}
