//! Logging infrastructure for specsmith.
//!
//! Structured file logging with daily rotation to platform-standard
//! directories. The console is reserved for the interactive questionnaire,
//! so diagnostics go to the log file only.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use directories::ProjectDirs;
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;

const RETENTION_DAYS: u64 = 7;

/// Result of initializing the logging system.
pub struct LoggingContext {
    /// Held for the application lifetime so buffered log lines are flushed.
    pub _guard: WorkerGuard,
    /// Random id correlating every line of this invocation.
    pub session_id: String,
    /// The directory where logs are written.
    pub log_directory: PathBuf,
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to determine platform log directory")]
    NoLogDirectory,
    #[error("failed to create log directory: {0}")]
    CreateDirectory(#[source] std::io::Error),
}

/// 6-character random hex session id.
fn generate_session_id() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    let bytes: [u8; 3] = rng.random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Platform log directory:
/// macOS `~/Library/Logs/specsmith/`, Linux `~/.local/state/specsmith/`,
/// Windows `%LocalAppData%\specsmith\`.
fn log_directory() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        dirs::home_dir().map(|home| home.join("Library").join("Logs").join("specsmith"))
    } else {
        ProjectDirs::from("dev", "cmoel", "specsmith")
            .and_then(|dirs| dirs.state_dir().map(PathBuf::from))
    }
}

/// Initialize file logging at `level` (RUST_LOG wins when set).
///
/// The returned guard must live as long as the process; dropping it stops
/// the background writer.
pub fn init(level: &str) -> Result<LoggingContext, LoggingError> {
    let session_id = generate_session_id();

    let log_dir = log_directory().ok_or(LoggingError::NoLogDirectory)?;
    fs::create_dir_all(&log_dir).map_err(LoggingError::CreateDirectory)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "specsmith");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_span_events(FmtSpan::NONE)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    info!(session_id = %session_id, "session_start");

    Ok(LoggingContext {
        _guard: guard,
        session_id,
        log_directory: log_dir,
    })
}

/// Delete `specsmith.*` log files older than the retention period. Failures
/// are logged and never block startup.
pub fn cleanup_old_logs(log_dir: &Path) {
    let retention = Duration::from_secs(RETENTION_DAYS * 24 * 60 * 60);

    let entries = match fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "Failed to read log directory for cleanup");
            return;
        }
    };

    let now = SystemTime::now();
    let mut deleted = 0u32;

    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        let is_log_file = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.starts_with("specsmith.") && name != "specsmith");
        if !is_log_file {
            continue;
        }

        let age = fs::metadata(&path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok());

        // Unreadable metadata or a future timestamp: leave the file alone.
        let Some(age) = age else { continue };
        if age <= retention {
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = ?path, age_days = age.as_secs() / 86400, "Deleted old log file");
                deleted += 1;
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "Failed to delete old log file");
            }
        }
    }

    if deleted > 0 {
        debug!(count = deleted, "Log cleanup completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_is_six_hex_chars() {
        let id = generate_session_id();
        assert_eq!(id.len(), 6);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_session_ids_vary() {
        // Three bytes of randomness; a run of identical ids means the rng
        // is not being consulted.
        let ids: Vec<String> = (0..8).map(|_| generate_session_id()).collect();
        assert!(ids.iter().any(|id| id != &ids[0]));
    }

    #[test]
    fn test_cleanup_keeps_recent_and_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let recent = dir.path().join("specsmith.2026-08-28");
        let foreign = dir.path().join("other.log");
        fs::write(&recent, "log line").unwrap();
        fs::write(&foreign, "not ours").unwrap();

        cleanup_old_logs(dir.path());

        assert!(recent.exists());
        assert!(foreign.exists());
    }

    #[test]
    fn test_cleanup_missing_directory_is_harmless() {
        cleanup_old_logs(Path::new("/nonexistent/specsmith-logs"));
    }
}
