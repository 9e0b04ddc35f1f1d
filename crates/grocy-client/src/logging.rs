//! # Logging
//!
//! An explicitly constructed logging handle that is passed to the client,
//! instead of a process-wide logger.
//!
//! ## Sinks
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         LogHandle::init                                 │
//! │                                                                         │
//! │   tracing events ──► EnvFilter (LOG_LEVEL, default "info")             │
//! │                          │                                              │
//! │              ┌───────────┴───────────┐                                  │
//! │              ▼                       ▼                                  │
//! │         stdout (fmt)        <LOGS_DIR>/<name>.log (fmt, no ANSI)        │
//! │                                      │                                  │
//! │                              over 10 MiB? rotate                        │
//! │                    name.log → name.log.1 → ... → name.log.5 (dropped)   │
//! │                                                                         │
//! │  LOGS_DIR unwritable → system temp dir                                  │
//! │  temp dir unwritable → console only + one error event                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A handle built by [`LogHandle::init`] wraps its own [`tracing::Dispatch`].
//! Nothing is installed globally; the client enters that dispatcher for the
//! duration of each call. [`LogHandle::current`] has none and logs to the
//! caller's subscriber.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{dispatcher, Dispatch};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log level / filter directives.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Environment variable holding the log directory.
pub const LOGS_DIR_ENV: &str = "LOGS_DIR";

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOGS_DIR: &str = "/logs";

/// Rotation threshold for the log file.
pub const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

/// Number of rotated files kept next to the live one.
pub const MAX_LOG_BACKUPS: usize = 5;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Configuration
// =============================================================================

/// Where and how verbosely to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Level or `EnvFilter` directives (`debug`, `grocy_client=trace`).
    pub level: String,
    pub logs_dir: PathBuf,
    /// File stem; the live file is `<file_name>.log`.
    pub file_name: String,
    pub max_bytes: u64,
    pub max_backups: usize,
    /// Also write to stdout.
    pub console: bool,
}

impl LogConfig {
    pub fn new(file_name: impl Into<String>) -> Self {
        LogConfig {
            level: DEFAULT_LOG_LEVEL.to_string(),
            logs_dir: PathBuf::from(DEFAULT_LOGS_DIR),
            file_name: file_name.into(),
            max_bytes: MAX_LOG_BYTES,
            max_backups: MAX_LOG_BACKUPS,
            console: true,
        }
    }

    /// Reads `LOG_LEVEL` and `LOGS_DIR` through `lookup`.
    pub fn resolve<F>(file_name: impl Into<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = LogConfig::new(file_name);

        if let Some(level) = lookup(LOG_LEVEL_ENV).filter(|v| !v.trim().is_empty()) {
            config.level = level;
        }
        if let Some(dir) = lookup(LOGS_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            config.logs_dir = PathBuf::from(dir);
        }

        config
    }

    /// [`resolve`](Self::resolve) against the process environment.
    pub fn from_env(file_name: impl Into<String>) -> Self {
        Self::resolve(file_name, |name| std::env::var(name).ok())
    }

    /// Path of the live log file inside `dir`.
    fn file_in(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.log", self.file_name))
    }
}

/// Maps `WARNING` / `CRITICAL` style level names onto tracing's.
fn normalize_level(level: &str) -> String {
    match level.trim().to_ascii_lowercase().as_str() {
        "warning" => "warn".to_string(),
        "critical" | "fatal" => "error".to_string(),
        "notset" => "trace".to_string(),
        _ => level.trim().to_string(),
    }
}

// =============================================================================
// Size-Rotating File
// =============================================================================

/// A log file that rolls over once it would grow past `max_bytes`.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
    max_backups: usize,
}

impl RotatingFile {
    pub fn open(path: impl Into<PathBuf>, max_bytes: u64, max_backups: usize) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();

        Ok(RotatingFile {
            path,
            file,
            written,
            max_bytes,
            max_backups,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    /// Shifts `name.log.N` → `name.log.N+1`, dropping the oldest, and
    /// starts a fresh live file. Requires `max_backups > 0`.
    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let oldest = self.backup_path(self.max_backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.max_backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))?;

        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // Without backups there is nothing to roll over into; keep appending.
        if self.max_backups > 0
            && self.written > 0
            && self.written + buf.len() as u64 > self.max_bytes
        {
            self.rotate()?;
        }

        self.file.write_all(buf)?;
        self.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Opens the log file in the configured directory, then in the temp dir.
fn open_log_file(config: &LogConfig) -> Result<RotatingFile, Vec<String>> {
    let mut failures = Vec::new();

    for dir in [config.logs_dir.clone(), std::env::temp_dir()] {
        let path = config.file_in(&dir);
        match RotatingFile::open(&path, config.max_bytes, config.max_backups) {
            Ok(file) => return Ok(file),
            Err(e) => failures.push(format!("{}: {e}", path.display())),
        }
    }

    Err(failures)
}

// =============================================================================
// Log Handle
// =============================================================================

/// Logging handle injected into [`GrocyClient`](crate::GrocyClient).
///
/// Without a dispatcher of its own, events go to whatever subscriber is the
/// default when each call is made.
#[derive(Clone)]
pub struct LogHandle {
    dispatch: Option<Dispatch>,
    log_file: Option<PathBuf>,
}

impl std::fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogHandle")
            .field("log_file", &self.log_file)
            .finish_non_exhaustive()
    }
}

impl LogHandle {
    /// Builds console + rotating file sinks from `config`.
    ///
    /// Never fails: an unusable directory degrades to the temp dir, and an
    /// unusable temp dir to console-only logging.
    pub fn init(config: &LogConfig) -> Self {
        let level = normalize_level(&config.level);
        let (filter, bad_level) = match EnvFilter::try_new(&level) {
            Ok(filter) => (filter, None),
            Err(e) => (EnvFilter::new(DEFAULT_LOG_LEVEL), Some(e.to_string())),
        };

        let console = config.console.then(|| {
            fmt::layer()
                .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
                .with_target(true)
                .with_writer(io::stdout)
        });

        let (file, file_errors) = match open_log_file(config) {
            Ok(file) => (Some(file), Vec::new()),
            Err(errors) => (None, errors),
        };
        let log_file = file.as_ref().map(|f| f.path().to_path_buf());

        let file_layer = file.map(|file| {
            fmt::layer()
                .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
                .with_target(true)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
        });

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(console)
            .with(file_layer);

        let handle = LogHandle {
            dispatch: Some(Dispatch::new(subscriber)),
            log_file,
        };

        handle.in_scope(|| {
            if let Some(reason) = &bad_level {
                tracing::warn!(level = %config.level, %reason, "Invalid log level, using info");
            }
            if !file_errors.is_empty() {
                tracing::error!(
                    attempts = ?file_errors,
                    "Failed to create log file handler, logging to console only"
                );
            }
        });

        handle
    }

    /// Follows the caller's default dispatcher at the time of each call.
    pub fn current() -> Self {
        LogHandle {
            dispatch: None,
            log_file: None,
        }
    }

    /// Wraps an existing dispatcher.
    pub fn from_dispatch(dispatch: Dispatch) -> Self {
        LogHandle {
            dispatch: Some(dispatch),
            log_file: None,
        }
    }

    /// The live log file, if file logging is active.
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Runs `f` with this handle's dispatcher as the default, if it has one.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        match &self.dispatch {
            Some(dispatch) => dispatcher::with_default(dispatch, f),
            None => f(),
        }
    }
}

impl Default for LogHandle {
    fn default() -> Self {
        LogHandle::current()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = LogConfig::resolve("client", lookup_from(&[]));
        assert_eq!(config.level, "info");
        assert_eq!(config.logs_dir, PathBuf::from("/logs"));
        assert_eq!(config.max_bytes, 10 * 1024 * 1024);
        assert_eq!(config.max_backups, 5);
    }

    #[test]
    fn test_config_from_lookup() {
        let config = LogConfig::resolve(
            "client",
            lookup_from(&[(LOG_LEVEL_ENV, "DEBUG"), (LOGS_DIR_ENV, "/var/log/grocy")]),
        );
        assert_eq!(config.level, "DEBUG");
        assert_eq!(config.logs_dir, PathBuf::from("/var/log/grocy"));
    }

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level("WARNING"), "warn");
        assert_eq!(normalize_level("CRITICAL"), "error");
        assert_eq!(normalize_level("debug"), "debug");
        assert_eq!(normalize_level("grocy_client=trace"), "grocy_client=trace");
    }

    #[test]
    fn test_rotating_file_rolls_over() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.log");
        let mut file = RotatingFile::open(&path, 10, 2).unwrap();

        file.write_all(b"aaaaaaaa\n").unwrap(); // 9 bytes, fits
        file.write_all(b"bbbbbbbb\n").unwrap(); // would exceed 10 → rotate
        file.write_all(b"cccccccc\n").unwrap(); // rotate again
        file.write_all(b"dddddddd\n").unwrap(); // rotate, oldest dropped
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "dddddddd\n");
        assert_eq!(
            fs::read_to_string(dir.path().join("client.log.1")).unwrap(),
            "cccccccc\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("client.log.2")).unwrap(),
            "bbbbbbbb\n"
        );
        assert!(!dir.path().join("client.log.3").exists());
    }

    #[test]
    fn test_rotating_file_without_backups_never_rolls_over() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.log");
        let mut file = RotatingFile::open(&path, 10, 0).unwrap();

        file.write_all(b"aaaaaaaa\n").unwrap();
        file.write_all(b"bbbbbbbb\n").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "aaaaaaaa\nbbbbbbbb\n");
        assert!(!dir.path().join("client.log.1").exists());
    }

    #[test]
    fn test_current_handle_follows_caller_dispatcher() {
        let handle = LogHandle::current();
        assert_eq!(handle.log_file(), None);

        let (outer, outer_logs) = crate::testing::capture_dispatch();
        dispatcher::with_default(&outer, || {
            handle.in_scope(|| tracing::error!("seen by the caller's subscriber"));
        });

        assert_eq!(outer_logs.error_count(), 1);
    }

    #[test]
    fn test_rotating_file_appends_to_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.log");
        fs::write(&path, "old\n").unwrap();

        let mut file = RotatingFile::open(&path, 1024, 5).unwrap();
        file.write_all(b"new\n").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "old\nnew\n");
    }

    #[test]
    fn test_handle_writes_to_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = LogConfig::new("client");
        config.logs_dir = dir.path().join("nested");
        config.console = false;

        let handle = LogHandle::init(&config);
        let path = handle.log_file().unwrap().to_path_buf();
        assert_eq!(path, dir.path().join("nested").join("client.log"));

        handle.in_scope(|| {
            tracing::info!("Initializing Grocy client");
            tracing::debug!("filtered out at info");
        });

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("INFO"));
        assert!(contents.contains("Initializing Grocy client"));
        assert!(!contents.contains("filtered out at info"));
    }

    #[test]
    fn test_unwritable_dir_falls_back_to_temp() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let mut config = LogConfig::new(format!("fallback-{}", std::process::id()));
        config.logs_dir = blocker.join("logs");
        config.console = false;

        let handle = LogHandle::init(&config);
        let path = handle.log_file().unwrap();
        assert!(path.starts_with(std::env::temp_dir()));
        let _ = fs::remove_file(path);
    }
}
