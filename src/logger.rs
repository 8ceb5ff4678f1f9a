//! Centralized, thread-safe application log.
//!
//! Entries are kept in memory for the Main tab log view and, once
//! [`init_file_sink`] has been called, mirrored to a daily file under the
//! config directory. Safe to call from worker threads.

use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use crate::constants;

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// One line of the activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Local wall-clock time, `HH:MM:SS`.
    pub timestamp: String,
    pub level: LogLevel,
    /// Short uppercase source tag, e.g. `CMD` or `NET`.
    pub category: String,
    pub message: String,
}

impl LogEntry {
    /// Single-line rendering used for the log file and headless output.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "{} [{}] {}: {}",
            self.timestamp,
            self.level.tag(),
            self.category,
            self.message
        )
    }
}

struct Store {
    entries: VecDeque<LogEntry>,
    file_dir: Option<PathBuf>,
}

fn store() -> &'static Mutex<Store> {
    static STORE: OnceLock<Mutex<Store>> = OnceLock::new();
    STORE.get_or_init(|| {
        Mutex::new(Store {
            entries: VecDeque::with_capacity(constants::MAX_LOG_ENTRIES),
            file_dir: None,
        })
    })
}

/// Mirror every subsequent entry to `<dir>/adguard-tui-YYYY-MM-DD.log`.
pub fn init_file_sink(dir: &Path) {
    if fs::create_dir_all(dir).is_err() {
        return;
    }
    if let Ok(mut store) = store().lock() {
        store.file_dir = Some(dir.to_path_buf());
    }
}

/// Append an entry.
pub fn log(level: LogLevel, category: &str, message: &str) {
    let entry = LogEntry {
        timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
        level,
        category: category.to_string(),
        message: message.to_string(),
    };

    // A poisoned lock means a panic mid-push; the log is still usable.
    let mut store = match store().lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some(dir) = &store.file_dir {
        append_to_file(dir, &entry);
    }
    if store.entries.len() >= constants::MAX_LOG_ENTRIES {
        store.entries.pop_front();
    }
    store.entries.push_back(entry);
}

pub fn info(category: &str, message: &str) {
    log(LogLevel::Info, category, message);
}

pub fn warn(category: &str, message: &str) {
    log(LogLevel::Warning, category, message);
}

pub fn error(category: &str, message: &str) {
    log(LogLevel::Error, category, message);
}

/// Snapshot of the current entries, oldest first.
#[must_use]
pub fn get_logs() -> Vec<LogEntry> {
    match store().lock() {
        Ok(store) => store.entries.iter().cloned().collect(),
        Err(poisoned) => poisoned.into_inner().entries.iter().cloned().collect(),
    }
}

/// Number of entries currently held.
#[must_use]
pub fn len() -> usize {
    store().lock().map_or(0, |s| s.entries.len())
}

/// Drop all in-memory entries. The log file is left alone.
pub fn clear() {
    if let Ok(mut store) = store().lock() {
        store.entries.clear();
    }
}

fn append_to_file(dir: &Path, entry: &LogEntry) {
    let today = chrono::Local::now().format("%Y-%m-%d");
    let log_file = dir.join(format!("{}-{today}.log", constants::APP_NAME));

    if let Ok(metadata) = fs::metadata(&log_file) {
        if metadata.len() > constants::LOG_ROTATE_BYTES {
            let rotated = dir.join(format!("{}-{today}.1.log", constants::APP_NAME));
            let _ = fs::rename(&log_file, rotated);
        }
    }

    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&log_file) {
        let _ = writeln!(file, "{}", entry.render());
    }
}
