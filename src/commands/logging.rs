//! Persistent file logging for both frontend and backend.
//!
//! Backend code logs through the `log` facade; this module installs a
//! `log::Log` implementation that appends to one file per day under the app
//! log directory, with size-based rotation and cleanup. Frontend lines arrive
//! through the `write_log` / `write_logs` commands.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;
use env_logger::filter::{Builder as FilterBuilder, Filter};
use log::{Level, Log, Metadata, Record};
use tauri::{command, AppHandle, Manager};

use crate::error::{LockResultExt, MdCaptureError, MdCaptureResult};

/// Maximum log file size before rotation (5MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum number of log files to keep
const MAX_LOG_FILES: usize = 5;

/// Log file name prefix
const LOG_PREFIX: &str = "markdown-capture";

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info";

lazy_static::lazy_static! {
    /// Global log file handle
    static ref LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
    /// Log directory path
    static ref LOG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

struct FileLogger {
    filter: Filter,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.filter.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.filter.matches(record) {
            write_line(record.level(), record.target(), &record.args().to_string());
        }
    }

    fn flush(&self) {
        if let Ok(mut log_file) = LOG_FILE.lock() {
            if let Some(file) = log_file.as_mut() {
                let _ = file.flush();
            }
        }
    }
}

fn build_filter() -> Filter {
    let spec = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    FilterBuilder::new().parse(&spec).build()
}

/// Initialize the logging system and install it as the `log` backend.
pub fn init_logging(app: &AppHandle) -> MdCaptureResult<()> {
    let log_dir = app
        .path()
        .app_log_dir()
        .map_err(|e| MdCaptureError::Other(format!("Failed to get log directory: {}", e)))?;

    fs::create_dir_all(&log_dir)?;

    *LOG_DIR.lock().map_lock_err("log directory")? = Some(log_dir.clone());

    let file = open_log_file(&current_log_path(&log_dir))?;
    *LOG_FILE.lock().map_lock_err("log file")? = Some(file);

    let filter = build_filter();
    let max_level = filter.filter();
    log::set_boxed_logger(Box::new(FileLogger { filter }))
        .map_err(|e| MdCaptureError::Other(format!("Logger already set: {}", e)))?;
    log::set_max_level(max_level);

    log::info!("[LOG] Logging system initialized");
    log::info!("[LOG] Log directory: {:?}", log_dir);

    cleanup_old_logs(&log_dir);

    Ok(())
}

fn open_log_file(path: &Path) -> MdCaptureResult<File> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Get the path for the current log file (one per day)
fn current_log_path(log_dir: &Path) -> PathBuf {
    let date = Local::now().format("%Y-%m-%d");
    log_dir.join(format!("{}_{}.log", LOG_PREFIX, date))
}

/// Clean up old log files, keeping only the most recent MAX_LOG_FILES
fn cleanup_old_logs(log_dir: &Path) {
    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };

    let mut log_files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|ext| ext == "log").unwrap_or(false))
        .collect();

    // Newest first
    log_files.sort_by(|a, b| {
        let a_time = a.metadata().and_then(|m| m.modified()).ok();
        let b_time = b.metadata().and_then(|m| m.modified()).ok();
        b_time.cmp(&a_time)
    });

    for file in log_files.into_iter().skip(MAX_LOG_FILES) {
        let _ = fs::remove_file(file.path());
    }
}

/// Rotate the current file once it grows past MAX_LOG_SIZE.
fn check_rotation() {
    // Poisoned lock: skip rotation rather than panic inside the logger
    let log_dir = match LOG_DIR.lock().map_lock_err("log directory") {
        Ok(dir) => match dir.as_ref() {
            Some(d) => d.clone(),
            None => return,
        },
        Err(_) => return,
    };

    let current_path = current_log_path(&log_dir);
    let Ok(metadata) = fs::metadata(&current_path) else {
        return;
    };
    if metadata.len() <= MAX_LOG_SIZE {
        return;
    }

    let timestamp = Local::now().format("%Y-%m-%d_%H%M%S");
    let rotated_path = log_dir.join(format!("{}_{}.log", LOG_PREFIX, timestamp));
    let _ = fs::rename(&current_path, &rotated_path);

    if let Ok(file) = open_log_file(&current_path) {
        if let Ok(mut log_file) = LOG_FILE.lock() {
            *log_file = Some(file);
        }
    }

    cleanup_old_logs(&log_dir);
}

fn format_line(level: Level, source: &str, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    format!("[{}] [{}] [{}] {}\n", timestamp, level, source, message)
}

fn write_line(level: Level, source: &str, message: &str) {
    let line = format_line(level, source, message);

    if let Ok(mut log_file) = LOG_FILE.lock() {
        if let Some(file) = log_file.as_mut() {
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush();
        }
    }

    // Also print to console in debug builds
    #[cfg(debug_assertions)]
    {
        match level {
            Level::Error => eprintln!("{}", line.trim_end()),
            _ => println!("{}", line.trim_end()),
        }
    }

    check_rotation();
}

/// Map a frontend level name onto `log::Level`. Unknown names log as info.
fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::Trace,
        "debug" => Level::Debug,
        "warn" | "warning" => Level::Warn,
        "error" => Level::Error,
        _ => Level::Info,
    }
}

// ============================================================================
// Tauri Commands
// ============================================================================

/// Write a log message from the frontend
#[command]
pub fn write_log(level: String, source: String, message: String) {
    let level = parse_level(&level);
    if level <= log::max_level() {
        write_line(level, &source, &message);
    }
}

/// Write multiple log messages from the frontend (batch)
#[command]
pub fn write_logs(logs: Vec<(String, String, String)>) {
    for (level, source, message) in logs {
        write_log(level, source, message);
    }
}

/// Get the log directory path
#[command]
pub fn get_log_dir(app: AppHandle) -> MdCaptureResult<String> {
    let log_dir = app
        .path()
        .app_log_dir()
        .map_err(|e| MdCaptureError::Other(format!("Failed to get log directory: {}", e)))?;

    Ok(log_dir.to_string_lossy().to_string())
}
