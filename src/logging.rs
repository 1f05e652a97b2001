//! File-backed logging
//!
//! The TUI owns the terminal, so log output goes to a file next to the
//! executable instead of stderr. Filtering follows `RUST_LOG` with an
//! `info` default.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Best-effort: when the log file
/// cannot be created the process simply runs without logging.
pub fn init() {
    let Ok(file) = File::create(log_path()) else {
        return;
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

/// Log file path (same directory as the executable)
fn log_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flickfind.log")
}
