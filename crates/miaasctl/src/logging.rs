//! Logging setup for miaasctl
//!
//! The dashboard owns the terminal, so it logs to a file. One-shot commands
//! log to stderr. Both honour `RUST_LOG` (default `info`).

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

/// Explicit log file override
pub const LOG_FILE_ENV: &str = "MIAAS_LOG_FILE";

const LOG_FILE_NAME: &str = "dashboard.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

/// Discover log file path with fallback chain
///
/// Priority:
/// 1. $MIAAS_LOG_FILE (explicit override)
/// 2. $XDG_STATE_HOME/miaas/dashboard.log
/// 3. ~/.local/state/miaas/dashboard.log
pub fn discover_log_path() -> Option<PathBuf> {
    resolve_log_path(
        std::env::var(LOG_FILE_ENV).ok(),
        std::env::var("XDG_STATE_HOME").ok(),
        std::env::var("HOME").ok(),
    )
}

fn resolve_log_path(
    explicit: Option<String>,
    xdg_state: Option<String>,
    home: Option<String>,
) -> Option<PathBuf> {
    if let Some(path) = explicit.filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }

    if let Some(state) = xdg_state.filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(state).join("miaas").join(LOG_FILE_NAME));
    }

    home.filter(|p| !p.is_empty()).map(|home| {
        PathBuf::from(home)
            .join(".local/state/miaas")
            .join(LOG_FILE_NAME)
    })
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Open (creating parent dirs) the log file, or `None` if it can't be written
fn open_log_file(path: &Path) -> Option<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok()?;
    }

    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Install the global subscriber.
///
/// With `LogTarget::File` and no usable path, or a path that can't be
/// written, logging is silently disabled rather than written over the TUI.
pub fn init(target: LogTarget) {
    match target {
        LogTarget::Stderr => {
            let _ = fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
        LogTarget::File => {
            let Some(file) = discover_log_path().and_then(|path| open_log_file(&path)) else {
                return;
            };

            let _ = fmt()
                .with_env_filter(env_filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
    }
}
