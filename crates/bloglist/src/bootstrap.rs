use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Root of the per-user state directory, `~/.bloglist/`.
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bloglist")
}

/// Ensure the `~/.bloglist/` directory hierarchy exists.
///
/// Creates `~/.bloglist/` and `~/.bloglist/logs/` if absent.
pub fn ensure_directories() -> anyhow::Result<()> {
    let dir = app_dir();
    std::fs::create_dir_all(&dir)?;
    std::fs::create_dir_all(dir.join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name onto an [`EnvFilter`], falling back to `info`.
fn log_filter(log_level: &str) -> EnvFilter {
    let upper = log_level.to_uppercase();
    let normalised = match upper.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" | "CRITICAL" => "error",
        _ => "info",
    };
    EnvFilter::try_new(normalised).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))
}

/// Initialise the global `tracing` subscriber.
///
/// Output always goes to stderr; when `log_file` is given, a second plain-text
/// layer appends to that file as well.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(log_filter(log_level))
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(())
}

// ── Data-file discovery ────────────────────────────────────────────────────────

/// Where blogs live when `--data-file` is not given: `~/.bloglist/blogs.json`.
pub fn default_data_file() -> PathBuf {
    app_dir().join("blogs.json")
}

/// Resolve the data file for a command: the explicit value, else the default.
pub fn resolve_data_file(explicit: Option<&PathBuf>) -> PathBuf {
    explicit.cloned().unwrap_or_else(default_data_file)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
