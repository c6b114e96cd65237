use clap::{Args, CommandFactory, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{BlogError, Result};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Blog list statistics and REST API
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bloglist",
    about = "Blog list statistics and REST API",
    version
)]
pub struct Settings {
    #[command(subcommand)]
    pub command: Command,

    /// Blog data file or directory (.json / .jsonl)
    #[arg(long, global = true, env = "BLOGLIST_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Logging level
    #[arg(long, global = true, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long, global = true)]
    pub clear: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print aggregate statistics for the blogs in the data file
    Stats(StatsArgs),
    /// Run the REST API server
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "BLOGLIST_BIND_ADDR", default_value = "127.0.0.1:3003")]
    pub bind: String,

    /// Token signing secret
    #[arg(long, env = "SECRET", hide_env_values = true)]
    pub secret: Option<String>,
}

impl ServeArgs {
    /// The signing secret, which is mandatory for serving.
    pub fn require_secret(&self) -> Result<&str> {
        match self.secret.as_deref() {
            Some(s) if !s.trim().is_empty() => Ok(s),
            _ => Err(BlogError::Config(
                "a token secret is required (--secret or SECRET)".to_string(),
            )),
        }
    }
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.bloglist/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind_addr: Option<String>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".bloglist").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path.
    pub fn save_to(&self, path: &Path) -> std::result::Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &Path) -> std::result::Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    /// Overlay the values `settings` carries on top of `self`.
    ///
    /// Fields belonging to the subcommand that did not run are kept.
    fn updated_with(mut self, settings: &Settings) -> Self {
        if settings.data_file.is_some() {
            self.data_file = settings.data_file.clone();
        }
        match &settings.command {
            Command::Stats(args) => self.format = Some(args.format.clone()),
            Command::Serve(args) => self.bind_addr = Some(args.bind.clone()),
        }
        self
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments, merge with last-used params where no explicit
    /// value was provided, and persist the result.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation: accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &Path,
    ) -> Self {
        // Build raw ArgMatches so we can query ValueSource.
        let matches = Settings::command().get_matches_from(args.clone());

        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!(error = %e, "failed to clear saved configuration");
            }
            return Self::apply_debug(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI and environment always win over persisted values.
        if settings.data_file.is_none() && !is_arg_explicitly_set(&matches, "data_file") {
            settings.data_file = last.data_file.clone();
        }
        match &mut settings.command {
            Command::Stats(args) => {
                if !is_arg_explicitly_set(&matches, "format") {
                    if let Some(v) = last.format.clone() {
                        args.format = v;
                    }
                }
            }
            Command::Serve(args) => {
                // NOTE: clap stores the arg id using the field name.
                if !is_arg_explicitly_set(&matches, "bind") {
                    if let Some(v) = last.bind_addr.clone() {
                        args.bind = v;
                    }
                }
            }
        }

        settings = Self::apply_debug(settings);

        if let Err(e) = last.updated_with(&settings).save_to(config_path) {
            tracing::warn!(error = %e, "failed to persist last-used parameters");
        }

        settings
    }

    /// `--debug` overrides the log level.
    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Helper: check if an arg was explicitly set ─────────────────────────────────

/// Returns `true` when `name` was supplied on the command line or through its
/// environment variable, at the top level or in the active subcommand.
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    use clap::parser::ValueSource;

    // `try_get_raw` errors for ids unknown at this level; `value_source` would panic.
    let explicit = matches.try_get_raw(name).is_ok()
        && matches!(
            matches.value_source(name),
            Some(ValueSource::CommandLine | ValueSource::EnvVariable)
        );
    if explicit {
        return true;
    }
    matches
        .subcommand()
        .is_some_and(|(_, sub)| is_arg_explicitly_set(sub, name))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
