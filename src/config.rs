//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$MBOXPULSE_CONFIG` (environment variable)
//! 2. `~/.config/mboxpulse/config.toml` (Linux/macOS)
//!    `%APPDATA%\mboxpulse\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Report classification patterns.
    pub classifier: ClassifierConfig,
    /// Contacts file handling.
    pub contacts: ContactsConfig,
    /// Business-day calendar.
    pub calendar: CalendarConfig,
    /// Output rendering.
    pub output: OutputConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
}

/// Patterns that exclude a message from being counted as a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Regexes matched against the bare sender address.
    pub ignored_senders: Vec<String>,
    /// Regexes matched against the decoded subject.
    pub ignored_subjects: Vec<String>,
}

/// Contacts file handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactsConfig {
    /// `"auto"` (BOM sniffing, UTF-8 otherwise) or a WHATWG encoding label
    /// such as `"utf-16le"`.
    pub encoding: String,
}

/// Business-day calendar settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Dates (`YYYY-MM-DD`) that are never business days.
    pub holidays: Vec<String>,
    /// Weekday names treated as weekend (e.g. `"sat"`, `"Sunday"`).
    pub weekend: Vec<String>,
}

/// Output rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Sparkline glyphs, lowest to highest.
    pub ticks: String,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            ignored_senders: vec![crate::report::classifier::DEFAULT_IGNORED_SENDER.to_string()],
            ignored_subjects: vec![crate::report::classifier::DEFAULT_IGNORED_SUBJECT.to_string()],
        }
    }
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            encoding: "auto".to_string(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            holidays: Vec::new(),
            weekend: vec!["sat".to_string(), "sun".to_string()],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            ticks: crate::report::sparkline::DEFAULT_TICKS.to_string(),
        }
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("MBOXPULSE_CONFIG") {
        return Some(PathBuf::from(env_path));
    }
    dirs::config_dir().map(|d| d.join("mboxpulse").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mboxpulse")
}
