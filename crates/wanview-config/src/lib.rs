//! Configuration for the wanview dashboard.
//!
//! TOML monitor profiles merged with `WANVIEW_`-prefixed environment
//! variables, and translation to `wanview_core::MonitorConfig`. A CLI
//! `--url` flag always wins over everything here.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wanview_core::MonitorConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no monitor profile named '{profile}'")]
    UnknownProfile { profile: String },

    #[error("no monitor configured; pass --url or add a profile to {path}")]
    NoMonitor { path: PathBuf },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Monitor profile used when `--monitor` is not given.
    pub default_monitor: Option<String>,

    /// Global polling defaults, overridable per profile.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named monitor profiles.
    #[serde(default)]
    pub monitors: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_monitor: Some("default".into()),
            defaults: Defaults::default(),
            monitors: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Telemetry poll period, seconds.
    #[serde(default = "default_status_interval")]
    pub status_interval: u64,

    /// Control state poll period, seconds.
    #[serde(default = "default_control_interval")]
    pub control_interval: u64,

    /// Per-request HTTP timeout, seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            status_interval: default_status_interval(),
            control_interval: default_control_interval(),
            timeout: default_timeout(),
        }
    }
}

fn default_status_interval() -> u64 {
    5
}
fn default_control_interval() -> u64 {
    2
}
fn default_timeout() -> u64 {
    10
}

/// A named monitor profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Monitor base URL (e.g., "http://192.168.4.80").
    pub url: String,

    /// Override telemetry poll period, seconds.
    pub status_interval: Option<u64>,

    /// Override control poll period, seconds.
    pub control_interval: Option<u64>,

    /// Override HTTP timeout, seconds.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "wanview", "wanview").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("wanview");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("WANVIEW_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Profile resolution ──────────────────────────────────────────────

impl Config {
    /// Select a monitor profile by name, falling back to
    /// `default_monitor`.
    pub fn select_profile(&self, name: Option<&str>) -> Result<&Profile, ConfigError> {
        let chosen = name
            .map(str::to_owned)
            .or_else(|| self.default_monitor.clone())
            .ok_or_else(|| ConfigError::NoMonitor {
                path: config_path(),
            })?;

        self.monitors
            .get(&chosen)
            .ok_or(ConfigError::UnknownProfile { profile: chosen })
    }

    /// Build a `MonitorConfig` from a named (or default) profile.
    pub fn monitor_config(&self, name: Option<&str>) -> Result<MonitorConfig, ConfigError> {
        let profile = self.select_profile(name)?;
        profile_to_monitor_config(profile, &self.defaults)
    }
}

/// Translate one profile (plus global defaults) into the core config.
pub fn profile_to_monitor_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<MonitorConfig, ConfigError> {
    let url: url::Url = profile.url.parse().map_err(|_| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {}", profile.url),
    })?;

    let mut config = MonitorConfig::new(url);
    config.status_interval =
        Duration::from_secs(profile.status_interval.unwrap_or(defaults.status_interval));
    config.control_interval = Duration::from_secs(
        profile
            .control_interval
            .unwrap_or(defaults.control_interval),
    );
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    if config.status_interval.is_zero() {
        return Err(ConfigError::Validation {
            field: "status_interval".into(),
            reason: "must be at least 1 second".into(),
        });
    }
    if config.control_interval.is_zero() {
        return Err(ConfigError::Validation {
            field: "control_interval".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    Ok(config)
}
