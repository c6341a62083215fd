//! Shared configuration for shutterlink.
//!
//! TOML profiles naming a controller's two endpoints plus wait tuning,
//! layered under `SHUTTERLINK_` environment variables, and translation
//! to [`Endpoints`] / [`SessionConfig`]. The CLI adds flag-aware wrappers
//! on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shutterlink_api::Endpoints;
use shutterlink_api::transport::{DEFAULT_PUBLISHER_ENDPOINT, DEFAULT_REQREP_ENDPOINT};
use shutterlink_core::SessionConfig;
use shutterlink_core::config::{DEFAULT_FRAME_SLACK, DEFAULT_POLL_INTERVAL};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use when none is given explicitly.
    pub fn active_profile_name(&self) -> &str {
        self.default_profile.as_deref().unwrap_or("default")
    }

    /// Look up a profile. The implicit `default` profile always exists.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        match self.profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if name == "default" => Ok(Profile::default()),
            None => Err(ConfigError::UnknownProfile { name: name.into() }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Sleep between condition checks, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Live-view frame slack.
    #[serde(default = "default_frame_slack")]
    pub frame_slack: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            poll_interval_ms: default_poll_interval_ms(),
            frame_slack: default_frame_slack(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_poll_interval_ms() -> u64 {
    u64::try_from(DEFAULT_POLL_INTERVAL.as_millis()).unwrap_or(10)
}
fn default_frame_slack() -> u64 {
    DEFAULT_FRAME_SLACK
}

/// A named controller profile.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Profile {
    /// Request/reply endpoint (e.g., "tcp://127.0.0.1:54544").
    #[serde(default = "default_reqrep")]
    pub reqrep: String,

    /// Event publisher endpoint (e.g., "tcp://127.0.0.1:54543").
    #[serde(default = "default_publisher")]
    pub publisher: String,

    /// Override the poll interval.
    pub poll_interval_ms: Option<u64>,

    /// Override the frame slack.
    pub frame_slack: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            reqrep: default_reqrep(),
            publisher: default_publisher(),
            poll_interval_ms: None,
            frame_slack: None,
        }
    }
}

fn default_reqrep() -> String {
    DEFAULT_REQREP_ENDPOINT.into()
}
fn default_publisher() -> String {
    DEFAULT_PUBLISHER_ENDPOINT.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "shutterlink", "shutterlink").map_or_else(
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
    p.push("shutterlink");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` + environment.
///
/// Environment keys nest on double underscores, e.g.
/// `SHUTTERLINK_DEFAULTS__POLL_INTERVAL_MS=25`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SHUTTERLINK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to runtime types ────────────────────────────────────

/// Parse a profile's endpoints.
pub fn profile_endpoints(profile: &Profile) -> Result<Endpoints, ConfigError> {
    Endpoints::parse(&profile.reqrep, &profile.publisher).map_err(|e| ConfigError::Validation {
        field: "endpoint".into(),
        reason: e.to_string(),
    })
}

/// Build a `SessionConfig` from a profile, falling back to global defaults.
pub fn profile_to_session_config(profile: &Profile, defaults: &Defaults) -> SessionConfig {
    let poll_ms = profile.poll_interval_ms.unwrap_or(defaults.poll_interval_ms);
    SessionConfig {
        poll_interval: Duration::from_millis(poll_ms.max(1)),
        frame_slack: profile.frame_slack.unwrap_or(defaults.frame_slack),
        ..SessionConfig::default()
    }
}
