//! Client configuration for roombook front ends.
//!
//! TOML profiles (one per booking server) plus `ROOMBOOK_*` environment
//! overrides, translated to `roombook_core::ControllerConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use roombook_core::ControllerConfig;
use roombook_core::config::DEFAULT_API_URL;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no profile named '{profile}' in the config file")]
    UnknownProfile { profile: String },

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
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is given on the command line.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named booking-server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Where exports are written.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout: default_timeout(),
            export_dir: default_export_dir(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

/// A named booking server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Server base URL (e.g., "http://rooms.internal:3001").
    pub api_url: String,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override export directory.
    pub export_dir: Option<PathBuf>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "roombook", "roombook").map_or_else(
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
    p.push("roombook");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. A missing file yields the defaults.
///
/// Environment keys use `__` between sections, e.g.
/// `ROOMBOOK_DEFAULTS__API_URL`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ROOMBOOK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ControllerConfig` for the named profile, or for the default
/// profile when `profile_name` is `None`. With no profile at all the
/// global defaults are used.
pub fn resolve_controller_config(
    cfg: &Config,
    profile_name: Option<&str>,
) -> Result<ControllerConfig, ConfigError> {
    let name = profile_name.or(cfg.default_profile.as_deref());

    let (api_url, timeout, export_dir) = match name {
        Some(name) => {
            let profile = cfg
                .profiles
                .get(name)
                .ok_or_else(|| ConfigError::UnknownProfile {
                    profile: name.into(),
                })?;
            (
                profile.api_url.clone(),
                profile.timeout.unwrap_or(cfg.defaults.timeout),
                profile
                    .export_dir
                    .clone()
                    .unwrap_or_else(|| cfg.defaults.export_dir.clone()),
            )
        }
        None => (
            cfg.defaults.api_url.clone(),
            cfg.defaults.timeout,
            cfg.defaults.export_dir.clone(),
        ),
    };

    validate_url(&api_url)?;
    if timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    Ok(ControllerConfig {
        api_url,
        timeout: Duration::from_secs(timeout),
        export_dir,
    })
}

fn validate_url(raw: &str) -> Result<(), ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if matches!(url.scheme(), "http" | "https") {
        Ok(())
    } else {
        Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("expected http or https, got '{}'", url.scheme()),
        })
    }
}
