// ── Server configuration ──
//
// Defaults, then an optional TOML file, then the environment. `PORT` and
// `DATABASE_URL` are read unprefixed; everything else uses `ROOMBOOK_`.

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

pub const CONFIG_ENV: &str = "ROOMBOOK_SERVER_CONFIG";
const LOG_ENV: &str = "ROOMBOOK_LOG";

pub mod defaults {
    use super::{IpAddr, Ipv4Addr};

    pub const fn listen_address() -> IpAddr {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    }

    pub const fn port() -> u16 {
        3001
    }

    pub fn room_name() -> String {
        "Без названия".into()
    }

    pub fn cancel_suffix() -> String {
        " (отменено)".into()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::listen_address")]
    pub address: IpAddr,

    #[serde(default = "defaults::port")]
    pub port: u16,

    /// Connection string for a persistent store. Accepted for
    /// compatibility; the bundled binary only ships [`MemoryStore`](crate::store::MemoryStore).
    #[serde(default)]
    pub database_url: Option<String>,

    /// Room name recorded on bookings created without one.
    #[serde(default = "defaults::room_name")]
    pub default_room_name: String,

    /// Appended to a booking's note when it is cancelled.
    #[serde(default = "defaults::cancel_suffix")]
    pub cancel_suffix: String,

    /// Reject bookings whose `roomCode` matches no room.
    #[serde(default)]
    pub strict_room_codes: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: defaults::listen_address(),
            port: defaults::port(),
            database_url: None,
            default_room_name: defaults::room_name(),
            cancel_suffix: defaults::cancel_suffix(),
            strict_room_codes: false,
        }
    }
}

impl ServerConfig {
    /// `$ROOMBOOK_SERVER_CONFIG`, else `<config dir>/server.toml`.
    pub fn default_path() -> PathBuf {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        ProjectDirs::from("com", "roombook", "roombook").map_or_else(
            || PathBuf::from("server.toml"),
            |dirs| dirs.config_dir().join("server.toml"),
        )
    }

    /// Defaults merged with the file at `path` (missing file is fine).
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Self::default())).merge(Toml::file(path))
    }

    /// Defaults, file, then environment.
    pub fn load(path: &Path) -> Result<Self, Box<figment::Error>> {
        Self::figment(path)
            .merge(Env::prefixed("ROOMBOOK_"))
            .merge(Env::raw().only(&["PORT", "DATABASE_URL"]))
            .extract()
            .map_err(Box::new)
    }
}

/// Install the global fmt subscriber. Filter comes from `ROOMBOOK_LOG`
/// (default `info`).
pub fn init_logging(hide_timestamp: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    if hide_timestamp {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .without_time()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
