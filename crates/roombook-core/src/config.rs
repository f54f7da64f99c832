// ── Runtime client configuration ──
//
// Describes how to reach the booking service and where exports go.
// Never touches disk; roombook-config builds one from the config file.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3001";

/// Configuration handed to [`Controller::new`](crate::Controller::new).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Base URL of the roombook API (without the `/api` suffix).
    pub api_url: String,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Directory that export files are written to.
    pub export_dir: PathBuf,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            timeout: Duration::from_secs(30),
            export_dir: PathBuf::from("."),
        }
    }
}
