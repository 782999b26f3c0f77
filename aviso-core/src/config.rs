//! Configuration for the monitor.
//!
//! Defines [`MonitorConfig`], carrying the monitored URLs, per-target
//! cadences and the state-file path, with defaults matching the observed
//! deployment. A YAML file can override any subset of the fields.
//! Portal credentials come from the environment, never from the file.

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Course page checked over plain HTTP.
pub const DEFAULT_CATEDRA_URL: &str = "http://163.10.22.92/catedras/arquitecturaP2003/";
/// Portal login form.
pub const DEFAULT_PORTAL_LOGIN_URL: &str = "https://autogestion.guarani.unlp.edu.ar/";
/// Portal page carrying the alert elements, reachable only after login.
pub const DEFAULT_PORTAL_TARGET_URL: &str =
    "https://autogestion.guarani.unlp.edu.ar/acceso/cambiar_carrera?id=477&op=actuacion_provisoria";

/// Environment variable holding the portal username.
pub const ENV_PORTAL_USER: &str = "SIU_GUARANI_USER";
/// Environment variable holding the portal password.
pub const ENV_PORTAL_PASSWORD: &str = "SIU_GUARANI_PASSWORD";

const DEFAULT_CATEDRA_INTERVAL_MINUTES: u64 = 5;
const DEFAULT_PORTAL_INTERVAL_MINUTES: u64 = 8;
const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 10;
const DEFAULT_STATE_FILE: &str = "last_update_timestamp.txt";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Full configuration of one monitor process.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// URL of the course page (plain HTTP target).
    pub catedra_url: String,
    /// URL of the portal login form.
    pub portal_login_url: String,
    /// URL of the portal page carrying the alert elements.
    pub portal_target_url: String,
    /// Minutes between course-page checks.
    pub catedra_interval_minutes: u64,
    /// Minutes between portal checks.
    pub portal_interval_minutes: u64,
    /// Path of the plain-text file holding the last known timestamp.
    pub state_file: PathBuf,
    /// Timeout for plain HTTP fetches, in seconds.
    pub http_timeout_seconds: u64,
    /// Browser-like User-Agent sent with plain HTTP fetches.
    pub user_agent: String,
    /// When set, the latest fetched course-page HTML is written here for
    /// inspection.
    pub dump_html: Option<PathBuf>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            catedra_url: DEFAULT_CATEDRA_URL.to_owned(),
            portal_login_url: DEFAULT_PORTAL_LOGIN_URL.to_owned(),
            portal_target_url: DEFAULT_PORTAL_TARGET_URL.to_owned(),
            catedra_interval_minutes: DEFAULT_CATEDRA_INTERVAL_MINUTES,
            portal_interval_minutes: DEFAULT_PORTAL_INTERVAL_MINUTES,
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            http_timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            dump_html: None,
        }
    }
}

impl MonitorConfig {
    /// Loads a configuration from a YAML file, with defaults for any
    /// omitted field.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: MonitorConfig = serde_yml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        debug!("loaded monitor config from {}", path.display());
        Ok(config)
    }

    /// Cadence of the course-page check.
    pub fn catedra_interval(&self) -> Duration {
        Duration::from_secs(self.catedra_interval_minutes * 60)
    }

    /// Cadence of the portal check.
    pub fn portal_interval(&self) -> Duration {
        Duration::from_secs(self.portal_interval_minutes * 60)
    }

    /// Timeout applied to plain HTTP fetches.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}

/// Portal credentials, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Reads `SIU_GUARANI_USER` / `SIU_GUARANI_PASSWORD`. Returns `None`
    /// when either is unset or empty; the portal check is then skipped
    /// every cycle with a logged auth failure.
    pub fn from_env() -> Option<Self> {
        let username = std::env::var(ENV_PORTAL_USER).ok()?;
        let password = std::env::var(ENV_PORTAL_PASSWORD).ok()?;
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { username, password })
    }
}
