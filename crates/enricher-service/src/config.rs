//! Service configuration, read once from a TOML file at startup.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveTime;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// `users_sync_time` is not an HH:MM time of day.
    #[error("invalid users_sync_time {0:?}: expected HH:MM")]
    SyncTime(String),

    /// The log level string is not a valid tracing level.
    #[error("invalid log level {0:?}")]
    LogLevel(String),

    /// A log path has no file name component.
    #[error("invalid log path {0:?}")]
    LogPath(PathBuf),

    /// Filesystem error while preparing log directories.
    #[error("log setup I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level configuration, mirroring the four sections of the config file.
#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub ews: EwsSection,
    pub cms: CmsSection,
    pub enricher: EnricherSection,
    pub logging: LoggingSection,
}

/// Calendar service endpoint and the impersonating service account.
#[derive(Debug, Deserialize)]
pub struct EwsSection {
    /// Host name or full EWS endpoint URL.
    pub server: String,
    pub username: String,
    pub password: SecretString,
    #[serde(default)]
    pub accept_invalid_certs: bool,
    /// Mail domain appended to directory user names, including the `@`.
    pub mail_domain: String,
}

/// Conferencing directory endpoint and join-link composition parameters.
#[derive(Debug, Deserialize)]
pub struct CmsSection {
    pub base_url: String,
    pub username: String,
    pub password: SecretString,
    #[serde(default)]
    pub accept_invalid_certs: bool,
    pub personal_room_suffix: String,
    pub web_base_url: String,
    pub sip_domain: String,
    /// Local time of day ("HH:MM") of the daily roster refresh.
    pub users_sync_time: String,
}

impl CmsSection {
    /// Parse the configured refresh time of day.
    pub fn sync_time(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(&self.users_sync_time, "%H:%M")
            .map_err(|_| ConfigError::SyncTime(self.users_sync_time.clone()))
    }
}

/// Enrichment pipeline parameters.
#[derive(Debug, Deserialize)]
pub struct EnricherSection {
    /// Marker word looked for in event locations.
    pub marker_word: String,
    pub template_path: PathBuf,
    pub roster_path: PathBuf,
    #[serde(default = "default_poll_period_secs")]
    pub poll_period_secs: u64,
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,
}

impl EnricherSection {
    /// The poll period as a duration.
    pub fn poll_period(&self) -> Duration {
        Duration::from_secs(self.poll_period_secs)
    }
}

/// The two log streams and their shared level.
#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Operational log file.
    pub meetings_log: PathBuf,
    /// Dedicated log file for permanent mailbox failures.
    pub failures_log: PathBuf,
}

fn default_poll_period_secs() -> u64 {
    60
}

fn default_fetch_limit() -> usize {
    20
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ServiceConfig {
    /// Load and validate the configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ServiceConfig = toml::from_str(&content)?;
        config.cms.sync_time()?;
        Ok(config)
    }
}
