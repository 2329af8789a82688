use chrono::NaiveTime;
use serde::Deserialize;
use vigia_alert::throttle::ResetPolicy;
use vigia_alert::window::{ActiveWindow, WindowError};
use vigia_common::net::GatewayOffset;

/// Configuration problems found at startup. These are the only fatal
/// errors in the program: the loop never starts on a bad config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("could not parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error("smtp.recipients must not be empty")]
    NoRecipients,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    pub database: DatabaseConfig,
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub window: WindowConfig,
    /// Pause between cycles, applied whether or not an alert fired.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_probe_attempts")]
    pub probe_attempts: u32,
    /// Failures per address that flip the verdict to unreachable.
    #[serde(default = "default_probe_failure_threshold")]
    pub probe_failure_threshold: u32,
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    /// Consecutive failing cycles before an alert is released.
    #[serde(default = "default_notify_threshold")]
    pub notify_threshold: u32,
    #[serde(default)]
    pub gateway_offset: GatewayOffset,
    #[serde(default)]
    pub throttle_reset: ResetPolicy,
    /// Send a recovery email on the first clean cycle after failures.
    #[serde(default)]
    pub notify_all_clear: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite endpoint database owned by the ETL pipeline.
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub from: String,
    pub recipients: Vec<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub starttls: bool,
}

/// Daily active window as `"HH:MM"` strings, parsed once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_start")]
    pub start: String,
    #[serde(default = "default_window_end")]
    pub end: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            start: default_window_start(),
            end: default_window_end(),
        }
    }
}

impl WindowConfig {
    pub fn active_window(&self) -> Result<ActiveWindow, ConfigError> {
        Ok(ActiveWindow::new(
            parse_time(&self.start)?,
            parse_time(&self.end)?,
        )?)
    }
}

fn parse_time(s: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| ConfigError::InvalidTime(s.to_string()))
}

fn default_poll_interval_secs() -> u64 {
    360
}

fn default_probe_attempts() -> u32 {
    3
}

fn default_probe_failure_threshold() -> u32 {
    2
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_notify_threshold() -> u32 {
    25
}

fn default_smtp_port() -> u16 {
    25
}

fn default_window_start() -> String {
    "09:30".to_string()
}

fn default_window_end() -> String {
    "21:55".to_string()
}

impl MonitorConfig {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.window.active_window()?;
        if self.smtp.recipients.is_empty() {
            return Err(ConfigError::NoRecipients);
        }
        Ok(())
    }
}
