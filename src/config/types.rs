//! Configuration types and CLI options.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use super::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_COOLDOWN_SECS, DEFAULT_DB_PATH, DEFAULT_HTTP_TIMEOUT_SECS,
};

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Application configuration.
///
/// Constructed once at startup (from the CLI plus `.env`-sourced environment
/// variables) and passed by reference into the components that need it; there
/// is no ambient global configuration state.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "geotail",
    about = "Tails a web-server access log, enriches client IPs with geolocation data, \
             and records deduplicated events in a SQLite database."
)]
pub struct Config {
    /// Access log file to tail. Only content appended after startup is
    /// processed.
    pub log_path: PathBuf,

    /// SQLite database path
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    pub db_path: PathBuf,

    /// Base URL of the geolocation enrichment service
    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// Enrichment service API token
    #[arg(long, env = "FINDIP_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value = "plain")]
    pub log_format: LogFormat,

    /// Seconds to wait after an API rate-limit response before retrying
    #[arg(long, default_value_t = DEFAULT_COOLDOWN_SECS)]
    pub cooldown_secs: u64,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub timeout_seconds: u64,
}

impl Config {
    /// The 429 cooldown as a `Duration`.
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("/var/log/nginx/access.log"),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token: String::new(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default_values() {
        let config = Config::default();
        assert_eq!(config.db_path, PathBuf::from("./geotail.db"));
        assert_eq!(config.api_base_url, "https://api.findip.net");
        assert_eq!(config.cooldown_secs, 60);
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.cooldown(), Duration::from_secs(60));
    }

    #[test]
    fn test_cli_parsing_with_overrides() {
        let config = Config::try_parse_from([
            "geotail",
            "/var/log/nginx/access.log",
            "--db-path",
            "/tmp/x.db",
            "--token",
            "abc",
            "--cooldown-secs",
            "5",
        ])
        .expect("args should parse");
        assert_eq!(config.log_path, PathBuf::from("/var/log/nginx/access.log"));
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.token, "abc");
        assert_eq!(config.cooldown_secs, 5);
    }

    #[test]
    fn test_cli_parsing_requires_log_path() {
        let result = Config::try_parse_from(["geotail", "--token", "abc"]);
        assert!(result.is_err());
    }
}
