//! Configuration module for the keyword registry.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Directory holding the browser assets
    pub public_dir: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Requests allowed per caller within one window
    pub rate_limit_max: u32,
    pub rate_limit_window: Duration,
    /// Key the rate limit on `X-Forwarded-For` instead of the peer address
    pub trust_proxy: bool,
}

/// A configuration variable held a value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub variable: &'static str,
    pub value: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid value for {}: {:?}", self.variable, self.value)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("KEYWORDS_DB_PATH")
            .unwrap_or_else(|_| "./data/keywords.sqlite".to_string())
            .into();

        let bind_addr = parse_var("KEYWORDS_BIND_ADDR", "127.0.0.1:3001")?;

        let public_dir = env::var("KEYWORDS_PUBLIC_DIR")
            .unwrap_or_else(|_| "./public".to_string())
            .into();

        let log_level = env::var("KEYWORDS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = match env::var("KEYWORDS_LOG_FORMAT").as_deref() {
            Err(_) | Ok("text") => LogFormat::Text,
            Ok("json") => LogFormat::Json,
            Ok(other) => {
                return Err(ConfigError {
                    variable: "KEYWORDS_LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        let rate_limit_max = parse_var("KEYWORDS_RATE_LIMIT_MAX", "100")?;
        let window_secs: u64 = parse_var("KEYWORDS_RATE_LIMIT_WINDOW_SECS", "900")?;
        let trust_proxy = parse_var("KEYWORDS_TRUST_PROXY", "false")?;

        Ok(Self {
            db_path,
            bind_addr,
            public_dir,
            log_level,
            log_format,
            rate_limit_max,
            rate_limit_window: Duration::from_secs(window_secs),
            trust_proxy,
        })
    }
}

fn parse_var<T: std::str::FromStr>(variable: &'static str, default: &str) -> Result<T, ConfigError> {
    let value = env::var(variable).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|_| ConfigError { variable, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 8] = [
        "KEYWORDS_DB_PATH",
        "KEYWORDS_BIND_ADDR",
        "KEYWORDS_PUBLIC_DIR",
        "KEYWORDS_LOG_LEVEL",
        "KEYWORDS_LOG_FORMAT",
        "KEYWORDS_RATE_LIMIT_MAX",
        "KEYWORDS_RATE_LIMIT_WINDOW_SECS",
        "KEYWORDS_TRUST_PROXY",
    ];

    // Both cases share process-wide env vars, so they run in one test.
    #[test]
    fn test_config_from_env() {
        for var in VARS {
            env::remove_var(var);
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("./data/keywords.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3001");
        assert_eq!(config.public_dir, PathBuf::from("./public"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.rate_limit_max, 100);
        assert_eq!(config.rate_limit_window, Duration::from_secs(15 * 60));
        assert!(!config.trust_proxy);

        env::set_var("KEYWORDS_TRUST_PROXY", "true");
        assert!(Config::from_env().unwrap().trust_proxy);
        env::remove_var("KEYWORDS_TRUST_PROXY");

        env::set_var("KEYWORDS_RATE_LIMIT_MAX", "lots");
        let err = Config::from_env().unwrap_err();
        assert_eq!(err.variable, "KEYWORDS_RATE_LIMIT_MAX");
        assert_eq!(err.value, "lots");
        env::remove_var("KEYWORDS_RATE_LIMIT_MAX");
    }
}
