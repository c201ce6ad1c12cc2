pub mod toml_config;

use crate::core::{ConfigProvider, LimitPolicy};
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://api";
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = concat!("brevet-relay/", env!("CARGO_PKG_VERSION"));
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

#[derive(Debug, Clone, Parser)]
#[command(name = "brevet-relay")]
#[command(about = "Serves the brevet control list page and relays queries to the REST API")]
pub struct CliConfig {
    /// Base URL of the brevet REST API
    #[arg(long, env = "RELAY_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Address the page is served on
    #[arg(long, env = "RELAY_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,

    /// Upstream request timeout
    #[arg(long, env = "RELAY_TIMEOUT_SECONDS", default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, env = "RELAY_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Reject limits outside 1-20 instead of forwarding them
    #[arg(long, env = "RELAY_ENFORCE_LIMIT_RANGE")]
    pub enforce_limit_range: bool,

    #[arg(long, value_enum, env = "RELAY_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// TOML file to load settings from instead of the flags above
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            bind: DEFAULT_BIND.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            enforce_limit_range: false,
            log_format: None,
            config: None,
            verbose: false,
        }
    }
}

impl ConfigProvider for CliConfig {
    fn api_base(&self) -> &str {
        &self.api_base
    }

    fn bind_address(&self) -> &str {
        &self.bind
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn limit_policy(&self) -> LimitPolicy {
        if self.enforce_limit_range {
            LimitPolicy::Enforce
        } else {
            LimitPolicy::Forward
        }
    }
}

/// Checks shared by every `ConfigProvider`.
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validation::validate_url("api_base", config.api_base())?;
    validation::validate_socket_addr("bind", config.bind_address())?;
    validation::validate_range(
        "timeout_seconds",
        config.request_timeout().as_secs(),
        1,
        MAX_TIMEOUT_SECONDS,
    )?;
    validation::validate_non_empty_string("user_agent", config.user_agent())
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::try_parse_from(["brevet-relay"]).unwrap();

        assert_eq!(config.api_base(), "http://api");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.limit_policy(), LimitPolicy::Forward);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = CliConfig::try_parse_from([
            "brevet-relay",
            "--api-base",
            "https://brevets.example.com/api",
            "--bind",
            "127.0.0.1:9000",
            "--timeout-seconds",
            "3",
            "--enforce-limit-range",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.limit_policy(), LimitPolicy::Enforce);
        assert_eq!(config.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = CliConfig {
            api_base: "ftp://api".to_string(),
            ..CliConfig::default()
        };
        assert!(config.validate().is_err());

        let config = CliConfig {
            timeout_seconds: 0,
            ..CliConfig::default()
        };
        assert!(config.validate().is_err());

        let config = CliConfig {
            bind: "nowhere".to_string(),
            ..CliConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
