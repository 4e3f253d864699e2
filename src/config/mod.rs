use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::tagging::ScoringConfig;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

const DEFAULT_REWARD_AMOUNT: f64 = 0.1;
const DEFAULT_INVALID_TAG_PENALTY_RATE: f64 = 0.05;
const DEFAULT_VALID_TAG_PENALTY_RATE: f64 = 0.02;

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let scoring = ScoringConfig {
            reward_amount: load_reward("SCORING_REWARD_AMOUNT", DEFAULT_REWARD_AMOUNT)?,
            invalid_tag_penalty_rate: load_rate(
                "SCORING_INVALID_TAG_PENALTY_RATE",
                DEFAULT_INVALID_TAG_PENALTY_RATE,
            )?,
            valid_tag_penalty_rate: load_rate(
                "SCORING_VALID_TAG_PENALTY_RATE",
                DEFAULT_VALID_TAG_PENALTY_RATE,
            )?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring,
        })
    }
}

fn load_number(name: &str) -> Result<Option<f64>, ConfigError> {
    let raw = match env::var(name) {
        Ok(value) => value,
        Err(_) => return Ok(None),
    };

    raw.trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidNumber {
            name: name.to_string(),
        })
}

/// Penalty rates must lie in `(0, 1]`.
fn load_rate(name: &str, default: f64) -> Result<f64, ConfigError> {
    let value = match load_number(name)? {
        Some(value) => value,
        None => return Ok(default),
    };

    if !(value > 0.0 && value <= 1.0) {
        return Err(ConfigError::RateOutOfRange {
            name: name.to_string(),
            value,
        });
    }

    Ok(value)
}

/// The reward amount only needs to be positive and finite.
fn load_reward(name: &str, default: f64) -> Result<f64, ConfigError> {
    let value = match load_number(name)? {
        Some(value) => value,
        None => return Ok(default),
    };

    if !(value.is_finite() && value > 0.0) {
        return Err(ConfigError::RewardOutOfRange { value });
    }

    Ok(value)
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { name: String },
    RateOutOfRange { name: String, value: f64 },
    RewardOutOfRange { value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { name } => {
                write!(f, "{name} must parse as a floating-point number")
            }
            ConfigError::RateOutOfRange { name, value } => {
                write!(f, "{name} must lie in (0, 1], got {value}")
            }
            ConfigError::RewardOutOfRange { value } => {
                write!(
                    f,
                    "SCORING_REWARD_AMOUNT must be positive and finite, got {value}"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
