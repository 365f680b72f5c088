use crate::workflows::production::readiness::{BottlingPolicy, ReadinessConfig};
use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Deployment stage, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Settings for the service and CLI, loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub rules: RulesConfig,
}

impl AppConfig {
    /// Read `.env` (if present) and the `APP_*` variables; unset values fall
    /// back to local development defaults.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = optional("APP_ENV")
            .map(|raw| AppEnvironment::parse(&raw))
            .unwrap_or_default();

        let port = match optional("APP_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let min_bottling_volume_gallons = match optional("APP_MIN_BOTTLING_GALLONS") {
            Some(raw) => positive_gallons(raw)?,
            None => BottlingPolicy::STANDARD_MIN_VOLUME_GALLONS,
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                host: optional("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
            telemetry: TelemetryConfig {
                log_level: optional("APP_LOG_LEVEL")
                    .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            },
            rules: RulesConfig {
                min_bottling_volume_gallons,
            },
        })
    }

    /// Thresholds handed to the readiness engine for this deployment.
    pub fn readiness_config(&self) -> ReadinessConfig {
        ReadinessConfig {
            bottling: BottlingPolicy {
                min_volume_gallons: self.rules.min_bottling_volume_gallons,
            },
            ..ReadinessConfig::default()
        }
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn positive_gallons(raw: String) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(ConfigError::InvalidMinimumVolume(raw)),
    }
}

/// HTTP bind settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidHost {
                    host: self.host.clone(),
                    source,
                })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

/// Per-deployment overrides for the production rule thresholds.
#[derive(Debug, Clone)]
pub struct RulesConfig {
    pub min_bottling_volume_gallons: f64,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort(String),
    InvalidHost {
        host: String,
        source: std::net::AddrParseError,
    },
    InvalidMinimumVolume(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort(raw) => {
                write!(f, "APP_PORT must be a port number, got '{}'", raw)
            }
            ConfigError::InvalidHost { host, .. } => {
                write!(f, "APP_HOST '{}' is not an IP address or localhost", host)
            }
            ConfigError::InvalidMinimumVolume(raw) => write!(
                f,
                "APP_MIN_BOTTLING_GALLONS must be a positive number of gallons, got '{}'",
                raw
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source, .. } => Some(source),
            ConfigError::InvalidPort(_) | ConfigError::InvalidMinimumVolume(_) => None,
        }
    }
}
