use std::env;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalEnvironment {
    Development,
    Test,
    Production,
}

impl PortalEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the portal client.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub environment: PortalEnvironment,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub contact: ContactConfig,
    pub telemetry: TelemetryConfig,
}

impl PortalConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = PortalEnvironment::from_str(
            &env::var("PORTAL_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url = ApiConfig::normalize_base_url(
            &env::var("PORTAL_API_BASE").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string()),
        )?;

        let timeout_secs = env::var("PORTAL_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        let session_file = env::var("PORTAL_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".scholar-portal").join("session.json"));

        let acknowledgement_delay_ms = env::var("PORTAL_CONTACT_DELAY_MS")
            .unwrap_or_else(|_| "1000".to_string())
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidContactDelay)?;

        let log_level = env::var("PORTAL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            session: SessionConfig { path: session_file },
            contact: ContactConfig {
                acknowledgement_delay: Duration::from_millis(acknowledgement_delay_ms),
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where the portal API lives and how long a single request may take.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Validate an API origin and strip trailing slashes so paths can be appended.
    pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
        let trimmed = raw.trim().trim_end_matches('/');
        let host = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"));

        match host {
            Some(host) if !host.is_empty() => Ok(trimmed.to_string()),
            _ => Err(ConfigError::InvalidBaseUrl {
                value: raw.to_string(),
            }),
        }
    }
}

/// Location of the persisted bearer token.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ContactConfig {
    pub acknowledgement_delay: Duration,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidBaseUrl { value: String },
    InvalidTimeout,
    InvalidContactDelay,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBaseUrl { value } => write!(
                f,
                "PORTAL_API_BASE must be an http:// or https:// origin (got '{}')",
                value
            ),
            ConfigError::InvalidTimeout => {
                write!(f, "PORTAL_HTTP_TIMEOUT_SECS must be a positive integer")
            }
            ConfigError::InvalidContactDelay => {
                write!(f, "PORTAL_CONTACT_DELAY_MS must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
