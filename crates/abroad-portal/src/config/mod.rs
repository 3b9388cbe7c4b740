use std::env;
use std::fmt;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the portal.
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

/// Top-level configuration for the portal client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub api: ApiConfig,
    pub statuses: StatusConfig,
    pub telemetry: TelemetryConfig,
}

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_EDITABLE_STATUSES: &str = "Applied,Enrolled";
const DEFAULT_READ_ONLY_STATUSES: &str = "Withdrawn,Canceled";

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let base_url = env::var("PORTAL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let base_url = normalize_base_url(&base_url)?;

        let token = env::var("PORTAL_API_TOKEN")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let timeout_secs = env::var("PORTAL_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        let editable = split_labels(
            &env::var("PORTAL_EDITABLE_STATUSES")
                .unwrap_or_else(|_| DEFAULT_EDITABLE_STATUSES.to_string()),
        );
        let read_only = split_labels(
            &env::var("PORTAL_READ_ONLY_STATUSES")
                .unwrap_or_else(|_| DEFAULT_READ_ONLY_STATUSES.to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            api: ApiConfig {
                base_url,
                token,
                timeout: Duration::from_secs(timeout_secs),
            },
            statuses: StatusConfig {
                editable,
                read_only,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Where the remote portal API lives and how to talk to it.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Bearer token for authenticated calls, the CLI's stand-in for the browser session.
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Status labels the listing views recognize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusConfig {
    pub editable: Vec<String>,
    pub read_only: Vec<String>,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            editable: split_labels(DEFAULT_EDITABLE_STATUSES),
            read_only: split_labels(DEFAULT_READ_ONLY_STATUSES),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed).map_err(|err| ConfigError::InvalidApiUrl {
        value: raw.to_string(),
        reason: err.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidApiUrl {
            value: raw.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(trimmed.to_string())
}

fn split_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidTimeout,
    InvalidApiUrl { value: String, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTimeout => {
                write!(f, "PORTAL_REQUEST_TIMEOUT_SECS must be a positive integer")
            }
            ConfigError::InvalidApiUrl { value, reason } => {
                write!(f, "PORTAL_API_URL '{value}' is not a usable http(s) URL: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
