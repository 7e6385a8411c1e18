//! Application configuration loaded from environment variables.
//!
//! Everything the client needs (backend URL, session token, language
//! preference) travels in an explicit [`Config`] value handed to
//! [`crate::api::ApiClient`]; nothing is looked up ambiently afterwards.

use std::env;
use std::time::Duration;

use secrecy::SecretString;

/// HTTP header carrying the language preference.
pub const LANGUAGE_HEADER: &str = "Accept-Language";

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_API_URL: &str = "http://localhost:5000";
    pub const LANGUAGE: &str = "en";
    pub const CONNECT_TIMEOUT_SECS: u64 = 5;
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_VERSION: &str = "1.0";
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// What to do with a run status derived on the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatusPolicy {
    /// Push the derived status back to the server after computing progress.
    PushDerived,
    /// Treat the server's stored status as authoritative and never write it.
    ReadOnly,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Backend base URL (without the `/api` suffix)
    pub api_url: String,
    /// Session token forwarded as a bearer token
    pub session_token: Option<SecretString>,
    /// Language preference sent with every request
    pub language: String,
    /// HTTP connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// HTTP total request timeout in seconds
    pub request_timeout_secs: u64,
    /// Version label used by imports when a row has none
    pub default_version: String,
    /// Whether derived run statuses are written back
    pub run_status_policy: RunStatusPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `TCM_API_URL`: Backend base URL (default: http://localhost:5000)
    /// - `TCM_SESSION_TOKEN`: Session token (required in production)
    /// - `TCM_LANGUAGE`: Language preference (default: en)
    /// - `TCM_CONNECT_TIMEOUT_SECS`: Connect timeout (default: 5)
    /// - `TCM_REQUEST_TIMEOUT_SECS`: Request timeout (default: 30)
    /// - `TCM_DEFAULT_VERSION`: Import fallback version (default: 1.0)
    /// - `TCM_PUSH_RUN_STATUS`: Write derived run status back (default: true)
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let api_url = env::var("TCM_API_URL")
            .unwrap_or_else(|_| defaults::DEV_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let session_token = env::var("TCM_SESSION_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from);

        let language = env::var("TCM_LANGUAGE").unwrap_or_else(|_| defaults::LANGUAGE.to_string());

        let connect_timeout_secs = env::var("TCM_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults::CONNECT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue("TCM_CONNECT_TIMEOUT_SECS must be a valid number")
            })?;

        let request_timeout_secs = env::var("TCM_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults::REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue("TCM_REQUEST_TIMEOUT_SECS must be a valid number")
            })?;

        let default_version = env::var("TCM_DEFAULT_VERSION")
            .unwrap_or_else(|_| defaults::DEFAULT_VERSION.to_string());

        let run_status_policy = match env::var("TCM_PUSH_RUN_STATUS") {
            Ok(v) => parse_bool(&v)
                .ok_or(ConfigError::InvalidValue(
                    "TCM_PUSH_RUN_STATUS must be true or false",
                ))
                .map(|push| {
                    if push {
                        RunStatusPolicy::PushDerived
                    } else {
                        RunStatusPolicy::ReadOnly
                    }
                })?,
            Err(_) => RunStatusPolicy::PushDerived,
        };

        let config = Config {
            environment,
            api_url,
            session_token,
            language,
            connect_timeout_secs,
            request_timeout_secs,
            default_version,
            run_status_policy,
        };

        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Development configuration pointing at the given backend.
    pub fn for_api_url(api_url: impl Into<String>) -> Self {
        Config {
            environment: Environment::Development,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            session_token: None,
            language: defaults::LANGUAGE.to_string(),
            connect_timeout_secs: defaults::CONNECT_TIMEOUT_SECS,
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
            default_version: defaults::DEFAULT_VERSION.to_string(),
            run_status_policy: RunStatusPolicy::PushDerived,
        }
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.api_url == defaults::DEV_API_URL {
            errors.push(format!(
                "TCM_API_URL is using development default '{}'. Set the production backend URL.",
                defaults::DEV_API_URL
            ));
        }

        if self.session_token.is_none() {
            errors.push("TCM_SESSION_TOKEN must be set in production.".to_string());
        }

        if self.request_timeout_secs == 0 {
            errors.push("TCM_REQUEST_TIMEOUT_SECS must be greater than zero.".to_string());
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Root of the REST API.
    pub fn api_base(&self) -> String {
        format!("{}/api", self.api_url)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
