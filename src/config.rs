use crate::error::ConfigError;
use reqwest::Url;
use std::fmt;
use std::time::Duration;

pub const SANDBOX_API_BASE: &str = "https://api.sandbox.paypal.com";
pub const PRODUCTION_API_BASE: &str = "https://api.paypal.com";

pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";
pub const CLIENT_ID_VAR: &str = "PAYPAL_CLIENT_ID";
pub const SECRET_VAR: &str = "PAYPAL_SECRET";
pub const API_BASE_VAR: &str = "PAYPAL_API_BASE";
pub const TIMEOUT_VAR: &str = "PAYPAL_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    /// `prod` / `production` select production; anything else is sandbox.
    pub fn from_flag(flag: &str) -> Self {
        match flag.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Environment::Production,
            _ => Environment::Sandbox,
        }
    }

    pub fn api_base(self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_API_BASE,
            Environment::Production => PRODUCTION_API_BASE,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Sandbox => f.write_str("sandbox"),
            Environment::Production => f.write_str("production"),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Raw, unvalidated configuration values as read from the environment or
/// command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    pub environment: Option<String>,
    pub client_id: Option<String>,
    pub secret: Option<String>,
    pub api_base: Option<String>,
    pub timeout_secs: Option<String>,
}

impl ConfigSource {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            environment: lookup(ENVIRONMENT_VAR),
            client_id: lookup(CLIENT_ID_VAR),
            secret: lookup(SECRET_VAR),
            api_base: lookup(API_BASE_VAR),
            timeout_secs: lookup(TIMEOUT_VAR),
        }
    }
}

/// Resolved configuration, built once at startup and handed to the client.
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub api_base: String,
    pub credentials: Credentials,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(ConfigSource::from_env())
    }

    pub fn resolve(source: ConfigSource) -> Result<Self, ConfigError> {
        let client_id = required(source.client_id, CLIENT_ID_VAR)?;
        let secret = required(source.secret, SECRET_VAR)?;

        let environment = source
            .environment
            .as_deref()
            .map(Environment::from_flag)
            .unwrap_or_default();

        let api_base = match source.api_base.filter(|base| !base.trim().is_empty()) {
            Some(base) => parse_api_base(&base)?,
            None => environment.api_base().to_string(),
        };

        let timeout = match source.timeout_secs {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            environment,
            api_base,
            credentials: Credentials { client_id, secret },
            timeout,
        })
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingCredential(name))
}

/// Must be an absolute http(s) URL that can take path segments.
fn parse_api_base(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base() => {
            Ok(trimmed.to_string())
        }
        _ => Err(ConfigError::InvalidValue {
            name: API_BASE_VAR,
            value: raw.to_string(),
        }),
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidValue {
            name: TIMEOUT_VAR,
            value: raw.to_string(),
        }),
    }
}
