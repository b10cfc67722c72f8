use reqwest::StatusCode;
use thiserror::Error;

/// Problems resolving configuration at startup. Always fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingCredential(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The token endpoint answered with a non-success status.
    #[error("authentication failed, status code: {status}, error: {body}")]
    Auth { status: StatusCode, body: String },

    /// A webhook call answered with a status outside its success set.
    #[error("failed to {operation}, status code: {status}, error: {body}")]
    Api {
        operation: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("could not decode {context}: {source}")]
    Decode {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Usage(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err)
        } else {
            ClientError::Transport(err)
        }
    }
}

impl ClientError {
    /// Process exit code for this failure. 2 is left to clap usage errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            ClientError::Usage(_) => 2,
            ClientError::Config(_) => 3,
            ClientError::Auth { .. } => 4,
            ClientError::Api { .. } => 5,
            ClientError::Transport(_) => 6,
            ClientError::Timeout(_) => 7,
            ClientError::Decode { .. } => 8,
        }
    }

    /// HTTP status carried by auth and API failures.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Auth { status, .. } | ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
