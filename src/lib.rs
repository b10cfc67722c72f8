//! Client and command-line tooling for managing PayPal webhook subscriptions.
//!
//! Every operation authenticates with the OAuth client-credentials grant,
//! makes a single request and returns a typed result. Presentation lives in
//! [`cli`].

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

pub use client::PaymentWebhookClient;
pub use config::{Config, ConfigSource, Credentials, Environment};
pub use error::{ClientError, ConfigError};
pub use types::{CreatedWebhook, EventType, Webhook};
