use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventType {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.description)
    }
}

/// A webhook as reported by the provider. Never cached locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Webhook {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub event_types: Vec<EventType>,
}

/// Multi-line summary: the id/url header followed by one line per event type.
impl fmt::Display for Webhook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Webhook ID: {}, URL: {}", self.id, self.url)?;
        for event_type in &self.event_types {
            write!(f, "\n{event_type}")?;
        }
        Ok(())
    }
}

/// Outcome of a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedWebhook {
    /// Identifier assigned by the provider, when the body carried one.
    pub id: Option<String>,
    /// Response body exactly as received.
    pub raw: String,
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WebhookList {
    #[serde(default)]
    pub webhooks: Vec<Webhook>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EventTypeList {
    #[serde(default)]
    pub event_types: Vec<EventType>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateWebhookRequest<'a> {
    pub url: &'a str,
    pub event_types: Vec<EventTypeName<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EventTypeName<'a> {
    pub name: &'a str,
}

impl<'a> CreateWebhookRequest<'a> {
    pub fn new(url: &'a str, event_types: &'a [String]) -> Self {
        Self {
            url,
            event_types: event_types
                .iter()
                .map(|name| EventTypeName { name })
                .collect(),
        }
    }
}
