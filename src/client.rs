use crate::config::{Config, API_BASE_VAR};
use crate::error::{ClientError, ConfigError, Result};
use crate::types::{
    AccessToken, CreateWebhookRequest, CreatedWebhook, EventType, EventTypeList, Webhook,
    WebhookList,
};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use uuid::Uuid;

const TOKEN_PATH: &[&str] = &["v1", "oauth2", "token"];
const WEBHOOKS_PATH: &[&str] = &["v1", "notifications", "webhooks"];
const EVENT_TYPES_PATH: &[&str] = &["v1", "notifications", "webhooks-event-types"];

/// Idempotency key header understood by the provider on POST calls.
pub const REQUEST_ID_HEADER: &str = "PayPal-Request-Id";

/// Stateless client for the provider's webhook-management API.
///
/// Every operation fetches a fresh bearer token first; nothing is cached
/// between calls.
pub struct PaymentWebhookClient {
    http: reqwest::Client,
    config: Config,
}

impl PaymentWebhookClient {
    pub fn new(config: Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Transport)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Base URL plus `segments`, each percent-encoded as a single path
    /// segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let invalid_base = || {
            ClientError::Config(ConfigError::InvalidValue {
                name: API_BASE_VAR,
                value: self.config.api_base.clone(),
            })
        };
        let mut url = Url::parse(&self.config.api_base).map_err(|_| invalid_base())?;
        url.path_segments_mut()
            .map_err(|_| invalid_base())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ─── Token ───────────────────────────────────────────────────────────────

    /// Exchange the client credentials for a bearer token.
    pub async fn fetch_token(&self) -> Result<String> {
        let url = self.endpoint(TOKEN_PATH)?;
        let credentials = &self.config.credentials;
        debug!(%url, client_id = %credentials.client_id, "requesting access token");

        let request = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, "en_US")
            .basic_auth(&credentials.client_id, Some(&credentials.secret))
            .form(&[("grant_type", "client_credentials")]);
        let (status, body) = send(request).await?;

        if !status.is_success() {
            return Err(ClientError::Auth { status, body });
        }

        let token: AccessToken = decode(&body, "token response")?;
        debug!(expires_in = ?token.expires_in, "access token acquired");
        Ok(token.access_token)
    }

    async fn authorized(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        let token = self.fetch_token().await?;
        debug!(%method, %url, "calling webhook api");
        Ok(self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json")
            .bearer_auth(token))
    }

    // ─── Webhooks ────────────────────────────────────────────────────────────

    pub async fn list_webhooks(&self) -> Result<Vec<Webhook>> {
        let request = self.authorized(Method::GET, WEBHOOKS_PATH).await?;
        let (status, body) = send(request).await?;

        if status != StatusCode::OK {
            return Err(api_error("list webhooks", status, body));
        }

        let list: WebhookList = decode(&body, "webhook list")?;
        info!(count = list.webhooks.len(), "listed webhooks");
        Ok(list.webhooks)
    }

    /// Register `url` for the given event type names. Names are passed
    /// through unchecked; the provider rejects unknown ones.
    pub async fn create_webhook(&self, url: &str, event_types: &[String]) -> Result<CreatedWebhook> {
        let request_id = Uuid::new_v4().to_string();
        let request = self
            .authorized(Method::POST, WEBHOOKS_PATH)
            .await?
            .header(REQUEST_ID_HEADER, &request_id)
            .json(&CreateWebhookRequest::new(url, event_types));
        let (status, body) = send(request).await?;

        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(api_error("create webhook", status, body));
        }

        let id = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("id").and_then(|id| id.as_str()).map(str::to_string));
        info!(id = ?id, %request_id, "webhook created");
        Ok(CreatedWebhook { id, raw: body })
    }

    /// The id is sent as one encoded path segment. Ids that cannot name a
    /// segment (empty, `.` or `..`) are rejected before any request.
    pub async fn delete_webhook(&self, webhook_id: &str) -> Result<()> {
        if matches!(webhook_id, "" | "." | "..") {
            return Err(ClientError::Usage(format!(
                "invalid webhook id: {webhook_id:?}"
            )));
        }
        let segments: Vec<&str> = WEBHOOKS_PATH.iter().copied().chain([webhook_id]).collect();
        let request = self.authorized(Method::DELETE, &segments).await?;
        let (status, body) = send(request).await?;

        if status != StatusCode::OK && status != StatusCode::NO_CONTENT {
            return Err(api_error("delete webhook", status, body));
        }

        info!(%webhook_id, "webhook deleted");
        Ok(())
    }

    // ─── Event types ─────────────────────────────────────────────────────────

    /// All event types the provider offers, with descriptions. A non-200
    /// answer is an error.
    pub async fn fetch_event_types(&self) -> Result<Vec<EventType>> {
        let request = self.authorized(Method::GET, EVENT_TYPES_PATH).await?;
        let (status, body) = send(request).await?;

        if status != StatusCode::OK {
            return Err(api_error("list event types", status, body));
        }

        let list: EventTypeList = decode(&body, "event type list")?;
        Ok(list.event_types)
    }

    /// Names of the available event types, in response order.
    ///
    /// A non-200 answer from the event-type endpoint yields an empty list
    /// rather than an error. Token, transport and timeout failures still
    /// propagate.
    pub async fn list_event_types(&self) -> Result<Vec<String>> {
        match self.fetch_event_types().await {
            Ok(event_types) => Ok(event_types.into_iter().map(|e| e.name).collect()),
            Err(ClientError::Api { status, .. }) => {
                warn!(%status, "failed to list event types");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

async fn send(request: RequestBuilder) -> Result<(StatusCode, String)> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;
    debug!(%status, bytes = body.len(), "response received");
    Ok((status, body))
}

fn decode<T: DeserializeOwned>(body: &str, context: &'static str) -> Result<T> {
    serde_json::from_str(body).map_err(|source| ClientError::Decode { context, source })
}

fn api_error(operation: &'static str, status: StatusCode, body: String) -> ClientError {
    ClientError::Api {
        operation,
        status,
        body,
    }
}
