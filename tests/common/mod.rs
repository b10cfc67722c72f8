#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    routing::{delete, get, post},
    Router,
};
use paypal_webhooks::{Config, ConfigSource, PaymentWebhookClient};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

pub const CLIENT_ID: &str = "test-client";
pub const SECRET: &str = "test-secret";
pub const TOKEN: &str = "test-token";

/// A fixed status + body the mock answers with.
#[derive(Debug, Clone)]
pub struct Canned {
    pub status: StatusCode,
    pub body: String,
}

impl Canned {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).expect("valid status"),
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self::new(status, body.to_string())
    }
}

/// What each endpoint of the mock provider answers.
#[derive(Debug, Clone)]
pub struct Behavior {
    pub token: Canned,
    pub list: Canned,
    pub create: Canned,
    pub delete: Canned,
    pub event_types: Canned,
    /// Applied before every response.
    pub delay: Option<Duration>,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            token: Canned::json(
                200,
                serde_json::json!({
                    "scope": "https://uri.paypal.com/services/applications/webhooks",
                    "access_token": TOKEN,
                    "token_type": "Bearer",
                    "expires_in": 32400
                }),
            ),
            list: Canned::json(200, serde_json::json!({ "webhooks": [] })),
            create: Canned::json(201, serde_json::json!({ "id": "WH-NEW" })),
            delete: Canned::new(204, ""),
            event_types: Canned::json(200, serde_json::json!({ "event_types": [] })),
            delay: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone, Copy)]
enum Endpoint {
    Token,
    List,
    Create,
    Delete,
    EventTypes,
}

#[derive(Clone)]
struct ServerState {
    behavior: Arc<RwLock<Behavior>>,
    requests: Arc<RwLock<Vec<Recorded>>>,
}

/// In-process stand-in for the provider's REST API, bound on 127.0.0.1:0.
pub struct MockProvider {
    pub base_url: String,
    state: ServerState,
}

impl MockProvider {
    pub async fn start(behavior: Behavior) -> Self {
        let state = ServerState {
            behavior: Arc::new(RwLock::new(behavior)),
            requests: Arc::new(RwLock::new(Vec::new())),
        };

        let app = Router::new()
            .route("/v1/oauth2/token", post(token))
            .route("/v1/notifications/webhooks", get(list).post(create))
            .route("/v1/notifications/webhooks/{webhook_id}", delete(remove))
            .route("/v1/notifications/webhooks-event-types", get(event_types))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock provider");
        let port = listener.local_addr().expect("local addr").port();

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock provider");
        });

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            state,
        }
    }

    pub async fn set(&self, update: impl FnOnce(&mut Behavior)) {
        update(&mut *self.state.behavior.write().await);
    }

    pub async fn requests(&self) -> Vec<Recorded> {
        self.state.requests.read().await.clone()
    }

    pub async fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .await
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Credentials and base URL pointing at this mock.
    pub fn source(&self) -> ConfigSource {
        ConfigSource {
            client_id: Some(CLIENT_ID.into()),
            secret: Some(SECRET.into()),
            api_base: Some(self.base_url.clone()),
            timeout_secs: Some("5".into()),
            environment: None,
        }
    }

    pub fn config(&self) -> Config {
        Config::resolve(self.source()).expect("mock config")
    }

    pub fn client(&self) -> PaymentWebhookClient {
        PaymentWebhookClient::new(self.config()).expect("client")
    }
}

async fn respond(
    state: ServerState,
    endpoint: Endpoint,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    state.requests.write().await.push(Recorded {
        method,
        path: uri.path().to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    });

    let behavior = state.behavior.read().await.clone();
    if let Some(delay) = behavior.delay {
        tokio::time::sleep(delay).await;
    }

    let canned = match endpoint {
        Endpoint::Token => behavior.token,
        Endpoint::List => behavior.list,
        Endpoint::Create => behavior.create,
        Endpoint::Delete => behavior.delete,
        Endpoint::EventTypes => behavior.event_types,
    };
    (
        canned.status,
        [(header::CONTENT_TYPE, "application/json")],
        canned.body,
    )
}

macro_rules! endpoint_handler {
    ($name:ident, $endpoint:expr) => {
        async fn $name(
            State(state): State<ServerState>,
            method: Method,
            uri: Uri,
            headers: HeaderMap,
            body: Bytes,
        ) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
            respond(state, $endpoint, method, uri, headers, body).await
        }
    };
}

endpoint_handler!(token, Endpoint::Token);
endpoint_handler!(list, Endpoint::List);
endpoint_handler!(create, Endpoint::Create);
endpoint_handler!(remove, Endpoint::Delete);
endpoint_handler!(event_types, Endpoint::EventTypes);

/// A base URL nothing is listening on.
pub async fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
