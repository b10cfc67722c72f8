use crate::client::PaymentWebhookClient;
use crate::config::{Config, ConfigSource};
use crate::error::{ClientError, Result};
use crate::types::EventType;
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "paypal-webhooks", version, about = "Manage PayPal webhook subscriptions")]
pub struct Cli {
    /// `prod` selects the production API, anything else the sandbox
    #[arg(long, env = "ENVIRONMENT", global = true)]
    pub environment: Option<String>,

    /// Override the API base URL
    #[arg(long, env = "PAYPAL_API_BASE", global = true)]
    pub api_base: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "PAYPAL_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List registered webhooks
    #[command(name = "list", alias = "ls")]
    List,
    /// Register a new webhook
    #[command(name = "create", alias = "new")]
    Create(CreateOptions),
    /// Delete a webhook by id
    #[command(name = "delete", alias = "rm")]
    Delete(DeleteOptions),
    /// List the event types a webhook can subscribe to
    #[command(name = "event-types", alias = "list-event-types")]
    EventTypes(EventTypesOptions),
}

#[derive(Debug, Args)]
pub struct CreateOptions {
    /// Target URL the provider will deliver events to
    #[arg(long)]
    pub url: String,

    /// Event type name to subscribe to (repeatable)
    #[arg(
        long = "event",
        short = 'e',
        value_name = "NAME",
        required_unless_present = "all_events"
    )]
    pub events: Vec<String>,

    /// Subscribe to every available event type
    #[arg(long)]
    pub all_events: bool,
}

#[derive(Debug, Args)]
pub struct DeleteOptions {
    /// Identifier of the webhook to delete
    #[arg(value_parser = clap::builder::NonEmptyStringValueParser::new())]
    pub webhook_id: String,
}

#[derive(Debug, Args)]
pub struct EventTypesOptions {
    /// Include each event type's description
    #[arg(long)]
    pub describe: bool,
}

impl Cli {
    /// Command-line values take precedence over `source`.
    pub fn config_source(&self, source: ConfigSource) -> ConfigSource {
        ConfigSource {
            environment: self.environment.clone().or(source.environment),
            api_base: self.api_base.clone().or(source.api_base),
            timeout_secs: self.timeout_secs.clone().or(source.timeout_secs),
            ..source
        }
    }
}

/// Resolve configuration from the process environment and run the command.
pub async fn execute(cli: Cli) -> Result<String> {
    execute_with(cli, ConfigSource::from_env()).await
}

/// Configuration is resolved before the client exists, so a missing
/// credential fails without touching the network.
pub async fn execute_with(cli: Cli, source: ConfigSource) -> Result<String> {
    let config = Config::resolve(cli.config_source(source))?;
    let client = PaymentWebhookClient::new(config)?;
    let config = client.config();
    debug!(environment = %config.environment, api_base = %config.api_base, "configuration resolved");
    run(&cli.command, &client, cli.json).await
}

/// Run one command and render its result for stdout.
pub async fn run(command: &Commands, client: &PaymentWebhookClient, as_json: bool) -> Result<String> {
    match command {
        Commands::List => list(client, as_json).await,
        Commands::Create(options) => create(options, client, as_json).await,
        Commands::Delete(options) => delete(options, client, as_json).await,
        Commands::EventTypes(options) => event_types(options, client, as_json).await,
    }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn list(client: &PaymentWebhookClient, as_json: bool) -> Result<String> {
    let webhooks = client.list_webhooks().await?;

    if as_json {
        return Ok(render_json(json!({
            "webhooks": to_json(&webhooks),
            "count": webhooks.len(),
        })));
    }

    let mut lines = vec!["Got webhooks...".to_string()];
    lines.extend(webhooks.iter().map(ToString::to_string));
    Ok(lines.join("\n"))
}

async fn create(options: &CreateOptions, client: &PaymentWebhookClient, as_json: bool) -> Result<String> {
    let available: Vec<String> = if options.all_events {
        client
            .fetch_event_types()
            .await?
            .into_iter()
            .map(|e| e.name)
            .collect()
    } else {
        Vec::new()
    };
    let event_types = merge_event_types(&options.events, available);

    if event_types.is_empty() {
        return Err(ClientError::Usage(
            "create needs at least one event type".to_string(),
        ));
    }

    let created = client.create_webhook(&options.url, &event_types).await?;

    if as_json {
        return Ok(render_json(to_json(&created)));
    }
    Ok(format!("Webhook created successfully.\n{}", created.raw))
}

async fn delete(options: &DeleteOptions, client: &PaymentWebhookClient, as_json: bool) -> Result<String> {
    client.delete_webhook(&options.webhook_id).await?;

    if as_json {
        return Ok(render_json(json!({
            "id": options.webhook_id,
            "deleted": true,
        })));
    }
    Ok(format!(
        "Webhook with ID {} deleted successfully.",
        options.webhook_id
    ))
}

async fn event_types(
    options: &EventTypesOptions,
    client: &PaymentWebhookClient,
    as_json: bool,
) -> Result<String> {
    let event_types = client.fetch_event_types().await?;

    if as_json {
        let items = if options.describe {
            to_json(&event_types)
        } else {
            to_json(&names(&event_types))
        };
        return Ok(render_json(json!({ "event_types": items })));
    }

    let lines: Vec<String> = if options.describe {
        event_types.iter().map(ToString::to_string).collect()
    } else {
        names(&event_types)
    };
    Ok(lines.join("\n"))
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Explicit names first, then the rest of `available`, without duplicates.
fn merge_event_types(explicit: &[String], available: Vec<String>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(explicit.len() + available.len());
    for name in explicit.iter().cloned().chain(available) {
        if !merged.contains(&name) {
            merged.push(name);
        }
    }
    merged
}

fn names(event_types: &[EventType]) -> Vec<String> {
    event_types.iter().map(|e| e.name.clone()).collect()
}

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn render_json(value: Value) -> String {
    format!("{value:#}")
}
