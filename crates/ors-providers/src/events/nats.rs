//! NATS JetStream Invalidation Source
//!
//! Durable pull consumer on a JetStream stream. One stream per upstream
//! (e.g. `products`) carries the subjects `{stream}.updated` and
//! `{stream}.deleted`; the change kind travels in the `event` header and
//! falls back to the last subject token.
//!
//! Messages are acknowledged explicitly. A reject terminates the message
//! (`AckKind::Term`), so the server never redelivers it.
//!
//! ## Example
//!
//! ```ignore
//! use ors_providers::events::{NatsInvalidationSource, NatsSourceConfig};
//!
//! let config = NatsSourceConfig::new("nats://localhost:4222", "products", "orders-products");
//! let source = NatsInvalidationSource::connect(&config).await?;
//! ```

use crate::constants::NATS_DEFAULT_URL;
use async_nats::jetstream::{self, AckKind, consumer::pull, stream};
use async_trait::async_trait;
use futures::StreamExt;
use ors_domain::constants::EVENT_HEADER;
use ors_domain::error::{Error, Result};
use ors_domain::ports::{Delivery, DeliveryAcker, InvalidationSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Connection settings for one JetStream invalidation stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatsSourceConfig {
    /// NATS server URL
    pub url: String,
    /// Stream name, also the subject prefix
    pub stream: String,
    /// Durable consumer name
    pub durable_name: String,
    /// Optional client name for server-side identification
    pub client_name: Option<String>,
}

impl NatsSourceConfig {
    /// Create settings for a stream and durable consumer
    pub fn new(url: &str, stream: &str, durable_name: &str) -> Self {
        Self {
            url: url.to_string(),
            stream: stream.to_string(),
            durable_name: durable_name.to_string(),
            client_name: None,
        }
    }

    /// Subjects captured by the stream
    pub fn subjects(&self) -> Vec<String> {
        vec![format!("{}.*", self.stream)]
    }
}

impl Default for NatsSourceConfig {
    fn default() -> Self {
        Self::new(NATS_DEFAULT_URL, "products", "orders-products")
    }
}

struct JetStreamAcker {
    message: jetstream::Message,
}

#[async_trait]
impl DeliveryAcker for JetStreamAcker {
    async fn ack(&self) -> Result<()> {
        self.message
            .ack()
            .await
            .map_err(|e| Error::invalidation(format!("Failed to ack NATS message: {e}")))
    }

    async fn reject(&self) -> Result<()> {
        self.message
            .ack_with(AckKind::Term)
            .await
            .map_err(|e| Error::invalidation(format!("Failed to terminate NATS message: {e}")))
    }
}

/// Invalidation source reading a JetStream durable consumer
pub struct NatsInvalidationSource {
    name: String,
    messages: pull::Stream,
}

impl NatsInvalidationSource {
    /// Connect, create the stream and consumer if missing, and start pulling
    pub async fn connect(config: &NatsSourceConfig) -> Result<Self> {
        info!("Connecting to NATS server at {}", config.url);

        let mut options = async_nats::ConnectOptions::new();
        if let Some(name) = &config.client_name {
            options = options.name(name);
        }
        let client = options.connect(config.url.as_str()).await.map_err(|e| {
            Error::infrastructure_with_source(
                format!("Failed to connect to NATS server at {}", config.url),
                e,
            )
        })?;

        let context = jetstream::new(client);
        let stream = context
            .get_or_create_stream(stream::Config {
                name: config.stream.clone(),
                subjects: config.subjects(),
                ..Default::default()
            })
            .await
            .map_err(|e| {
                Error::infrastructure_with_source(
                    format!("Failed to open JetStream stream '{}'", config.stream),
                    e,
                )
            })?;

        let consumer = stream
            .get_or_create_consumer(
                &config.durable_name,
                pull::Config {
                    durable_name: Some(config.durable_name.clone()),
                    ack_policy: jetstream::consumer::AckPolicy::Explicit,
                    ..Default::default()
                },
            )
            .await
            .map_err(|e| {
                Error::infrastructure_with_source(
                    format!("Failed to open JetStream consumer '{}'", config.durable_name),
                    e,
                )
            })?;

        let messages = consumer.messages().await.map_err(|e| {
            Error::infrastructure_with_source(
                format!("Failed to pull from JetStream stream '{}'", config.stream),
                e,
            )
        })?;

        info!(
            stream = %config.stream,
            consumer = %config.durable_name,
            "Consuming invalidation events from NATS"
        );

        Ok(Self {
            name: config.stream.clone(),
            messages,
        })
    }
}

/// Change kind from the `event` header, else from the subject suffix
fn event_name(message: &jetstream::Message) -> Option<String> {
    message
        .headers
        .as_ref()
        .and_then(|headers| headers.get(EVENT_HEADER))
        .map(|value| value.as_str().to_string())
        .or_else(|| {
            message
                .subject
                .as_str()
                .rsplit_once('.')
                .map(|(_, suffix)| suffix.to_string())
        })
}

#[async_trait]
impl InvalidationSource for NatsInvalidationSource {
    async fn next_delivery(&mut self) -> Option<Result<Delivery>> {
        let message = match self.messages.next().await? {
            Ok(message) => message,
            Err(e) => {
                return Some(Err(Error::invalidation(format!(
                    "Failed to receive from NATS stream '{}': {e}",
                    self.name
                ))));
            }
        };

        let event = event_name(&message);
        debug!(source = %self.name, subject = %message.subject, ?event, "Received invalidation message");

        Some(Ok(Delivery::new(
            message.payload.to_vec(),
            event,
            Box::new(JetStreamAcker { message }),
        )))
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for NatsInvalidationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NatsInvalidationSource")
            .field("stream", &self.name)
            .finish_non_exhaustive()
    }
}
