//! Message sources feeding the subscriber loop.
//!
//! A [`MessageSource`] yields raw payloads from some pub/sub transport. The
//! Redis source subscribes to a channel and reconnects on its own; the
//! channel source is fed in-process.

use crate::config::RetryConfig;
use fuelbridge_core::TransportError;
use futures_util::StreamExt;
use redis::aio::PubSub;
use redis::Msg;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Async stream of raw telemetry payloads
pub trait MessageSource: Send {
    /// Wait for the next payload.
    ///
    /// `None` means the source is exhausted and will never yield again.
    fn next_message(
        &mut self,
    ) -> impl Future<Output = Option<Result<String, TransportError>>> + Send;
}

/// Capped exponential backoff between reconnect attempts
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(retry: &RetryConfig) -> Self {
        Self {
            initial: retry.initial_delay(),
            max: retry.max_delay(),
            current: retry.initial_delay(),
        }
    }

    /// Delay to wait now; doubles the following one up to the cap
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

/// Redis pub/sub subscription on a single channel
pub struct RedisSource {
    client: redis::Client,
    topic: String,
    pubsub: Option<PubSub>,
    backoff: Backoff,
    pending_delay: Option<Duration>,
}

impl RedisSource {
    /// Create a source for `topic`. No connection is made until the first
    /// [`MessageSource::next_message`] call.
    pub fn new(redis_url: &str, topic: &str, retry: &RetryConfig) -> Result<Self, TransportError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        Ok(Self {
            client,
            topic: topic.to_string(),
            pubsub: None,
            backoff: Backoff::new(retry),
            pending_delay: None,
        })
    }

    async fn connect(&self) -> Result<PubSub, TransportError> {
        let connection = self
            .client
            .get_async_connection()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        let mut pubsub = connection.into_pubsub();
        pubsub
            .subscribe(&self.topic)
            .await
            .map_err(|e| TransportError::Subscribe(e.to_string()))?;

        info!(topic = %self.topic, "Subscribed to fuel telemetry channel");
        Ok(pubsub)
    }

    /// Arm the next reconnect delay.
    ///
    /// Logged at debug only; the consumer reports the returned error.
    fn schedule_reconnect(&mut self, reason: &'static str) {
        let delay = self.backoff.next_delay();
        debug!(
            topic = %self.topic,
            retry_in_ms = delay.as_millis() as u64,
            "{}",
            reason
        );
        self.pending_delay = Some(delay);
    }

    /// The broker ended the message stream; drop it and reconnect later
    fn subscription_closed(&mut self) -> TransportError {
        self.pubsub = None;
        self.schedule_reconnect("Redis subscription closed, reconnecting");
        TransportError::Closed
    }
}

/// Extract the UTF-8 payload of a pub/sub message
pub fn decode_payload(msg: &Msg) -> Result<String, TransportError> {
    msg.get_payload::<String>()
        .map_err(|e| TransportError::Receive(e.to_string()))
}

impl MessageSource for RedisSource {
    async fn next_message(&mut self) -> Option<Result<String, TransportError>> {
        let mut pubsub = match self.pubsub.take() {
            Some(pubsub) => pubsub,
            None => {
                if let Some(delay) = self.pending_delay.take() {
                    tokio::time::sleep(delay).await;
                }
                match self.connect().await {
                    Ok(pubsub) => {
                        self.backoff.reset();
                        pubsub
                    }
                    Err(e) => {
                        self.schedule_reconnect("Redis connect failed, retrying");
                        return Some(Err(e));
                    }
                }
            }
        };

        let message = pubsub.on_message().next().await;
        match message {
            Some(msg) => {
                self.pubsub = Some(pubsub);
                Some(decode_payload(&msg))
            }
            None => Some(Err(self.subscription_closed())),
        }
    }
}

/// In-process source backed by a tokio mpsc channel.
///
/// Finishes once every sender has been dropped.
pub struct ChannelSource {
    rx: mpsc::Receiver<String>,
}

impl ChannelSource {
    pub fn new(rx: mpsc::Receiver<String>) -> Self {
        Self { rx }
    }

    /// Create a bounded channel and the source reading from it
    pub fn channel(capacity: usize) -> (mpsc::Sender<String>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self::new(rx))
    }
}

impl MessageSource for ChannelSource {
    async fn next_message(&mut self) -> Option<Result<String, TransportError>> {
        self.rx.recv().await.map(Ok)
    }
}
