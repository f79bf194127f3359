//! Telemetry listener.
//!
//! Pulls raw payloads from a [`MessageSource`], parses them and replaces the
//! shared fuel status on success. Malformed payloads and transport hiccups
//! are logged and skipped; neither stops the loop.

use crate::source::MessageSource;
use fuelbridge_core::{parse_fuel_message, FuelStatus, ParseError, StateStore};
use tracing::{debug, info, warn};

pub struct SubscriberLoop {
    store: StateStore,
}

impl SubscriberLoop {
    pub fn new(store: StateStore) -> Self {
        Self { store }
    }

    /// Parse one payload and apply it to the store.
    ///
    /// On error the store keeps its previous value and the rejection is
    /// counted.
    pub fn handle_payload(&self, payload: &str) -> Result<FuelStatus, ParseError> {
        match parse_fuel_message(payload) {
            Ok(status) => {
                self.store.replace(status.clone());
                info!(
                    fuel_type = %status.fuel_type,
                    amount = status.amount,
                    "Fuel status updated"
                );
                Ok(status)
            }
            Err(e) => {
                self.store.record_rejection();
                warn!(payload = %payload, error = %e, "Discarding malformed fuel message");
                Err(e)
            }
        }
    }

    /// Consume `source` until it is exhausted
    pub async fn run<S: MessageSource>(self, mut source: S) {
        info!("Subscriber loop started");

        while let Some(next) = source.next_message().await {
            match next {
                Ok(payload) => {
                    debug!(payload = %payload, "Received fuel message");
                    let _ = self.handle_payload(&payload);
                }
                Err(e) => warn!(error = %e, "Transport error while waiting for fuel messages"),
            }
        }

        info!("Message source closed, subscriber loop stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ChannelSource;
    use crate::test_utils::LogCapture;
    use fuelbridge_core::TransportError;
    use std::collections::VecDeque;
    use tracing::Level;

    /// Replays a fixed script of transport results
    struct ScriptedSource(VecDeque<Result<String, TransportError>>);

    impl MessageSource for ScriptedSource {
        async fn next_message(&mut self) -> Option<Result<String, TransportError>> {
            self.0.pop_front()
        }
    }

    #[test]
    fn test_valid_payload_replaces_value() {
        let store = StateStore::new();
        let subscriber = SubscriberLoop::new(store.clone());

        let applied = subscriber.handle_payload("gasoline,15000").unwrap();

        assert_eq!(applied, FuelStatus::new("gasoline", 15000));
        assert_eq!(store.read(), applied);
    }

    #[test]
    fn test_malformed_payloads_keep_last_good_value() {
        let store = StateStore::new();
        let subscriber = SubscriberLoop::new(store.clone());
        subscriber.handle_payload("diesel,5000").unwrap();

        assert!(matches!(
            subscriber.handle_payload("gasoline-15000"),
            Err(ParseError::FieldCount { found: 1 })
        ));
        assert!(matches!(
            subscriber.handle_payload("gasoline,abc"),
            Err(ParseError::InvalidAmount { .. })
        ));

        assert_eq!(store.read(), FuelStatus::new("diesel", 5000));
        let stats = store.stats();
        assert_eq!(stats.updates_applied, 1);
        assert_eq!(stats.parse_errors, 2);
    }

    #[test]
    fn test_malformed_payloads_are_logged_with_payload_and_reason() {
        let capture = LogCapture::new();
        let store = StateStore::new();
        let subscriber = SubscriberLoop::new(store.clone());

        let (shape_err, amount_err) = tracing::subscriber::with_default(capture.subscriber(), || {
            (
                subscriber.handle_payload("gasoline-15000").unwrap_err(),
                subscriber.handle_payload("gasoline,abc").unwrap_err(),
            )
        });

        let warnings = capture.at_level(Level::WARN);
        assert_eq!(warnings.len(), 2);

        assert_eq!(warnings[0].field("payload"), Some("gasoline-15000"));
        assert_eq!(warnings[0].field("error"), Some(shape_err.to_string().as_str()));
        assert_eq!(warnings[1].field("payload"), Some("gasoline,abc"));
        assert_eq!(warnings[1].field("error"), Some(amount_err.to_string().as_str()));
        assert!(amount_err.to_string().contains("\"abc\""));

        assert_eq!(store.read(), FuelStatus::default());
    }

    #[test]
    fn test_valid_payload_is_logged_at_info() {
        let capture = LogCapture::new();
        let subscriber = SubscriberLoop::new(StateStore::new());

        tracing::subscriber::with_default(capture.subscriber(), || {
            subscriber.handle_payload("gasoline,15000").unwrap();
        });

        assert!(capture.at_level(Level::WARN).is_empty());
        let updates = capture.at_level(Level::INFO);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].field("fuel_type"), Some("gasoline"));
        assert_eq!(updates[0].field("amount"), Some("15000"));
    }

    #[tokio::test]
    async fn test_run_survives_bad_messages_and_transport_errors() {
        let store = StateStore::new();
        let source = ScriptedSource(VecDeque::from(vec![
            Ok("diesel,5000".to_string()),
            Err(TransportError::Closed),
            Ok("garbage".to_string()),
            Err(TransportError::Receive("invalid utf-8".into())),
            Ok("gasoline,20000".to_string()),
        ]));

        SubscriberLoop::new(store.clone()).run(source).await;

        assert_eq!(store.read(), FuelStatus::new("gasoline", 20000));
        assert_eq!(store.stats().parse_errors, 1);
        assert_eq!(store.stats().updates_applied, 2);
    }

    #[tokio::test]
    async fn test_run_applies_in_arrival_order() {
        let store = StateStore::new();
        let (tx, source) = ChannelSource::channel(16);
        let task = tokio::spawn(SubscriberLoop::new(store.clone()).run(source));

        for payload in ["diesel,5000", "gasoline,20000"] {
            tx.send(payload.to_string()).await.unwrap();
        }
        drop(tx);
        task.await.unwrap();

        assert_eq!(store.read(), FuelStatus::new("gasoline", 20000));
    }
}
