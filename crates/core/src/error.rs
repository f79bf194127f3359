//! Core error types

use std::num::ParseIntError;
use thiserror::Error;

/// Rejection reasons for a raw telemetry payload
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Payload did not split into `<fuel_type>,<amount>`
    #[error("expected 2 comma-separated fields, found {found}")]
    FieldCount {
        /// Number of fields actually present
        found: usize,
    },

    /// Second field is not an integer
    #[error("amount {value:?} is not an integer: {source}")]
    InvalidAmount {
        /// The offending field as received
        value: String,
        /// Underlying integer parse failure
        #[source]
        source: ParseIntError,
    },
}

/// Failures surfaced by a pub/sub transport
#[derive(Debug, Error)]
pub enum TransportError {
    /// Could not reach the broker
    #[error("Connection error: {0}")]
    Connect(String),

    /// Broker refused the topic subscription
    #[error("Subscription error: {0}")]
    Subscribe(String),

    /// A message arrived but could not be read
    #[error("Receive error: {0}")]
    Receive(String),

    /// The broker closed the subscription
    #[error("Subscription closed by broker")]
    Closed,
}
