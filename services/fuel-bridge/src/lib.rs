//! Fuel telemetry bridge service.
//!
//! Listens for `<fuel_type>,<amount>` messages on a pub/sub topic and serves
//! the latest value over HTTP at `GET /fuel_update`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod source;
pub mod state;
pub mod subscriber;
pub mod supervisor;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{BridgeConfig, CliArgs, ConfigError, RetryConfig};
pub use error::BridgeError;
pub use source::{ChannelSource, MessageSource, RedisSource};
pub use state::AppState;
pub use subscriber::SubscriberLoop;
pub use supervisor::Supervisor;
