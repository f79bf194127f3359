//! Core types for the fuel telemetry bridge.
//!
//! This crate holds everything that does not touch the network: the
//! [`FuelStatus`] record, the payload parser, the shared [`StateStore`],
//! the error taxonomy and logging setup.

pub mod error;
pub mod logging;
pub mod parser;
pub mod store;
pub mod types;

pub use error::{ParseError, TransportError};
pub use logging::LogFormat;
pub use parser::parse_fuel_message;
pub use store::{StateStore, StoreStats};
pub use types::{FuelStatus, DEFAULT_AMOUNT, DEFAULT_FUEL_TYPE};
