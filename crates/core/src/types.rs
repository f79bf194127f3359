//! Fuel status record shared between the telemetry listener and the query API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fuel grade label installed before any telemetry arrives.
pub const DEFAULT_FUEL_TYPE: &str = "diesel";

/// Quantity installed before any telemetry arrives.
pub const DEFAULT_AMOUNT: i64 = 10_000;

/// Most recent fuel reading reported on the telemetry topic.
///
/// Serialized as `{"fuel_type": "...", "amount": N}` for query clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FuelStatus {
    /// Fuel grade label, taken verbatim from the message
    pub fuel_type: String,
    /// Dispensed quantity. Sign is not validated.
    pub amount: i64,
}

impl FuelStatus {
    /// Create a new fuel status record
    pub fn new(fuel_type: impl Into<String>, amount: i64) -> Self {
        Self {
            fuel_type: fuel_type.into(),
            amount,
        }
    }
}

impl Default for FuelStatus {
    fn default() -> Self {
        Self::new(DEFAULT_FUEL_TYPE, DEFAULT_AMOUNT)
    }
}

impl fmt::Display for FuelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.fuel_type, self.amount)
    }
}
