//! Telemetry payload parsing.
//!
//! Payloads are flat UTF-8 strings of the form `<fuel_type>,<amount>` with no
//! escaping, e.g. `gasoline,15000`.

use crate::error::ParseError;
use crate::types::FuelStatus;
use std::str::FromStr;

/// Field separator used by the telemetry publisher
pub const FIELD_SEPARATOR: char = ',';

/// Parse a raw payload into a [`FuelStatus`].
///
/// The fuel type is kept verbatim, including an empty label. The amount
/// tolerates surrounding whitespace and a leading sign; negative values are
/// accepted here.
pub fn parse_fuel_message(payload: &str) -> Result<FuelStatus, ParseError> {
    let fields: Vec<&str> = payload.split(FIELD_SEPARATOR).collect();
    let [fuel_type, amount] = fields.as_slice() else {
        return Err(ParseError::FieldCount {
            found: fields.len(),
        });
    };

    let amount = amount
        .trim()
        .parse::<i64>()
        .map_err(|source| ParseError::InvalidAmount {
            value: (*amount).to_string(),
            source,
        })?;

    Ok(FuelStatus::new(*fuel_type, amount))
}

impl FromStr for FuelStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fuel_message(s)
    }
}
