//! Single-slot state store shared by the telemetry listener and the query API.
//!
//! The store owns exactly one [`FuelStatus`]. Writers replace it wholesale and
//! readers get a cloned snapshot, so a reader can never observe fields from
//! two different messages. The lock is held only for the clone or the swap
//! and never across an await point.

use crate::types::FuelStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Ingestion counters kept alongside the current value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Number of successful replacements
    pub updates_applied: u64,
    /// Number of payloads rejected by the parser
    pub parse_errors: u64,
    /// Time of the last replacement; `None` while the default seed is held
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct Slot {
    current: FuelStatus,
    stats: StoreStats,
}

/// Guarded cell holding the latest fuel status.
///
/// Cloning the store yields another handle to the same cell.
#[derive(Debug, Clone)]
pub struct StateStore {
    inner: Arc<RwLock<Slot>>,
}

impl StateStore {
    /// Create a store seeded with [`FuelStatus::default`]
    pub fn new() -> Self {
        Self::with_initial(FuelStatus::default())
    }

    /// Create a store seeded with a specific value
    pub fn with_initial(initial: FuelStatus) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Slot {
                current: initial,
                stats: StoreStats::default(),
            })),
        }
    }

    /// Snapshot of the current value
    pub fn read(&self) -> FuelStatus {
        self.read_slot().current.clone()
    }

    /// Replace the current value as a whole
    pub fn replace(&self, value: FuelStatus) {
        let mut slot = self.write_slot();
        slot.current = value;
        slot.stats.updates_applied += 1;
        slot.stats.last_updated = Some(Utc::now());
    }

    /// Count a payload that was rejected without touching the value
    pub fn record_rejection(&self) {
        self.write_slot().stats.parse_errors += 1;
    }

    /// Snapshot of the ingestion counters
    pub fn stats(&self) -> StoreStats {
        self.read_slot().stats.clone()
    }

    // Every critical section is a plain assignment or clone, so a poisoned
    // lock still guards a whole value.
    fn read_slot(&self) -> RwLockReadGuard<'_, Slot> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_slot(&self) -> RwLockWriteGuard<'_, Slot> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}
