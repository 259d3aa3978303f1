use std::time::Instant;

use crate::config::RelayConfig;
use crate::ingest::ProducerSlot;
use crate::store::SnapshotStore;

/// Relay state shared across HTTP handlers and the ingest listener
pub struct RelayState {
    pub config: RelayConfig,
    pub store: SnapshotStore,
    pub producer: ProducerSlot,
    pub start_time: Instant,
}

impl RelayState {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            config,
            store: SnapshotStore::new(),
            producer: ProducerSlot::new(),
            start_time: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
