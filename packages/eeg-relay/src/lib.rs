pub mod config;
pub mod error;
pub mod handlers;
pub mod ingest;
pub mod router;
pub mod state;
pub mod store;

pub use config::{ConfigError, RelayConfig};
pub use error::{RelayError, RelayResult};
pub use ingest::{ingest_stream, IngestListener, IngestSummary, ProducerGuard, ProducerSlot};
pub use router::create_router;
pub use state::RelayState;
pub use store::{Snapshot, SnapshotStats, SnapshotStore, PLACEHOLDER};
