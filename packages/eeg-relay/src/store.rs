use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

/// Body served before any frame has arrived
pub const PLACEHOLDER: &str = "No data received yet.";

/// Contents of the store at one instant
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    /// No frame has been received since startup
    Empty,
    /// The most recent complete frame line, newline included
    Frame(Bytes),
}

impl Snapshot {
    /// Bytes served to readers: the frame line, or [`PLACEHOLDER`]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Snapshot::Empty => PLACEHOLDER.as_bytes(),
            Snapshot::Frame(line) => line.as_ref(),
        }
    }

    /// Response body sharing the stored buffer
    pub fn into_body(self) -> Bytes {
        match self {
            Snapshot::Empty => Bytes::from_static(PLACEHOLDER.as_bytes()),
            Snapshot::Frame(line) => line,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Snapshot::Empty)
    }
}

/// Bookkeeping about writes, for the health endpoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotStats {
    pub frames_received: u64,
    pub last_frame_at: Option<DateTime<Utc>>,
}

struct Slot {
    snapshot: Snapshot,
    frames_received: u64,
    last_frame_at: Option<DateTime<Utc>>,
}

/// Single-slot cache of the latest frame.
///
/// Writers replace the whole line under the write lock; readers take a
/// reference-counted handle to it under the read lock, so a reader only
/// ever sees the placeholder or one complete line.
#[derive(Clone)]
pub struct SnapshotStore {
    slot: Arc<RwLock<Slot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(RwLock::new(Slot {
                snapshot: Snapshot::Empty,
                frames_received: 0,
                last_frame_at: None,
            })),
        }
    }

    /// Replace the stored frame with `line`
    pub fn write(&self, line: impl Into<Bytes>) {
        let line = line.into();
        let now = Utc::now();
        let previous = {
            let mut slot = self.slot.write();
            slot.frames_received += 1;
            slot.last_frame_at = Some(now);
            std::mem::replace(&mut slot.snapshot, Snapshot::Frame(line))
        };
        // Free the old line outside the lock.
        drop(previous);
    }

    /// Current snapshot
    pub fn read(&self) -> Snapshot {
        self.slot.read().snapshot.clone()
    }

    pub fn stats(&self) -> SnapshotStats {
        let slot = self.slot.read();
        SnapshotStats {
            frames_received: slot.frames_received,
            last_frame_at: slot.last_frame_at,
        }
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
