// Producer ingest
//
// Accepts producer connections on a raw TCP socket and publishes every
// complete newline-terminated line to the snapshot store. Only one producer
// is served at a time; extra connections are closed on arrival.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::net::TcpListener;
use tracing::{info, trace, warn};

use crate::error::{RelayError, RelayResult};
use crate::store::SnapshotStore;

/// Pause after a failed `accept` before trying again
const ACCEPT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Admission flag allowing a single active producer
#[derive(Clone, Default)]
pub struct ProducerSlot {
    active: Arc<AtomicBool>,
}

impl ProducerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot, or `None` if another producer holds it
    pub fn try_acquire(&self) -> Option<ProducerGuard> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProducerGuard {
                active: self.active.clone(),
            })
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// Releases the producer slot when dropped
pub struct ProducerGuard {
    active: Arc<AtomicBool>,
}

impl Drop for ProducerGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}

/// Outcome of one producer connection
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    /// Lines published to the store
    pub frames: u64,
    /// Lines dropped because they were not valid UTF-8
    pub skipped: u64,
    /// Lines dropped because they exceeded the maximum line length
    pub oversized: u64,
    /// Whether the stream ended in the middle of a line
    pub discarded_partial: bool,
}

/// Read newline-delimited frames from `reader` until end of stream.
///
/// Each complete line of at most `max_line_len` bytes, trailing `\n`
/// included, replaces the store contents. Longer lines are skipped without
/// buffering more than `max_line_len + 1` bytes. An unterminated tail at
/// end of stream is dropped. On a read error the partially read line is
/// dropped and the error returned; the store keeps its last complete frame
/// in every case.
pub async fn ingest_stream<R>(
    reader: R,
    store: &SnapshotStore,
    max_line_len: usize,
) -> std::io::Result<IngestSummary>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut summary = IngestSummary::default();
    let read_limit = max_line_len as u64 + 1;

    loop {
        let mut buf = Vec::new();
        if (&mut reader).take(read_limit).read_until(b'\n', &mut buf).await? == 0 {
            return Ok(summary);
        }

        if buf.len() > max_line_len {
            warn!(limit = max_line_len, "Dropping frame longer than the line limit");
            summary.oversized += 1;
            if buf.last() != Some(&b'\n') && !skip_line(&mut reader).await? {
                return Ok(summary);
            }
            continue;
        }

        if buf.last() != Some(&b'\n') {
            warn!(bytes = buf.len(), "Discarding incomplete frame at end of stream");
            summary.discarded_partial = true;
            return Ok(summary);
        }

        match String::from_utf8(buf) {
            Ok(line) => {
                trace!(bytes = line.len(), "Frame stored");
                store.write(line);
                summary.frames += 1;
            }
            Err(e) => {
                warn!(error = %e.utf8_error(), "Skipping frame that is not valid UTF-8");
                summary.skipped += 1;
            }
        }
    }
}

/// Consume input up to and including the next newline.
/// Returns `false` if the stream ended first.
async fn skip_line<R>(reader: &mut R) -> std::io::Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        let (consumed, found) = {
            let available = reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(false);
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(pos) => (pos + 1, true),
                None => (available.len(), false),
            }
        };
        reader.consume(consumed);
        if found {
            return Ok(true);
        }
    }
}

/// TCP listener feeding the snapshot store
pub struct IngestListener {
    listener: TcpListener,
    store: SnapshotStore,
    slot: ProducerSlot,
    max_line_len: usize,
}

impl IngestListener {
    /// Bind the ingest socket. Failure here is fatal for the relay.
    pub async fn bind(
        addr: &str,
        store: SnapshotStore,
        slot: ProducerSlot,
        max_line_len: usize,
    ) -> RelayResult<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| RelayError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        Ok(Self {
            listener,
            store,
            slot,
            max_line_len,
        })
    }

    pub fn local_addr(&self) -> RelayResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept producers forever
    pub async fn run(self) {
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "Ingest accept failed");
                    tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                    continue;
                }
            };

            let Some(guard) = self.slot.try_acquire() else {
                warn!(%peer, "Rejecting producer: another producer is already connected");
                drop(stream);
                continue;
            };

            info!(%peer, "Producer connected");
            let store = self.store.clone();
            let max_line_len = self.max_line_len;
            tokio::spawn(async move {
                let _guard = guard;
                match ingest_stream(stream, &store, max_line_len).await {
                    Ok(summary) => info!(
                        %peer,
                        frames = summary.frames,
                        skipped = summary.skipped,
                        oversized = summary.oversized,
                        "Producer disconnected"
                    ),
                    Err(e) => warn!(%peer, error = %e, "Producer connection failed"),
                }
            });
        }
    }
}
