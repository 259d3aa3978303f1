use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::config::ProducerConfig;
use crate::error::{ProducerError, ProducerResult};
use crate::retry::{FixedInterval, RetryPolicy};
use crate::synth::SignalSynth;

/// Link state towards the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Streams synthetic frames to the relay, reconnecting on failure.
///
/// Delivery is fire-and-forget: nothing is read back, and a frame lost to a
/// broken connection is simply superseded by the next one.
pub struct Producer<P = FixedInterval> {
    address: String,
    synth: SignalSynth,
    policy: P,
    loop_interval: Duration,
    stream: Option<TcpStream>,
    state: ConnectionState,
    line: String,
    frames_sent: u64,
}

impl Producer<FixedInterval> {
    /// Producer with the fixed reconnect interval from `config`
    pub fn new(config: &ProducerConfig) -> Self {
        Self::with_parts(
            config,
            SignalSynth::from_config(config),
            FixedInterval::new(config.reconnect_interval),
        )
    }
}

impl<P: RetryPolicy> Producer<P> {
    pub fn with_parts(config: &ProducerConfig, synth: SignalSynth, policy: P) -> Self {
        let line = String::with_capacity(synth.layout().max_line_len(synth.amplitude_bound()));
        Self {
            address: config.relay_address(),
            synth,
            policy,
            loop_interval: config.loop_interval,
            stream: None,
            state: ConnectionState::Disconnected,
            line,
            frames_sent: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Frames fully handed to the socket
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    pub fn synth(&self) -> &SignalSynth {
        &self.synth
    }

    /// Run forever; returns only if the retry policy gives up.
    pub async fn run(&mut self) -> ProducerResult<()> {
        loop {
            self.tick().await?;
            tokio::time::sleep(self.loop_interval).await;
        }
    }

    /// One loop iteration without the trailing pause: connect if needed,
    /// send the current frame, advance time.
    pub async fn tick(&mut self) -> ProducerResult<()> {
        if self.stream.is_none() {
            let stream = self.connect().await?;
            self.stream = Some(stream);
        }

        let frame = self.synth.frame();
        frame.encode_into(&mut self.line);

        if let Some(stream) = self.stream.as_mut() {
            match stream.write_all(self.line.as_bytes()).await {
                Ok(()) => {
                    self.frames_sent += 1;
                    debug!(bytes = self.line.len(), "Frame sent");
                }
                Err(e) => {
                    warn!(error = %e, "Relay disconnected, reconnecting");
                    self.stream = None;
                    self.state = ConnectionState::Disconnected;
                }
            }
        }

        self.synth.advance();
        Ok(())
    }

    async fn connect(&mut self) -> ProducerResult<TcpStream> {
        let mut attempt = 0u32;
        loop {
            self.state = ConnectionState::Connecting;
            info!(address = %self.address, "Connecting to relay");

            match TcpStream::connect(&self.address).await {
                Ok(stream) => {
                    disable_nagle(&stream);
                    self.state = ConnectionState::Connected;
                    info!(address = %self.address, "Connected to relay");
                    return Ok(stream);
                }
                Err(e) => {
                    self.state = ConnectionState::Disconnected;
                    attempt += 1;
                    let Some(delay) = self.policy.next_delay(attempt) else {
                        warn!(error = %e, attempt, "Connection failed, giving up");
                        return Err(ProducerError::RetriesExhausted { attempts: attempt });
                    };
                    warn!(
                        error = %e,
                        attempt,
                        retry_in_ms = delay.as_millis() as u64,
                        "Connection failed"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// Best effort: frames are written whole, so a stream left with Nagle's
/// algorithm on still works.
fn disable_nagle(stream: &TcpStream) {
    if let Err(e) = stream.set_nodelay(true) {
        warn!(error = %e, "Could not set TCP_NODELAY on relay connection");
    }
}
