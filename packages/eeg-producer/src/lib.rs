pub mod config;
pub mod error;
pub mod producer;
pub mod retry;
pub mod synth;

pub use config::{ConfigError, ProducerConfig};
pub use error::{ProducerError, ProducerResult};
pub use producer::{ConnectionState, Producer};
pub use retry::{ExponentialBackoff, FixedInterval, RetryPolicy};
pub use synth::SignalSynth;
