use crate::config::ConfigError;

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

/// Errors that can stop the relay
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
