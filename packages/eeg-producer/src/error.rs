use crate::config::ConfigError;

/// Result type for producer operations
pub type ProducerResult<T> = Result<T, ProducerError>;

/// Errors that stop the producer
#[derive(Debug, thiserror::Error)]
pub enum ProducerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gave up connecting after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}
