use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("Expected {expected} samples, got {actual}")]
    SampleCount { expected: usize, actual: usize },

    #[error("Invalid sample at index {index}: {token:?}")]
    InvalidSample { index: usize, token: String },

    #[error("Invalid frame layout: {0}")]
    InvalidLayout(String),
}

pub type Result<T> = std::result::Result<T, FrameError>;
