use thiserror::Error;

/// Crate error type
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("event serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("sink write failed: {0}")]
    Io(#[from] std::io::Error),
}
