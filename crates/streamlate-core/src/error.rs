use thiserror::Error;

/// Top-level error type for Streamlate.
#[derive(Debug, Error)]
pub enum StreamlateError {
    /// Error from the completion backend.
    #[error("provider error: {0}")]
    Provider(String),

    /// Error from a chat channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error. Missing or unparseable runtime configuration
    /// is fatal for the invocation that hit it.
    #[error("config error: {0}")]
    Config(String),

    /// Storage error.
    #[error("store error: {0}")]
    Store(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
