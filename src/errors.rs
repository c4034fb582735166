use thiserror::Error;

/// Error type that captures common questionnaire and storage failures.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid session id: {0}")]
    InvalidSession(String),
}
