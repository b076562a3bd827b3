//! Error types for the vitrine service

/// Errors that can occur in the vitrine service
#[derive(Debug, thiserror::Error)]
pub enum VitrineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for vitrine operations
pub type Result<T> = std::result::Result<T, VitrineError>;
