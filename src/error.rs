use thiserror::Error;

/// Main error type for the pattern engine and its session controllers
#[derive(Error, Debug)]
pub enum CadenceError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),

    // Input errors
    #[error("Invalid symbol: {0:?} (expected A, B or T)")]
    InvalidSymbol(String),

    // Session errors
    #[error("Session not found: {0}")]
    SessionNotFound(uuid::Uuid),

    #[error("Session limit reached: {limit} active sessions")]
    SessionLimitReached { limit: usize },

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for CadenceError
pub type Result<T> = std::result::Result<T, CadenceError>;

impl CadenceError {
    /// Whether the error was caused by caller input rather than by the process
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CadenceError::InvalidSymbol(_) | CadenceError::SessionNotFound(_)
        )
    }
}
