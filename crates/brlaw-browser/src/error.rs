//! Error types for brlaw-browser

use thiserror::Error;

/// brlaw-browser error type
#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Interaction failed: {0}")]
    Interaction(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Script evaluation failed: {0}")]
    Script(String),

    #[error("Frame error: {0}")]
    Frame(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Session closed: {0}")]
    SessionClosed(String),
}

impl BrowserError {
    /// Whether this error is a bounded-wait expiry rather than a hard failure.
    pub fn is_timeout(&self) -> bool {
        matches!(self, BrowserError::Timeout(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, BrowserError>;
