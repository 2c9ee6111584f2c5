//! Error types for brlaw-courts

use brlaw_browser::BrowserError;
use thiserror::Error;

/// brlaw-courts error type
///
/// Strategies raise on fatal conditions; the retry orchestrator catches the
/// retry-eligible kinds and, once its budget is spent, surfaces a single
/// [`ResearchError::RetriesExhausted`] carrying the last underlying cause.
#[derive(Error, Debug)]
pub enum ResearchError {
    #[error("Could not bypass the interactive challenge")]
    ChallengeUnresolved,

    #[error("Zero results without a not-found confirmation")]
    UnexpectedEmptyState,

    #[error("Browser operation failed: {0}")]
    Browser(#[from] BrowserError),

    #[error("Research failed after {attempts} attempt(s): {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<ResearchError>,
    },
}

impl ResearchError {
    /// Whether one more research attempt could plausibly succeed.
    ///
    /// Navigation and locator timeouts, unexpected empty result pages and
    /// unresolved challenges are all transient against these sites; an
    /// already-aggregated failure is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            ResearchError::ChallengeUnresolved => true,
            ResearchError::UnexpectedEmptyState => true,
            ResearchError::Browser(_) => true,
            ResearchError::RetriesExhausted { .. } => false,
        }
    }
}

/// Result type alias for brlaw-courts
pub type Result<T> = std::result::Result<T, ResearchError>;
