//! Retry orchestration for interactive research strategies
//!
//! Court sites fail transiently: navigations time out, results containers
//! never render, challenges stall. One research call gets a small fixed
//! attempt budget; between attempts the session is parked on `about:blank`
//! so the next attempt starts from clean navigation state.

use brlaw_browser::{LoadState, Page};
use futures::future::BoxFuture;
use tracing::{debug, info, warn};

use crate::error::{ResearchError, Result};
use crate::models::LegalPrecedent;

const RESET_URL: &str = "about:blank";

/// Bounded retry budget for one research call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
}

impl RetryPolicy {
    /// Create a policy; budgets below one attempt are clamped to one.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(2)
    }
}

/// Attempt bookkeeping for one orchestrated call. Created on the first
/// recoverable failure, discarded when the call returns, so concurrent
/// research calls cannot interfere.
struct RetryContext {
    attempt: u32,
    max_attempts: u32,
    last_error: ResearchError,
}

impl RetryContext {
    fn new(policy: &RetryPolicy, first_error: ResearchError) -> Self {
        Self {
            attempt: 1,
            max_attempts: policy.max_attempts(),
            last_error: first_error,
        }
    }

    fn has_budget(&self) -> bool {
        self.attempt < self.max_attempts
    }

    fn begin_attempt(&mut self) -> u32 {
        self.attempt += 1;
        self.attempt
    }

    fn record(&mut self, error: ResearchError) {
        self.last_error = error;
    }

    fn into_failure(self) -> ResearchError {
        ResearchError::RetriesExhausted {
            attempts: self.attempt,
            source: Box::new(self.last_error),
        }
    }
}

/// Run a single-attempt research routine under a retry policy.
///
/// Retry-eligible failures are recorded and retried after a best-effort
/// session reset; everything else propagates immediately. Exhausting the
/// budget yields one aggregated error carrying the last underlying cause.
pub async fn research_with_retry<'a, F>(
    court: &str,
    policy: &RetryPolicy,
    page: &'a dyn Page,
    mut attempt: F,
) -> Result<Vec<LegalPrecedent>>
where
    F: FnMut(&'a dyn Page) -> BoxFuture<'a, Result<Vec<LegalPrecedent>>>,
{
    let mut context = match attempt(page).await {
        Ok(found) => return Ok(found),
        Err(error) if error.is_retryable() => {
            warn!(
                "{} research attempt 1/{} failed: {}",
                court,
                policy.max_attempts(),
                error
            );
            RetryContext::new(policy, error)
        }
        Err(error) => return Err(error),
    };

    while context.has_budget() {
        reset_session(court, page).await;
        let attempt_number = context.begin_attempt();

        match attempt(page).await {
            Ok(found) => return Ok(found),
            Err(error) if error.is_retryable() => {
                warn!(
                    "{} research attempt {}/{} failed: {}",
                    court, attempt_number, context.max_attempts, error
                );
                context.record(error);
            }
            Err(error) => return Err(error),
        }
    }

    Err(context.into_failure())
}

/// Park the session on a blank page so the next attempt starts clean. A
/// failed reset never masks the research error.
async fn reset_session(court: &str, page: &dyn Page) {
    info!("Resetting {} session before retry", court);
    if let Err(error) = page.goto(RESET_URL, LoadState::DomContentLoaded).await {
        debug!("Ignoring session reset failure: {}", error);
    }
}
