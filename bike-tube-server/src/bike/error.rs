//! Bike provider error types.

/// How a failed provider call is classified by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    NoRoute,
    Transport,
}

/// Errors from a bike-routing provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (connection error, body read, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The call did not finish within its time limit
    #[error("provider call timed out")]
    Timeout,

    /// The provider answered but found no cycling route
    #[error("no cycling route between the points")]
    NoRoute,

    /// Provider returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be understood
    #[error("JSON parse error: {0}")]
    Json(String),

    /// Rate limited by the provider
    #[error("rate limited by bike provider")]
    RateLimited,

    /// Credentials rejected
    #[error("unauthorized (invalid API key)")]
    Unauthorized,

    /// Provider is missing required configuration
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl ProviderError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ProviderError::Timeout => FailureKind::Timeout,
            ProviderError::NoRoute => FailureKind::NoRoute,
            ProviderError::Http(e) if e.is_timeout() => FailureKind::Timeout,
            _ => FailureKind::Transport,
        }
    }

    /// Failures that will repeat for every call in the request.
    pub fn is_systemic(&self) -> bool {
        matches!(
            self,
            ProviderError::Unauthorized | ProviderError::NotConfigured(_)
        )
    }
}
