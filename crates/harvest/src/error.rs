use thiserror::Error;

/// Terminal failures of Harvest API operations.
///
/// Retryable conditions (throttling, server errors, connection failures) are
/// handled inside the client; these variants are what callers see once the
/// request has definitively failed.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// No API key was available when the client was constructed.
    #[error("No Harvest API key configured")]
    MissingCredential,

    /// A required parameter was missing or malformed.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// The remote kept throttling the request until retries ran out.
    #[error("Harvest rate limit exceeded after {attempts} attempts: {message}")]
    RateLimited {
        /// How many attempts were made before giving up.
        attempts: u32,
        /// The last message returned by the remote.
        message: String,
    },

    /// The remote answered with a non-success status that is not retryable,
    /// or retries were exhausted on a server error.
    #[error("Harvest API error ({status}): {message}")]
    Api {
        /// The last observed HTTP status code.
        status: u16,
        /// The error message extracted from the response body.
        message: String,
    },

    /// The request never produced an HTTP response (connection failure or
    /// timeout) and retries were exhausted.
    #[error("Connection error: {0}")]
    Connection(String),
}

impl HarvestError {
    /// Whether the failure was caused by the remote rejecting the request
    /// contents, as opposed to infrastructure trouble.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::InvalidParameters(_) => true,
            Self::Api { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }
}
