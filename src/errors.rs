use thiserror::Error;

/// Failure taxonomy for credential acquisition.
///
/// Variants carry owned strings so one leader outcome can be cloned out to
/// every coalesced follower unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Missing or invalid identity parameters, detected once at construction.
    #[error("invalid credential configuration: {0}")]
    Configuration(String),

    /// Network failure, non-success status or malformed response from the
    /// identity endpoint.
    #[error("identity provider request failed: {0}")]
    IdentityProvider(String),

    /// The in-flight acquisition this caller was waiting on went away before
    /// publishing a result. Affects only callers waiting on that acquisition.
    #[error("token acquisition cancelled")]
    Cancelled,
}

impl AuthError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::IdentityProvider(msg.into())
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        Self::IdentityProvider(err.to_string())
    }
}
