use chrono::{DateTime, Utc};

/// Bearer token plus the absolute UTC instant after which it is unusable.
///
/// Created exclusively by a successful backend acquisition, immutable
/// afterwards. A newer acquisition supersedes it in the cache, never
/// mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenResult {
    /// Opaque bearer token, never inspected by this crate.
    pub access_token: String,
    pub expires_on: DateTime<Utc>,
}

impl TokenResult {
    pub fn new(access_token: String, expires_on: DateTime<Utc>) -> Self {
        Self {
            access_token,
            expires_on,
        }
    }
}
