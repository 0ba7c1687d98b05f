use crate::authenticators::AuthenticatorKind;
use crate::cache::refresh_policy::RefreshPolicy;
use crate::cache::token_cache::TokenCache;
use crate::errors::AuthError;
use crate::token::{CredentialIdentity, TokenResult};

/// Caching wrapper around an identity backend.
///
/// Serializes concurrent refreshes so at most one network round trip happens
/// per expiry cycle; introduces no failure kinds of its own beyond
/// [`AuthError::Cancelled`] for orphaned waiters.
#[derive(Debug, Clone)]
pub struct CachingAuthenticator {
    backend: AuthenticatorKind,
    cache: TokenCache,
    policy: RefreshPolicy,
}

impl CachingAuthenticator {
    /// Wraps `backend` with a private cache.
    pub fn new(backend: AuthenticatorKind) -> Self {
        Self::with_cache(backend, TokenCache::new())
    }

    /// Wraps `backend` sharing `cache` with other wrappers; equal identities
    /// then share slots and coalesce with each other.
    pub fn with_cache(backend: AuthenticatorKind, cache: TokenCache) -> Self {
        Self {
            backend,
            cache,
            policy: RefreshPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RefreshPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn identity(&self) -> &CredentialIdentity {
        self.backend.identity()
    }

    /// Returns a usable token, from cache when the refresh policy allows it,
    /// otherwise from the wrapped backend (coalescing concurrent refreshes).
    pub async fn get_token(&self, force_refresh: bool) -> Result<TokenResult, AuthError> {
        self.cache
            .get_or_refresh(&self.backend, &self.policy, force_refresh)
            .await
    }
}
