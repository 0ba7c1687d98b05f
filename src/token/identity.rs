use std::fmt;

use crate::errors::AuthError;

/// Cache key for a credential: tenant + resource + credential (client) id.
///
/// Two authenticators carrying equal identities are interchangeable for
/// caching purposes; the cache is keyed by this tuple, not by object
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CredentialIdentity {
    pub tenant_id: String,
    pub resource: String,
    pub client_id: String,
}

impl CredentialIdentity {
    pub fn new(
        tenant_id: impl Into<String>,
        resource: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            resource: resource.into(),
            client_id: client_id.into(),
        }
    }

    /// Builds the identity after checking every required parameter is
    /// non-empty. Backend constructors fail fast through this, once, instead
    /// of on every call.
    pub fn validated(
        tenant_id: &str,
        resource: &str,
        client_id: &str,
    ) -> Result<Self, AuthError> {
        if tenant_id.trim().is_empty() {
            return Err(AuthError::configuration("tenant_id must not be empty"));
        }
        if resource.trim().is_empty() {
            return Err(AuthError::configuration("resource must not be empty"));
        }
        if client_id.trim().is_empty() {
            return Err(AuthError::configuration("client_id must not be empty"));
        }
        Ok(Self::new(tenant_id, resource, client_id))
    }
}

impl fmt::Display for CredentialIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} -> {}",
            self.tenant_id, self.client_id, self.resource
        )
    }
}
