use reqwest::Client;
use tracing::debug;

use crate::authenticators::{build_http_client, response::parse_token_response};
use crate::errors::AuthError;
use crate::token::{CredentialIdentity, TokenResult};
use crate::utils::constants::{BACKEND_MANAGED_IDENTITY, IMDS_API_VERSION, IMDS_TOKEN_ENDPOINT};

/// Acquires tokens from an instance metadata (IMDS style) identity endpoint
/// on behalf of a user-assigned managed identity.
#[derive(Debug, Clone)]
pub struct ManagedIdentityAuthenticator {
    identity: CredentialIdentity,
    endpoint: String,
    client: Client,
}

impl ManagedIdentityAuthenticator {
    pub fn new(tenant_id: &str, client_id: &str, resource: &str) -> Result<Self, AuthError> {
        Self::with_endpoint(tenant_id, client_id, resource, IMDS_TOKEN_ENDPOINT)
    }

    /// Endpoint override for non-standard metadata hosts.
    pub fn with_endpoint(
        tenant_id: &str,
        client_id: &str,
        resource: &str,
        endpoint: &str,
    ) -> Result<Self, AuthError> {
        let identity = CredentialIdentity::validated(tenant_id, resource, client_id)?;
        if endpoint.trim().is_empty() {
            return Err(AuthError::configuration("endpoint must not be empty"));
        }
        Ok(Self {
            identity,
            endpoint: endpoint.to_owned(),
            client: build_http_client()?,
        })
    }

    pub fn identity(&self) -> &CredentialIdentity {
        &self.identity
    }

    // force_refresh is accepted for contract parity: every call here already
    // contacts the metadata endpoint directly, nothing provider-side to bypass.
    pub async fn fetch_token(&self, _force_refresh: bool) -> Result<TokenResult, AuthError> {
        debug!(identity = %self.identity, "requesting managed identity token");

        let response = self
            .client
            .get(&self.endpoint)
            .header("Metadata", "true")
            .query(&[
                ("api-version", IMDS_API_VERSION),
                ("resource", self.identity.resource.as_str()),
                ("client_id", self.identity.client_id.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::provider(format!(
                "managed identity request failed: {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        parse_token_response(BACKEND_MANAGED_IDENTITY, &body)
    }
}
