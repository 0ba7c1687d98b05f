use std::path::PathBuf;

use reqwest::Client;
use tokio::fs;
use tracing::debug;

use crate::authenticators::{build_http_client, response::parse_token_response, token_url};
use crate::errors::AuthError;
use crate::token::{CredentialIdentity, TokenResult};
use crate::utils::constants::{
    BACKEND_FEDERATED, CLIENT_ASSERTION_TYPE_JWT_BEARER, DEFAULT_AUTHORITY,
    GRANT_CLIENT_CREDENTIALS,
};

/// Workload-identity style backend: exchanges an externally issued assertion
/// (a projected token file, re-read on every acquisition since the platform
/// rotates it) for an access token.
#[derive(Debug, Clone)]
pub struct FederatedCredentialAuthenticator {
    identity: CredentialIdentity,
    authority: String,
    assertion_path: PathBuf,
    client: Client,
}

impl FederatedCredentialAuthenticator {
    pub fn new(
        tenant_id: &str,
        client_id: &str,
        resource: &str,
        assertion_path: &str,
    ) -> Result<Self, AuthError> {
        Self::with_authority(tenant_id, client_id, resource, assertion_path, DEFAULT_AUTHORITY)
    }

    pub fn with_authority(
        tenant_id: &str,
        client_id: &str,
        resource: &str,
        assertion_path: &str,
        authority: &str,
    ) -> Result<Self, AuthError> {
        let identity = CredentialIdentity::validated(tenant_id, resource, client_id)?;
        if assertion_path.trim().is_empty() {
            return Err(AuthError::configuration("assertion_path must not be empty"));
        }
        if authority.trim().is_empty() {
            return Err(AuthError::configuration("authority must not be empty"));
        }
        Ok(Self {
            identity,
            authority: authority.to_owned(),
            assertion_path: PathBuf::from(assertion_path),
            client: build_http_client()?,
        })
    }

    pub fn identity(&self) -> &CredentialIdentity {
        &self.identity
    }

    pub async fn fetch_token(&self, _force_refresh: bool) -> Result<TokenResult, AuthError> {
        debug!(identity = %self.identity, "requesting federated credential token");

        let assertion = fs::read_to_string(&self.assertion_path)
            .await
            .map_err(|e| {
                AuthError::provider(format!(
                    "failed to read federated assertion '{}': {}",
                    self.assertion_path.display(),
                    e
                ))
            })?
            .trim()
            .to_owned();
        if assertion.is_empty() {
            return Err(AuthError::provider(format!(
                "federated assertion '{}' is empty",
                self.assertion_path.display()
            )));
        }

        let url = token_url(&self.authority, &self.identity.tenant_id);
        let scope = format!("{}/.default", self.identity.resource);
        let form = [
            ("grant_type", GRANT_CLIENT_CREDENTIALS),
            ("client_id", self.identity.client_id.as_str()),
            ("client_assertion_type", CLIENT_ASSERTION_TYPE_JWT_BEARER),
            ("client_assertion", assertion.as_str()),
            ("scope", scope.as_str()),
        ];

        let response = self.client.post(&url).form(&form).send().await?;
        if !response.status().is_success() {
            return Err(AuthError::provider(format!(
                "federated token request failed: {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        parse_token_response(BACKEND_FEDERATED, &body)
    }
}
