use std::fmt;

use reqwest::Client;
use tracing::debug;

use crate::authenticators::{build_http_client, response::parse_token_response, token_url};
use crate::errors::AuthError;
use crate::token::{CredentialIdentity, TokenResult};
use crate::utils::constants::{BACKEND_CLIENT_SECRET, DEFAULT_AUTHORITY, GRANT_CLIENT_CREDENTIALS};

/// OAuth2 client-credentials backend: authenticates with a shared secret.
#[derive(Clone)]
pub struct ClientSecretAuthenticator {
    identity: CredentialIdentity,
    client_secret: String,
    authority: String,
    client: Client,
}

// Manual Debug: the secret must never land in logs.
impl fmt::Debug for ClientSecretAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSecretAuthenticator")
            .field("identity", &self.identity)
            .field("authority", &self.authority)
            .finish()
    }
}

impl ClientSecretAuthenticator {
    pub fn new(
        tenant_id: &str,
        client_id: &str,
        resource: &str,
        client_secret: &str,
    ) -> Result<Self, AuthError> {
        Self::with_authority(tenant_id, client_id, resource, client_secret, DEFAULT_AUTHORITY)
    }

    pub fn with_authority(
        tenant_id: &str,
        client_id: &str,
        resource: &str,
        client_secret: &str,
        authority: &str,
    ) -> Result<Self, AuthError> {
        let identity = CredentialIdentity::validated(tenant_id, resource, client_id)?;
        if client_secret.trim().is_empty() {
            return Err(AuthError::configuration("client_secret must not be empty"));
        }
        if authority.trim().is_empty() {
            return Err(AuthError::configuration("authority must not be empty"));
        }
        Ok(Self {
            identity,
            client_secret: client_secret.to_owned(),
            authority: authority.to_owned(),
            client: build_http_client()?,
        })
    }

    pub fn identity(&self) -> &CredentialIdentity {
        &self.identity
    }

    pub async fn fetch_token(&self, _force_refresh: bool) -> Result<TokenResult, AuthError> {
        debug!(identity = %self.identity, "requesting client secret token");

        let url = token_url(&self.authority, &self.identity.tenant_id);
        let scope = format!("{}/.default", self.identity.resource);
        let form = [
            ("grant_type", GRANT_CLIENT_CREDENTIALS),
            ("client_id", self.identity.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", scope.as_str()),
        ];

        let response = self.client.post(&url).form(&form).send().await?;
        if !response.status().is_success() {
            return Err(AuthError::provider(format!(
                "client secret token request failed: {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        parse_token_response(BACKEND_CLIENT_SECRET, &body)
    }
}
