use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::authenticators::{build_http_client, response::parse_token_response, token_url};
use crate::errors::AuthError;
use crate::token::{CredentialIdentity, TokenResult};
use crate::utils::constants::{
    BACKEND_CERTIFICATE, CLIENT_ASSERTION_TTL_SECS, CLIENT_ASSERTION_TYPE_JWT_BEARER,
    DEFAULT_AUTHORITY, GRANT_CLIENT_CREDENTIALS,
};

/// Client-credentials backend authenticating with a signed client assertion
/// instead of a shared secret. The assertion is an RS256 JWT over the token
/// endpoint audience, signed with the configured private key and carrying the
/// certificate thumbprint in its `x5t` header.
#[derive(Clone)]
pub struct CertificateAuthenticator {
    identity: CredentialIdentity,
    authority: String,
    encoding_key: EncodingKey,
    thumbprint: String,
    client: Client,
}

// EncodingKey has no Debug; keep key material out of the output either way.
impl fmt::Debug for CertificateAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateAuthenticator")
            .field("identity", &self.identity)
            .field("authority", &self.authority)
            .field("thumbprint", &self.thumbprint)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    aud: &'a str,
    iss: &'a str,
    sub: &'a str,
    jti: String,
    nbf: i64,
    exp: i64,
}

impl CertificateAuthenticator {
    pub fn new(
        tenant_id: &str,
        client_id: &str,
        resource: &str,
        private_key_pem: &str,
        thumbprint: &str,
    ) -> Result<Self, AuthError> {
        Self::with_authority(
            tenant_id,
            client_id,
            resource,
            private_key_pem,
            thumbprint,
            DEFAULT_AUTHORITY,
        )
    }

    pub fn with_authority(
        tenant_id: &str,
        client_id: &str,
        resource: &str,
        private_key_pem: &str,
        thumbprint: &str,
        authority: &str,
    ) -> Result<Self, AuthError> {
        let identity = CredentialIdentity::validated(tenant_id, resource, client_id)?;
        if thumbprint.trim().is_empty() {
            return Err(AuthError::configuration("thumbprint must not be empty"));
        }
        if authority.trim().is_empty() {
            return Err(AuthError::configuration("authority must not be empty"));
        }
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| AuthError::configuration(format!("invalid private key: {}", e)))?;
        Ok(Self {
            identity,
            authority: authority.to_owned(),
            encoding_key,
            thumbprint: thumbprint.to_owned(),
            client: build_http_client()?,
        })
    }

    pub fn identity(&self) -> &CredentialIdentity {
        &self.identity
    }

    fn build_assertion(&self, audience: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = AssertionClaims {
            aud: audience,
            iss: &self.identity.client_id,
            sub: &self.identity.client_id,
            jti: Uuid::new_v4().to_string(),
            nbf: now.timestamp(),
            exp: (now + Duration::seconds(CLIENT_ASSERTION_TTL_SECS)).timestamp(),
        };
        let mut header = Header::new(Algorithm::RS256);
        header.x5t = Some(self.thumbprint.clone());

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| AuthError::provider(format!("failed to sign client assertion: {}", e)))
    }

    pub async fn fetch_token(&self, _force_refresh: bool) -> Result<TokenResult, AuthError> {
        debug!(identity = %self.identity, "requesting certificate token");

        let url = token_url(&self.authority, &self.identity.tenant_id);
        let assertion = self.build_assertion(&url)?;
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
                "certificate token request failed: {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        parse_token_response(BACKEND_CERTIFICATE, &body)
    }
}
