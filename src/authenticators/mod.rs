//! Identity backends
//!
//! Defines all supported backends behind one capability and provides a
//! factory to build them from config. Backends are stateless with respect to
//! the returned token: caching is strictly the caching layer's job, which
//! keeps them simple and interchangeable.

use std::time::Duration;

use reqwest::Client;

pub mod certificate;
pub mod client_secret;
pub mod federated;
pub mod managed_identity;
pub mod response;

use certificate::CertificateAuthenticator;
use client_secret::ClientSecretAuthenticator;
use federated::FederatedCredentialAuthenticator;
use managed_identity::ManagedIdentityAuthenticator;

use crate::config::credentials::CredentialConfig;
use crate::errors::AuthError;
use crate::token::{CredentialIdentity, TokenResult};
use crate::utils::constants::{
    BACKEND_CERTIFICATE, BACKEND_CLIENT_SECRET, BACKEND_FEDERATED, BACKEND_MANAGED_IDENTITY,
    DEFAULT_AUTHORITY, DEFAULT_HTTP_TIMEOUT_MS,
};

/// Closed set of identity backends, selected at construction time by
/// configuration, never by runtime type inspection.
#[derive(Debug, Clone)]
pub enum AuthenticatorKind {
    ManagedIdentity(ManagedIdentityAuthenticator),
    ClientSecret(ClientSecretAuthenticator),
    Certificate(CertificateAuthenticator),
    FederatedCredential(FederatedCredentialAuthenticator),
}

impl AuthenticatorKind {
    pub fn name(&self) -> &'static str {
        match self {
            AuthenticatorKind::ManagedIdentity(_) => BACKEND_MANAGED_IDENTITY,
            AuthenticatorKind::ClientSecret(_) => BACKEND_CLIENT_SECRET,
            AuthenticatorKind::Certificate(_) => BACKEND_CERTIFICATE,
            AuthenticatorKind::FederatedCredential(_) => BACKEND_FEDERATED,
        }
    }

    pub fn identity(&self) -> &CredentialIdentity {
        match self {
            AuthenticatorKind::ManagedIdentity(a) => a.identity(),
            AuthenticatorKind::ClientSecret(a) => a.identity(),
            AuthenticatorKind::Certificate(a) => a.identity(),
            AuthenticatorKind::FederatedCredential(a) => a.identity(),
        }
    }

    /// Contact the backend's identity provider for a fresh token.
    ///
    /// `force_refresh` asks the backend to bypass any provider-side
    /// short-term cache; what that means (if anything) is backend-specific
    /// and opaque here.
    pub async fn get_token(&self, force_refresh: bool) -> Result<TokenResult, AuthError> {
        match self {
            AuthenticatorKind::ManagedIdentity(a) => a.fetch_token(force_refresh).await,
            AuthenticatorKind::ClientSecret(a) => a.fetch_token(force_refresh).await,
            AuthenticatorKind::Certificate(a) => a.fetch_token(force_refresh).await,
            AuthenticatorKind::FederatedCredential(a) => a.fetch_token(force_refresh).await,
        }
    }
}

/// Build a backend from one named credential entry.
pub fn build_authenticator(cfg: &CredentialConfig) -> Result<AuthenticatorKind, AuthError> {
    match cfg {
        CredentialConfig::ManagedIdentity {
            tenant_id,
            client_id,
            resource,
            endpoint,
        } => {
            let authenticator = match endpoint {
                Some(endpoint) => ManagedIdentityAuthenticator::with_endpoint(
                    tenant_id, client_id, resource, endpoint,
                )?,
                None => ManagedIdentityAuthenticator::new(tenant_id, client_id, resource)?,
            };
            Ok(AuthenticatorKind::ManagedIdentity(authenticator))
        }
        CredentialConfig::ClientSecret {
            tenant_id,
            client_id,
            resource,
            client_secret,
            authority,
        } => {
            let secret = client_secret.resolve()?;
            let authority = authority.as_deref().unwrap_or(DEFAULT_AUTHORITY);
            Ok(AuthenticatorKind::ClientSecret(
                ClientSecretAuthenticator::with_authority(
                    tenant_id, client_id, resource, &secret, authority,
                )?,
            ))
        }
        CredentialConfig::Certificate {
            tenant_id,
            client_id,
            resource,
            certificate_path,
            thumbprint,
            authority,
        } => {
            let pem = std::fs::read_to_string(certificate_path).map_err(|e| {
                AuthError::configuration(format!(
                    "failed to read private key '{}': {}",
                    certificate_path, e
                ))
            })?;
            let authority = authority.as_deref().unwrap_or(DEFAULT_AUTHORITY);
            Ok(AuthenticatorKind::Certificate(
                CertificateAuthenticator::with_authority(
                    tenant_id, client_id, resource, &pem, thumbprint, authority,
                )?,
            ))
        }
        CredentialConfig::FederatedCredential {
            tenant_id,
            client_id,
            resource,
            assertion_path,
            authority,
        } => {
            let authority = authority.as_deref().unwrap_or(DEFAULT_AUTHORITY);
            Ok(AuthenticatorKind::FederatedCredential(
                FederatedCredentialAuthenticator::with_authority(
                    tenant_id, client_id, resource, assertion_path, authority,
                )?,
            ))
        }
    }
}

pub(crate) fn build_http_client() -> Result<Client, AuthError> {
    Client::builder()
        .timeout(Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS))
        .build()
        .map_err(|e| AuthError::configuration(format!("failed to build HTTP client: {}", e)))
}

pub(crate) fn token_url(authority: &str, tenant_id: &str) -> String {
    format!(
        "{}/{}/oauth2/v2.0/token",
        authority.trim_end_matches('/'),
        tenant_id
    )
}
