use std::collections::HashMap;
use std::{env, fs};

use serde::Deserialize;

use crate::config::settings::SettingsConfig;
use crate::errors::AuthError;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    pub credentials: HashMap<String, CredentialConfig>,
}

/// ================================
/// Credentials
/// ================================
///
/// One named credential entry; `type` selects the backend. Identity
/// parameters are validated non-empty when the backend is constructed, not
/// here.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialConfig {
    ManagedIdentity {
        tenant_id: String,
        client_id: String,
        resource: String,
        /// Metadata endpoint override; defaults to the IMDS endpoint.
        endpoint: Option<String>,
    },
    ClientSecret {
        tenant_id: String,
        client_id: String,
        resource: String,
        client_secret: SecretValue,
        authority: Option<String>,
    },
    Certificate {
        tenant_id: String,
        client_id: String,
        resource: String,
        /// Path to the PEM private key matching the registered certificate.
        certificate_path: String,
        /// Base64url SHA-1 thumbprint of the certificate (`x5t`).
        thumbprint: String,
        authority: Option<String>,
    },
    FederatedCredential {
        tenant_id: String,
        client_id: String,
        resource: String,
        /// Projected token file holding the externally issued assertion.
        assertion_path: String,
        authority: Option<String>,
    },
}

/// Secret value sources
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum SecretValue {
    Literal { value: String },
    FromEnv { from_env: String },
    FromFile { path: String },
}

impl SecretValue {
    /// Resolve to the secret string. Resolution happens once, when the
    /// backend is built.
    pub fn resolve(&self) -> Result<String, AuthError> {
        match self {
            SecretValue::Literal { value } => Ok(value.clone()),
            SecretValue::FromEnv { from_env } => env::var(from_env).map_err(|e| {
                AuthError::configuration(format!("secret env var '{}': {}", from_env, e))
            }),
            SecretValue::FromFile { path } => fs::read_to_string(path)
                .map(|raw| raw.trim().to_string())
                .map_err(|e| {
                    AuthError::configuration(format!("secret file '{}': {}", path, e))
                }),
        }
    }
}
