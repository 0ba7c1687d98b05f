//! Shared constants and invariants

pub const DEFAULT_SAFETY_MARGIN_SECS: i64 = 300;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;

pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";
pub const IMDS_TOKEN_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";
pub const IMDS_API_VERSION: &str = "2018-02-01";

pub const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";
pub const CLIENT_ASSERTION_TYPE_JWT_BEARER: &str =
    "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";
/// Lifetime of a self-signed client assertion, not of the returned token.
pub const CLIENT_ASSERTION_TTL_SECS: i64 = 600;

// Supported backend kinds
pub const BACKEND_MANAGED_IDENTITY: &str = "managed_identity";
pub const BACKEND_CLIENT_SECRET: &str = "client_secret";
pub const BACKEND_CERTIFICATE: &str = "certificate";
pub const BACKEND_FEDERATED: &str = "federated_credential";
