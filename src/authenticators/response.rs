//! Token endpoint response parsing shared by all backends.
//!
//! Providers disagree on how expiry is reported: `expires_in` (seconds from
//! now) vs `expires_on` (unix timestamp), each as a JSON number or a numeric
//! string. All four shapes are accepted here.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AuthError;
use crate::token::TokenResult;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<Value>,
    #[serde(default)]
    expires_on: Option<Value>,
}

/// Parse a token endpoint body into a [`TokenResult`].
///
/// `expires_on` wins over `expires_in` when both are present, since it is
/// already absolute.
pub fn parse_token_response(backend: &str, body: &str) -> Result<TokenResult, AuthError> {
    let parsed: TokenResponse = serde_json::from_str(body).map_err(|e| {
        AuthError::provider(format!("{}: malformed token response: {}", backend, e))
    })?;

    let access_token = parsed
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AuthError::provider(format!("{}: response is missing 'access_token'", backend))
        })?;

    let expires_on = if let Some(value) = &parsed.expires_on {
        unix_instant(backend, value)?
    } else if let Some(value) = &parsed.expires_in {
        Utc::now() + Duration::seconds(numeric_field(backend, "expires_in", value)?)
    } else {
        return Err(AuthError::provider(format!(
            "{}: response carries neither 'expires_in' nor 'expires_on'",
            backend
        )));
    };

    Ok(TokenResult::new(access_token, expires_on))
}

fn unix_instant(backend: &str, value: &Value) -> Result<DateTime<Utc>, AuthError> {
    let secs = numeric_field(backend, "expires_on", value)?;
    Utc.timestamp_opt(secs, 0).single().ok_or_else(|| {
        AuthError::provider(format!("{}: 'expires_on' out of range: {}", backend, secs))
    })
}

fn numeric_field(backend: &str, field: &str, value: &Value) -> Result<i64, AuthError> {
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| {
            AuthError::provider(format!("{}: '{}' is not an integer: {}", backend, field, n))
        }),
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| {
            AuthError::provider(format!("{}: '{}' is not numeric: '{}'", backend, field, s))
        }),
        other => Err(AuthError::provider(format!(
            "{}: unexpected '{}' value: {}",
            backend, field, other
        ))),
    }
}
