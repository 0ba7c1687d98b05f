use chrono::{DateTime, Duration, Utc};

use crate::token::TokenResult;
use crate::utils::constants::DEFAULT_SAFETY_MARGIN_SECS;

/// Outcome of a cache freshness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshDecision {
    UseCache,
    Refresh,
}

/// Decides whether a cached token is still usable. Pure: callers supply
/// `now`, so the decision is fully reproducible in tests.
///
/// The safety margin keeps a token from expiring mid-flight on a slow
/// outbound request; a forced refresh wins regardless of freshness, as the
/// caller's escape hatch after a downstream authorization rejection.
#[derive(Debug, Clone, Copy)]
pub struct RefreshPolicy {
    safety_margin: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            safety_margin: Duration::seconds(DEFAULT_SAFETY_MARGIN_SECS),
        }
    }
}

impl RefreshPolicy {
    pub fn with_margin_seconds(secs: i64) -> Self {
        Self {
            safety_margin: Duration::seconds(secs),
        }
    }

    pub fn decide(
        &self,
        now: DateTime<Utc>,
        cached: Option<&TokenResult>,
        force_refresh: bool,
    ) -> RefreshDecision {
        if force_refresh {
            return RefreshDecision::Refresh;
        }
        match cached {
            Some(token) if now + self.safety_margin < token.expires_on => {
                RefreshDecision::UseCache
            }
            _ => RefreshDecision::Refresh,
        }
    }
}
