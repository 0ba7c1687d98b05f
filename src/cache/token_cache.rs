use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::authenticators::AuthenticatorKind;
use crate::cache::refresh_policy::{RefreshDecision, RefreshPolicy};
use crate::errors::AuthError;
use crate::token::{CredentialIdentity, TokenResult};

type FetchOutcome = Result<TokenResult, AuthError>;

#[derive(Debug, Clone)]
enum FetchState {
    Pending,
    Done(FetchOutcome),
}

/// One slot per credential identity.
///
/// Slot state machine: Empty -> Fetching -> Cached -> Fetching -> ...
/// `inflight` is Some exactly while Fetching; a failed fetch clears it and
/// leaves `cached` as it was before the attempt.
#[derive(Debug, Default)]
struct CacheSlot {
    cached: Option<TokenResult>,
    inflight: Option<watch::Receiver<FetchState>>,
}

/// Token store shared by caching authenticators.
///
/// Invariant: at most one acquisition in flight per identity. Every caller
/// that observes a miss while one is in flight attaches to it and receives
/// the leader's exact outcome.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    slots: Arc<Mutex<HashMap<CredentialIdentity, CacheSlot>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn get_or_refresh(
        &self,
        backend: &AuthenticatorKind,
        policy: &RefreshPolicy,
        force_refresh: bool,
    ) -> FetchOutcome {
        let identity = backend.identity().clone();

        let mut rx = {
            let mut slots = self.slots.lock().await;
            let slot = slots.entry(identity.clone()).or_default();

            if let RefreshDecision::UseCache =
                policy.decide(Utc::now(), slot.cached.as_ref(), force_refresh)
            {
                if let Some(token) = slot.cached.clone() {
                    debug!(identity = %identity, "serving cached token");
                    return Ok(token);
                }
            }

            match &slot.inflight {
                Some(rx) => {
                    debug!(identity = %identity, "joining in-flight acquisition");
                    rx.clone()
                }
                None => {
                    let (tx, rx) = watch::channel(FetchState::Pending);
                    slot.inflight = Some(rx.clone());
                    info!(
                        identity = %identity,
                        backend = backend.name(),
                        force_refresh,
                        "acquiring token"
                    );

                    // The acquisition runs in its own task: a caller dropping
                    // its future must not abort the fetch other followers
                    // depend on.
                    let backend = backend.clone();
                    let slots = Arc::clone(&self.slots);
                    let task_identity = identity.clone();
                    tokio::spawn(async move {
                        let outcome = acquire(&backend, force_refresh).await;

                        let mut slots = slots.lock().await;
                        if let Some(slot) = slots.get_mut(&task_identity) {
                            match &outcome {
                                Ok(token) => {
                                    debug!(
                                        identity = %task_identity,
                                        expires_on = %token.expires_on,
                                        "token stored"
                                    );
                                    slot.cached = Some(token.clone());
                                }
                                Err(err) => {
                                    warn!(
                                        identity = %task_identity,
                                        error = %err,
                                        "token acquisition failed"
                                    );
                                }
                            }
                            slot.inflight = None;
                        }
                        // Publish after the slot settles so a late subscriber
                        // never sees a Done result next to a stale marker.
                        let _ = tx.send(FetchState::Done(outcome));
                    });
                    rx
                }
            }
        };

        // Await the shared outcome outside the map lock.
        loop {
            {
                let state = rx.borrow_and_update();
                if let FetchState::Done(outcome) = &*state {
                    return outcome.clone();
                }
            }
            if rx.changed().await.is_err() {
                if let FetchState::Done(outcome) = &*rx.borrow() {
                    return outcome.clone();
                }
                // The acquisition died without publishing. Clear the orphaned
                // marker so the next call re-attempts instead of waiting on a
                // dead channel forever.
                let mut slots = self.slots.lock().await;
                if let Some(slot) = slots.get_mut(&identity) {
                    let orphaned = slot
                        .inflight
                        .as_ref()
                        .map(|r| {
                            r.has_changed().is_err()
                                && matches!(&*r.borrow(), FetchState::Pending)
                        })
                        .unwrap_or(false);
                    if orphaned {
                        slot.inflight = None;
                    }
                }
                return Err(AuthError::Cancelled);
            }
        }
    }
}

async fn acquire(backend: &AuthenticatorKind, force_refresh: bool) -> FetchOutcome {
    let token = backend.get_token(force_refresh).await?;
    // Invariant: expires_on is in the future at acquisition completion.
    if token.expires_on <= Utc::now() {
        return Err(AuthError::provider(format!(
            "{}: token already expired at {}",
            backend.name(),
            token.expires_on
        )));
    }
    Ok(token)
}
