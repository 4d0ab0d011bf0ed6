//! Session manager
//!
//! Owns the renewal state for one process. When several calls fail with 401
//! at once, the first one starts a renewal task and every caller, the first
//! included, waits on a oneshot channel until that single renewal settles:
//!
//! ```text
//! Idle ──401──▶ Renewing ──ok──▶ Idle
//!                  │
//!                  └──err──▶ Expired ──store_credentials──▶ Idle
//! ```
//!
//! The renewal runs on its own task, so dropping any caller (including the
//! one that started it) never affects the others.

use super::credentials::CredentialStore;
use super::refresh::TokenRenewer;
use super::types::{CredentialPair, SessionEvent};
use crate::error::RenewalError;
use anyhow::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 16;
const DEFAULT_RENEWAL_TIMEOUT: Duration = Duration::from_secs(15);

type Waiter = oneshot::Sender<Result<String, RenewalError>>;
type Settled = oneshot::Receiver<Result<String, RenewalError>>;

enum RenewalState {
    Idle,
    Renewing { waiters: Vec<Waiter> },
    Expired,
}

/// Observable phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    /// `queued` counts every call waiting on the renewal, the first included.
    Renewing { queued: usize },
    Expired,
}

enum Recovery {
    Wait(Settled),
    Lead {
        refresh_token: String,
        settled: Settled,
    },
    Replay(String),
    Expire(RenewalError),
    AlreadyExpired,
}

/// What an idle session does with a 401.
#[derive(Debug, PartialEq, Eq)]
enum IdlePlan {
    Replay(String),
    Renew(String),
    Expire(RenewalError),
}

struct SessionInner {
    credentials: CredentialStore,
    renewer: Arc<dyn TokenRenewer>,
    state: Mutex<RenewalState>,
    events: broadcast::Sender<SessionEvent>,
    login_route: String,
}

/// Single-flight coordinator for access token renewal.
///
/// Construct once per process and share it behind an `Arc`.
pub struct SessionManager {
    inner: Arc<SessionInner>,
    renewal_timeout: Duration,
}

impl SessionManager {
    pub fn new(
        credentials: CredentialStore,
        renewer: Arc<dyn TokenRenewer>,
        login_route: impl Into<String>,
    ) -> Self {
        let (events, _receiver) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(SessionInner {
                credentials,
                renewer,
                state: Mutex::new(RenewalState::Idle),
                events,
                login_route: login_route.into(),
            }),
            renewal_timeout: DEFAULT_RENEWAL_TIMEOUT,
        }
    }

    /// Upper bound for one renewal; a renewal that exceeds it fails with
    /// [`RenewalError::TimedOut`].
    pub fn with_renewal_timeout(mut self, timeout: Duration) -> Self {
        self.renewal_timeout = timeout;
        self
    }

    /// Subscribe to session expiry and sign-out notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    pub fn access_token(&self) -> Result<Option<String>> {
        self.inner.credentials.access_token()
    }

    pub fn phase(&self) -> SessionPhase {
        match &*self.inner.state.lock() {
            RenewalState::Idle => SessionPhase::Idle,
            RenewalState::Renewing { waiters } => SessionPhase::Renewing {
                queued: waiters.len(),
            },
            RenewalState::Expired => SessionPhase::Expired,
        }
    }

    /// Store a fresh credential pair, e.g. after sign-in.
    ///
    /// An expired session becomes usable again.
    pub fn store_credentials(&self, pair: &CredentialPair) -> Result<()> {
        self.inner.credentials.set_pair(pair)?;

        let mut state = self.inner.state.lock();
        if matches!(*state, RenewalState::Expired) {
            *state = RenewalState::Idle;
        }
        info!("Stored new session credentials");
        Ok(())
    }

    /// Drop all credentials at the user's request.
    pub fn sign_out(&self) -> Result<()> {
        self.inner.credentials.clear()?;

        let mut state = self.inner.state.lock();
        if matches!(*state, RenewalState::Expired) {
            *state = RenewalState::Idle;
        }
        drop(state);

        let _ = self.inner.events.send(SessionEvent::SignedOut);
        info!("Signed out");
        Ok(())
    }

    /// Recover from a 401 on a call that was sent with `sent_with`.
    ///
    /// Returns the access token the call should be replayed with. At most one
    /// renewal is in flight at any time; callers arriving while it runs are
    /// queued and settled together with it, in arrival order.
    pub async fn recover(&self, sent_with: Option<&str>) -> Result<String, RenewalError> {
        match self.plan_recovery(sent_with) {
            Recovery::Wait(settled) => {
                debug!("Renewal in flight, queued behind it");
                wait_settled(settled).await
            }
            Recovery::Lead {
                refresh_token,
                settled,
            } => {
                info!("Access token rejected, renewing");
                let inner = self.inner.clone();
                let timeout = self.renewal_timeout;
                tokio::spawn(async move { inner.renew(refresh_token, timeout).await });
                wait_settled(settled).await
            }
            Recovery::Replay(token) => {
                debug!("Access token already renewed, replaying");
                Ok(token)
            }
            Recovery::Expire(error) => {
                self.inner.expire(&error);
                Err(error)
            }
            Recovery::AlreadyExpired => {
                self.inner.clear_credentials();
                Err(RenewalError::SessionExpired)
            }
        }
    }

    fn plan_recovery(&self, sent_with: Option<&str>) -> Recovery {
        let credentials = &self.inner.credentials;
        let mut state = self.inner.state.lock();
        match &mut *state {
            RenewalState::Renewing { waiters } => {
                let (sender, settled) = oneshot::channel();
                waiters.push(sender);
                Recovery::Wait(settled)
            }
            RenewalState::Expired => Recovery::AlreadyExpired,
            RenewalState::Idle => {
                let plan = plan_from_idle(sent_with, credentials.access_token(), || {
                    credentials.refresh_token()
                });
                match plan {
                    IdlePlan::Replay(token) => Recovery::Replay(token),
                    IdlePlan::Renew(refresh_token) => {
                        let (sender, settled) = oneshot::channel();
                        *state = RenewalState::Renewing {
                            waiters: vec![sender],
                        };
                        Recovery::Lead {
                            refresh_token,
                            settled,
                        }
                    }
                    IdlePlan::Expire(error) => {
                        *state = RenewalState::Expired;
                        Recovery::Expire(error)
                    }
                }
            }
        }
    }
}

impl SessionInner {
    async fn renew(&self, refresh_token: String, timeout: Duration) {
        // Settle the queue if this task unwinds before it does.
        let abandon = scopeguard::guard(&self.state, |state| {
            let waiters = take_waiters(&mut state.lock(), RenewalState::Idle);
            warn!(queued = waiters.len(), "Renewal abandoned before it settled");
            for waiter in waiters {
                let _ = waiter.send(Err(RenewalError::Abandoned));
            }
        });

        let outcome = match tokio::time::timeout(timeout, self.renewer.renew(&refresh_token)).await
        {
            Ok(Ok(token)) => self
                .credentials
                .set_access_token(&token)
                .map(|_| token)
                .map_err(|e| RenewalError::Storage(e.to_string())),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(RenewalError::TimedOut),
        };

        if outcome.is_err() {
            self.clear_credentials();
        }

        let next = if outcome.is_ok() {
            RenewalState::Idle
        } else {
            RenewalState::Expired
        };
        let waiters = take_waiters(&mut scopeguard::ScopeGuard::into_inner(abandon).lock(), next);

        match &outcome {
            Ok(_) => info!(replayed = waiters.len(), "Access token renewed"),
            Err(error) => {
                warn!(%error, rejected = waiters.len(), "Access token renewal failed");
                self.announce_expiry(error);
            }
        }

        for waiter in waiters {
            let _ = waiter.send(outcome.clone());
        }
    }

    fn expire(&self, error: &RenewalError) {
        warn!(%error, "Session cannot be renewed");
        self.clear_credentials();
        self.announce_expiry(error);
    }

    fn announce_expiry(&self, error: &RenewalError) {
        let _ = self.events.send(SessionEvent::Expired {
            redirect_to: self.login_route.clone(),
            reason: error.to_string(),
        });
    }

    fn clear_credentials(&self) {
        if let Err(e) = self.credentials.clear() {
            warn!(error = %e, "Failed to clear stored credentials");
        }
    }
}

async fn wait_settled(settled: Settled) -> Result<String, RenewalError> {
    settled.await.unwrap_or(Err(RenewalError::Abandoned))
}

/// Decide how an idle session answers a 401. Any storage failure expires it.
fn plan_from_idle(
    sent_with: Option<&str>,
    access_token: Result<Option<String>>,
    refresh_token: impl FnOnce() -> Result<Option<String>>,
) -> IdlePlan {
    let storage_failure = |e: anyhow::Error| IdlePlan::Expire(RenewalError::Storage(e.to_string()));

    match access_token {
        Err(e) => return storage_failure(e),
        Ok(Some(current)) if Some(current.as_str()) != sent_with => {
            return IdlePlan::Replay(current);
        }
        Ok(_) => {}
    }

    match refresh_token() {
        Ok(Some(token)) => IdlePlan::Renew(token),
        Ok(None) => IdlePlan::Expire(RenewalError::MissingRefreshToken),
        Err(e) => storage_failure(e),
    }
}

fn take_waiters(state: &mut RenewalState, next: RenewalState) -> Vec<Waiter> {
    match std::mem::replace(state, next) {
        RenewalState::Renewing { waiters } => waiters,
        _ => Vec::new(),
    }
}
