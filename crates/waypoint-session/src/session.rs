//! Session state handle

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::authenticator::Authenticator;
use crate::credentials::CredentialStore;
use crate::phase::SessionPhase;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug)]
struct SessionInner {
    phase: SessionPhase,
    profile: Option<UserProfile>,
    authenticated_at: Option<DateTime<Utc>>,
}

/// Shared handle to the authentication session.
///
/// Clones observe the same state. The handle is passed explicitly to the
/// navigator rather than living in a process-wide global.
pub struct SessionState {
    inner: Arc<RwLock<SessionInner>>,
    /// Serializes restore/login/logout so a restore never overwrites a newer login
    transition_lock: Arc<Mutex<()>>,
    credentials: CredentialStore,
    authenticator: Arc<dyn Authenticator>,
}

impl SessionState {
    pub fn new(credentials: CredentialStore, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionInner {
                phase: SessionPhase::Uninitialized,
                profile: None,
                authenticated_at: None,
            })),
            transition_lock: Arc::new(Mutex::new(())),
            credentials,
            authenticator,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().profile.is_some()
    }

    pub fn phase(&self) -> SessionPhase {
        self.inner.read().phase
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.inner.read().profile.clone()
    }

    pub fn authenticated_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().authenticated_at
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// True when the authenticated flag cannot be trusted yet: the user is not
    /// signed in, a credential marker exists and no restore has completed.
    pub fn needs_initialization(&self) -> bool {
        {
            let inner = self.inner.read();
            if inner.profile.is_some() || inner.phase.is_ready() {
                return false;
            }
        }
        self.credentials.has_credential()
    }

    /// Restore the session from the persisted credential.
    ///
    /// Runs at most once per process lifetime; later and concurrent callers
    /// get the settled result. A failed restore still settles the session
    /// (unauthenticated) and the error is returned to this caller only.
    pub async fn initialize(&self) -> Result<bool> {
        let _running = self.transition_lock.lock().await;

        if self.phase().is_ready() {
            return Ok(self.is_authenticated());
        }

        self.set_phase(SessionPhase::Initializing);
        tracing::debug!(key = %self.credentials.access_key(), "Restoring session");

        let restored = self.restore().await;

        let mut inner = self.inner.write();
        Self::advance(&mut inner, SessionPhase::Ready);
        match restored {
            Ok(Some(profile)) => {
                tracing::info!(
                    user_id = profile.id,
                    username = %profile.username,
                    "Session restored"
                );
                inner.profile = Some(profile);
                inner.authenticated_at = Some(Utc::now());
                Ok(true)
            }
            Ok(None) => {
                tracing::debug!("No credential to restore");
                Ok(false)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Session restore failed, continuing unauthenticated");
                inner.profile = None;
                inner.authenticated_at = None;
                Err(e)
            }
        }
    }

    async fn restore(&self) -> Result<Option<UserProfile>> {
        let Some(token) = self.credentials.access_token()? else {
            return Ok(None);
        };

        self.authenticator.restore(&token).await.map(Some)
    }

    /// Record a successful sign-in and persist its tokens.
    pub async fn login(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
        profile: UserProfile,
    ) -> Result<()> {
        let _running = self.transition_lock.lock().await;

        self.credentials.save(access_token, refresh_token)?;

        let mut inner = self.inner.write();
        Self::advance(&mut inner, SessionPhase::Ready);
        tracing::info!(user_id = profile.id, username = %profile.username, "Signed in");
        inner.profile = Some(profile);
        inner.authenticated_at = Some(Utc::now());

        Ok(())
    }

    /// Forget the user and remove persisted credentials.
    pub async fn logout(&self) -> Result<()> {
        let _running = self.transition_lock.lock().await;

        self.credentials.clear()?;

        let mut inner = self.inner.write();
        Self::advance(&mut inner, SessionPhase::Ready);
        if let Some(profile) = inner.profile.take() {
            tracing::info!(user_id = profile.id, "Signed out");
        }
        inner.authenticated_at = None;

        Ok(())
    }

    fn set_phase(&self, phase: SessionPhase) {
        Self::advance(&mut self.inner.write(), phase);
    }

    fn advance(inner: &mut SessionInner, phase: SessionPhase) {
        if inner.phase.can_transition_to(phase) {
            inner.phase = phase;
        } else {
            tracing::warn!(from = %inner.phase, to = %phase, "Ignoring invalid session transition");
        }
    }
}

impl Clone for SessionState {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            transition_lock: Arc::clone(&self.transition_lock),
            credentials: self.credentials.clone(),
            authenticator: Arc::clone(&self.authenticator),
        }
    }
}
