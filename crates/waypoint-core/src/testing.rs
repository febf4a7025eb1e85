//! Shared test fixtures

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use waypoint_routes::{RouteError, ViewLoader};
use waypoint_session::{Authenticator, CredentialStore, SessionError, SessionState, UserProfile};
use waypoint_storage::Database;

pub struct FakeAuthenticator {
    calls: AtomicUsize,
    accept: bool,
    gate: Option<Arc<Notify>>,
}

impl FakeAuthenticator {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            accept: true,
            gate: None,
        })
    }

    pub fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            accept: false,
            gate: None,
        })
    }

    /// Accepts, but only once the gate is notified
    pub fn gated(gate: Arc<Notify>) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            accept: true,
            gate: Some(gate),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authenticator for FakeAuthenticator {
    async fn restore(&self, access_token: &str) -> waypoint_session::Result<UserProfile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        if self.accept {
            Ok(profile(access_token))
        } else {
            Err(SessionError::Authentication("token expired".to_string()))
        }
    }
}

pub fn profile(username: &str) -> UserProfile {
    UserProfile {
        id: 1,
        username: username.to_string(),
        email: None,
    }
}

/// Session over an in-memory store, optionally holding a persisted token
pub fn session(token: Option<&str>, auth: &Arc<FakeAuthenticator>) -> SessionState {
    let store = CredentialStore::new(Database::open_in_memory().unwrap());
    if let Some(token) = token {
        store.save(token, None).unwrap();
    }
    SessionState::new(store, auth.clone())
}

pub async fn signed_in(session: &SessionState) {
    session
        .login("token", Some("refresh"), profile("alice"))
        .await
        .unwrap();
}

/// Views are their component names; `Broken` fails to load
pub struct NamedViews;

impl ViewLoader for NamedViews {
    type View = String;

    fn load(&self, component: &str) -> waypoint_routes::Result<String> {
        if component == "Broken" {
            return Err(RouteError::ViewLoad {
                component: component.to_string(),
                reason: "chunk failed to load".to_string(),
            });
        }
        Ok(component.to_string())
    }
}
