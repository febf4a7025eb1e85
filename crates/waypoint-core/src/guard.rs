//! Pre-navigation access guard

use serde::{Deserialize, Serialize};
use waypoint_routes::{AccessPolicy, MatchedRoute};
use waypoint_session::SessionState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuardDecision {
    Proceed,
    Redirect(String),
}

impl GuardDecision {
    pub fn is_proceed(&self) -> bool {
        matches!(self, GuardDecision::Proceed)
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            GuardDecision::Redirect(path) => Some(path),
            GuardDecision::Proceed => None,
        }
    }
}

/// Enforces the access policy of the target route.
///
/// Rules, first hit wins:
/// 1. Restore the session if a credential exists and nothing has checked it yet
/// 2. `RequiresAuth` while signed out -> login path
/// 3. `RequiresGuest` while signed in -> landing path
/// 4. Otherwise proceed
pub struct AccessGuard {
    session: SessionState,
    login_path: String,
    landing_path: String,
}

impl AccessGuard {
    pub fn new(session: SessionState, login_path: String, landing_path: String) -> Self {
        Self {
            session,
            login_path,
            landing_path,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Whether the next check will wait on a session restore
    pub fn will_suspend(&self) -> bool {
        self.session.needs_initialization()
    }

    pub async fn check(&self, to: &MatchedRoute, from: Option<&MatchedRoute>) -> GuardDecision {
        if self.session.needs_initialization() {
            if let Err(error) = self.session.initialize().await {
                tracing::debug!(to = %to.path(), %error, "Guard continuing signed out");
            }
        }

        let authenticated = self.session.is_authenticated();
        let decision = match to.access() {
            AccessPolicy::RequiresAuth if !authenticated => {
                GuardDecision::Redirect(self.login_path.clone())
            }
            AccessPolicy::RequiresGuest if authenticated => {
                GuardDecision::Redirect(self.landing_path.clone())
            }
            _ => GuardDecision::Proceed,
        };

        tracing::debug!(
            to = %to.path(),
            from = from.map(|r| r.path()).unwrap_or("-"),
            access = %to.access(),
            authenticated,
            decision = ?decision,
            "Guard evaluated"
        );

        decision
    }
}
