//! Session lifecycle
//!
//! ```text
//! Uninitialized
//!   ↓ initialize()
//! Initializing
//!   ↓ restore finished (success or failure)
//! Ready
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Nothing has been read from persisted credentials yet
    Uninitialized,
    /// A restore is in flight
    Initializing,
    /// The authenticated flag can be trusted
    Ready,
}

impl SessionPhase {
    pub fn can_transition_to(&self, target: SessionPhase) -> bool {
        match (self, target) {
            (SessionPhase::Uninitialized, SessionPhase::Initializing) => true,
            // login() settles the session without a restore
            (SessionPhase::Uninitialized, SessionPhase::Ready) => true,
            (SessionPhase::Initializing, SessionPhase::Ready) => true,
            // An abandoned restore leaves Initializing behind; the next caller restarts it
            (SessionPhase::Initializing, SessionPhase::Initializing) => true,
            (SessionPhase::Ready, SessionPhase::Ready) => true,
            _ => false,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SessionPhase::Ready)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Uninitialized => "uninitialized",
            SessionPhase::Initializing => "initializing",
            SessionPhase::Ready => "ready",
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
