//! Navigation State Machine
//!
//! ```text
//! Idle
//!   ↓ navigate()
//! Resolving ←──────────────┐
//!   ↓ matched              │
//! GuardEvaluating          │
//!   ↓ session restore      │
//! Suspended                │
//!   ↓ decision             │
//! Redirecting ─────────────┘
//! Proceeding
//!   ↓ committed
//! Idle
//! ```
//! Static redirect entries go straight from Resolving to Redirecting.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationPhase {
    Idle,
    Resolving,
    GuardEvaluating,
    /// Waiting for the session to restore
    Suspended,
    Redirecting,
    Proceeding,
}

impl NavigationPhase {
    pub fn can_transition_to(&self, target: NavigationPhase) -> bool {
        use NavigationPhase::*;

        match (self, target) {
            (Idle, Resolving) => true,
            (Resolving, GuardEvaluating) => true,
            (Resolving, Redirecting) => true,
            (GuardEvaluating, Suspended) => true,
            (GuardEvaluating, Redirecting) => true,
            (GuardEvaluating, Proceeding) => true,
            (Suspended, Redirecting) => true,
            (Suspended, Proceeding) => true,
            (Redirecting, Resolving) => true,
            // Abandoned: superseded, redirect limit, or view failed to load
            (GuardEvaluating, Idle) => true,
            (Suspended, Idle) => true,
            (Redirecting, Idle) => true,
            (Proceeding, Idle) => true,
            _ => false,
        }
    }

    pub fn is_busy(&self) -> bool {
        !matches!(self, NavigationPhase::Idle)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationPhase::Idle => "idle",
            NavigationPhase::Resolving => "resolving",
            NavigationPhase::GuardEvaluating => "guard_evaluating",
            NavigationPhase::Suspended => "suspended",
            NavigationPhase::Redirecting => "redirecting",
            NavigationPhase::Proceeding => "proceeding",
        }
    }
}

impl std::fmt::Display for NavigationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Phase of the most recent navigation. Older navigations can no longer move it.
#[derive(Debug)]
pub(crate) struct PhaseTracker {
    state: RwLock<(u64, NavigationPhase)>,
}

impl PhaseTracker {
    pub(crate) fn new() -> Self {
        Self {
            state: RwLock::new((0, NavigationPhase::Idle)),
        }
    }

    pub(crate) fn current(&self) -> NavigationPhase {
        self.state.read().1
    }

    /// Hand the tracker to a new navigation.
    pub(crate) fn begin(&self, ticket: u64) {
        let mut state = self.state.write();
        if ticket > state.0 {
            *state = (ticket, NavigationPhase::Resolving);
        }
    }

    pub(crate) fn advance(&self, ticket: u64, to: NavigationPhase) -> bool {
        let mut state = self.state.write();
        if state.0 != ticket {
            return false;
        }
        if !state.1.can_transition_to(to) {
            tracing::warn!(from = %state.1, to = %to, ticket, "Invalid navigation transition");
            return false;
        }
        state.1 = to;
        true
    }
}
