//! Waypoint Core
//!
//! The navigation resolver for the single-page client:
//! 1. Resolve the requested path against the application route table
//! 2. Follow static redirect entries
//! 3. Run the access guard, restoring the session first when a credential
//!    exists but has not been checked yet
//! 4. Materialize the matched views and commit the navigation

mod config;
mod error;
mod guard;
mod navigator;
mod phase;
mod routes;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::CoreError;
pub use guard::{AccessGuard, GuardDecision};
pub use navigator::{Navigation, NavigationOutcome, Navigator};
pub use phase::NavigationPhase;
pub use routes::{app_routes, LANDING_PATH, LOGIN_PATH};

// Re-export collaborator types
pub use waypoint_routes::{
    AccessPolicy, Location, MatchedRoute, Params, RouteEntry, RouteError, RouteMeta, RouteTable,
    ViewHandle, ViewLoader, ViewLoading,
};
pub use waypoint_session::{
    Authenticator, CredentialStore, SessionError, SessionPhase, SessionState, UserProfile,
};
pub use waypoint_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
