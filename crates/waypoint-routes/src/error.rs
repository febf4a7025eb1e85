//! Route error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("Invalid route pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Route {path} collides with {existing}")]
    DuplicateRoute { path: String, existing: String },

    #[error("Route {0} has no view, redirect or children")]
    EmptyRoute(String),

    #[error("Route table has no catch-all entry")]
    MissingCatchAll,

    #[error("Redirect from {from} must target an absolute path, got {to}")]
    RelativeRedirect { from: String, to: String },

    #[error("Redirect from {from} lands on another redirect at {to}")]
    RedirectChain { from: String, to: String },

    #[error("Failed to load view {component}: {reason}")]
    ViewLoad { component: String, reason: String },
}
