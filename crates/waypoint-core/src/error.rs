//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] waypoint_storage::StorageError),

    #[error("Session error: {0}")]
    Session(#[from] waypoint_session::SessionError),

    #[error("Route error: {0}")]
    Route(#[from] waypoint_routes::RouteError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Navigation to {path} exceeded {limit} redirects")]
    RedirectLoop { path: String, limit: usize },
}
