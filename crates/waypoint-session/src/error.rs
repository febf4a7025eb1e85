//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(#[from] waypoint_storage::StorageError),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Access token cannot be empty")]
    EmptyToken,
}
