//! Waypoint Storage Layer
//!
//! SQLite-backed key/value store for client state that must survive a
//! restart (credential markers, preferences). Other crates read and write
//! through [`Database`] and never touch the connection directly.

mod database;
mod error;
mod migrations;

pub use database::{delete_setting_in, get_setting_in, set_setting_in, Database};
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
