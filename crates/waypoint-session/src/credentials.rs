//! Persisted credential markers
//!
//! The presence of an access token is what tells the navigation guard that a
//! session may be restorable. The token format and its refresh lifecycle are
//! owned by the backend; this store only keeps the strings.

use waypoint_storage::{delete_setting_in, set_setting_in, Database};

use crate::error::SessionError;
use crate::Result;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

#[derive(Clone)]
pub struct CredentialStore {
    db: Database,
    access_key: String,
    refresh_key: String,
}

impl CredentialStore {
    pub fn new(db: Database) -> Self {
        Self::with_keys(db, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY)
    }

    pub fn with_keys(db: Database, access_key: &str, refresh_key: &str) -> Self {
        Self {
            db,
            access_key: access_key.to_string(),
            refresh_key: refresh_key.to_string(),
        }
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn access_token(&self) -> Result<Option<String>> {
        Ok(self
            .db
            .get_setting(&self.access_key)?
            .filter(|token| !token.is_empty()))
    }

    pub fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self
            .db
            .get_setting(&self.refresh_key)?
            .filter(|token| !token.is_empty()))
    }

    /// Whether a credential marker exists.
    ///
    /// A store that cannot be read is treated as holding no credential.
    pub fn has_credential(&self) -> bool {
        match self.access_token() {
            Ok(token) => token.is_some(),
            Err(e) => {
                tracing::warn!(key = %self.access_key, error = %e, "Failed to read credential marker");
                false
            }
        }
    }

    /// Persist a token pair. A missing refresh token removes any stale one.
    pub fn save(&self, access_token: &str, refresh_token: Option<&str>) -> Result<()> {
        if access_token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }

        self.db.transaction(|conn| {
            set_setting_in(conn, &self.access_key, access_token)?;
            match refresh_token {
                Some(refresh) => set_setting_in(conn, &self.refresh_key, refresh)?,
                None => {
                    delete_setting_in(conn, &self.refresh_key)?;
                }
            }
            Ok(())
        })?;

        tracing::debug!(key = %self.access_key, "Stored credentials");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.db.transaction(|conn| {
            delete_setting_in(conn, &self.access_key)?;
            delete_setting_in(conn, &self.refresh_key)?;
            Ok(())
        })?;

        tracing::debug!(key = %self.access_key, "Cleared credentials");
        Ok(())
    }
}
