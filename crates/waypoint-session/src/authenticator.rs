//! Host-provided credential verification

use async_trait::async_trait;

use crate::session::UserProfile;
use crate::Result;

/// Turns a persisted access token into the profile of the signed-in user.
///
/// Implementations usually call the backend's "current user" endpoint.
/// Returning an error means the token is no longer usable.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn restore(&self, access_token: &str) -> Result<UserProfile>;
}
