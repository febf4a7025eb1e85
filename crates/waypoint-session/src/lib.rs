//! Waypoint Session State
//!
//! Tracks whether the current user is authenticated.
//! - The session is an explicit handle, cloned into whoever needs it
//! - Credentials persist in the settings store under an access-token key
//! - `initialize` restores the session from a persisted credential once per
//!   process lifetime; the [`Authenticator`] is supplied by the host

mod authenticator;
mod credentials;
mod error;
mod phase;
mod session;

pub use authenticator::Authenticator;
pub use credentials::{CredentialStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
pub use error::SessionError;
pub use phase::SessionPhase;
pub use session::{SessionState, UserProfile};

pub type Result<T> = std::result::Result<T, SessionError>;
