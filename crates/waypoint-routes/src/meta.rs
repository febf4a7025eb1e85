//! Typed route metadata

use serde::{Deserialize, Serialize};

/// Who may enter a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessPolicy {
    /// Anyone
    Public,
    /// Signed-in users only; others go to the login page
    RequiresAuth,
    /// Signed-out users only; signed-in users go to the landing page
    RequiresGuest,
}

impl AccessPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessPolicy::Public => "public",
            AccessPolicy::RequiresAuth => "requires_auth",
            AccessPolicy::RequiresGuest => "requires_guest",
        }
    }
}

impl std::fmt::Display for AccessPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    /// Unset means "inherit from the parent entry", public at the top level
    #[serde(default)]
    pub access: Option<AccessPolicy>,
    /// Display title for the page
    #[serde(default)]
    pub title: Option<String>,
}

impl RouteMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_access(mut self, access: AccessPolicy) -> Self {
        self.access = Some(access);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn access(&self) -> AccessPolicy {
        self.access.unwrap_or(AccessPolicy::Public)
    }

    pub fn requires_auth(&self) -> bool {
        self.access() == AccessPolicy::RequiresAuth
    }

    pub fn requires_guest(&self) -> bool {
        self.access() == AccessPolicy::RequiresGuest
    }

    /// Effective meta of a child entry: fields the child sets win.
    pub fn inherit(&self, child: &RouteMeta) -> RouteMeta {
        RouteMeta {
            access: child.access.or(self.access),
            title: child.title.clone().or_else(|| self.title.clone()),
        }
    }
}
