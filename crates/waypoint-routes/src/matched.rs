//! Resolution result

use std::collections::BTreeMap;

use crate::location::Location;
use crate::meta::{AccessPolicy, RouteMeta};
use crate::view::ViewHandle;

/// Path parameters by name (`:id` -> `"42"`).
pub type Params = BTreeMap<String, String>;

/// A location bound to the route entry that matched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRoute {
    location: Location,
    pattern: String,
    params: Params,
    meta: RouteMeta,
    views: Vec<ViewHandle>,
    redirect: Option<String>,
}

impl MatchedRoute {
    pub(crate) fn new(
        location: Location,
        pattern: String,
        params: Params,
        meta: RouteMeta,
        views: Vec<ViewHandle>,
        redirect: Option<String>,
    ) -> Self {
        Self {
            location,
            pattern,
            params,
            meta,
            views,
            redirect,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn path(&self) -> &str {
        self.location.path()
    }

    /// The pattern of the matched entry, e.g. `/service/chat/:id`
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Effective meta, parents merged in
    pub fn meta(&self) -> &RouteMeta {
        &self.meta
    }

    pub fn access(&self) -> AccessPolicy {
        self.meta.access()
    }

    pub fn title(&self) -> Option<&str> {
        self.meta.title.as_deref()
    }

    /// Views to render, outermost layout first
    pub fn views(&self) -> &[ViewHandle] {
        &self.views
    }

    /// Target of a static redirect entry
    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }
}
