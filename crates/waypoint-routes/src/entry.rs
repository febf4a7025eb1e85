//! Route table entries

use crate::meta::{AccessPolicy, RouteMeta};
use crate::view::ViewHandle;

/// One entry of the route table, as declared by the application.
///
/// Child paths are joined onto the parent's path unless they start with `/`.
/// An entry without a view or redirect only groups its children and is not
/// matchable itself.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    path: String,
    view: Option<ViewHandle>,
    redirect: Option<String>,
    meta: RouteMeta,
    children: Vec<RouteEntry>,
}

impl RouteEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            view: None,
            redirect: None,
            meta: RouteMeta::default(),
            children: Vec::new(),
        }
    }

    pub fn view(mut self, view: ViewHandle) -> Self {
        self.view = Some(view);
        self
    }

    /// View loaded the first time a navigation to it proceeds
    pub fn lazy(self, component: &str) -> Self {
        self.view(ViewHandle::lazy(component))
    }

    /// View loaded when the navigator starts
    pub fn eager(self, component: &str) -> Self {
        self.view(ViewHandle::eager(component))
    }

    pub fn redirect(mut self, to: impl Into<String>) -> Self {
        self.redirect = Some(to.into());
        self
    }

    pub fn meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn access(mut self, access: AccessPolicy) -> Self {
        self.meta.access = Some(access);
        self
    }

    pub fn requires_auth(self) -> Self {
        self.access(AccessPolicy::RequiresAuth)
    }

    pub fn requires_guest(self) -> Self {
        self.access(AccessPolicy::RequiresGuest)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = Some(title.into());
        self
    }

    pub fn children(mut self, children: Vec<RouteEntry>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn view_handle(&self) -> Option<&ViewHandle> {
        self.view.as_ref()
    }

    pub fn redirect_target(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    pub fn route_meta(&self) -> &RouteMeta {
        &self.meta
    }

    pub fn child_entries(&self) -> &[RouteEntry] {
        &self.children
    }

    pub(crate) fn is_matchable(&self) -> bool {
        self.view.is_some() || self.redirect.is_some()
    }
}
