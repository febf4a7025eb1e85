//! Route registration and resolution

use std::collections::HashMap;

use crate::entry::RouteEntry;
use crate::error::RouteError;
use crate::location::Location;
use crate::matched::{MatchedRoute, Params};
use crate::meta::RouteMeta;
use crate::pattern::{PathPattern, Segment};
use crate::view::ViewHandle;
use crate::Result;

#[derive(Debug, Clone)]
struct RouteRecord {
    pattern: PathPattern,
    meta: RouteMeta,
    views: Vec<ViewHandle>,
    redirect: Option<String>,
}

/// Immutable, validated route table.
///
/// Records are kept in match order: static segments before parameters
/// before catch-alls, declaration order among equals.
#[derive(Debug, Clone)]
pub struct RouteTable {
    records: Vec<RouteRecord>,
    fallback: usize,
}

impl RouteTable {
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self> {
        let mut records = Vec::new();
        for entry in &entries {
            flatten(entry, "", &RouteMeta::default(), &[], &mut records)?;
        }

        let mut shapes: HashMap<String, &str> = HashMap::new();
        for record in &records {
            if let Some(existing) = shapes.insert(record.pattern.shape(), record.pattern.as_str()) {
                return Err(RouteError::DuplicateRoute {
                    path: record.pattern.as_str().to_string(),
                    existing: existing.to_string(),
                });
            }
        }

        // Stable sort keeps declaration order among equally ranked records
        records.sort_by(|a, b| b.pattern.rank_key().cmp(&a.pattern.rank_key()));

        let fallback = records
            .iter()
            .position(|r| r.pattern.is_total())
            .ok_or(RouteError::MissingCatchAll)?;

        let table = Self { records, fallback };
        table.validate_redirects()?;

        tracing::info!(routes = table.records.len(), "Registered route table");

        Ok(table)
    }

    fn validate_redirects(&self) -> Result<()> {
        for record in &self.records {
            let Some(target) = &record.redirect else {
                continue;
            };

            if !target.starts_with('/') {
                return Err(RouteError::RelativeRedirect {
                    from: record.pattern.as_str().to_string(),
                    to: target.clone(),
                });
            }

            if self.resolve(target).redirect().is_some() {
                return Err(RouteError::RedirectChain {
                    from: record.pattern.as_str().to_string(),
                    to: target.clone(),
                });
            }
        }
        Ok(())
    }

    /// Match a path. Always succeeds; unknown paths land on the catch-all.
    pub fn resolve(&self, path: &str) -> MatchedRoute {
        self.resolve_location(Location::parse(path))
    }

    pub fn resolve_location(&self, location: Location) -> MatchedRoute {
        let found = self.records.iter().find_map(|record| {
            record
                .pattern
                .matches(location.segments())
                .map(|params| (record, params))
        });

        let (record, params) = match found {
            Some(found) => found,
            None => {
                // The total record matches everything; reached only if matching and totality disagree
                let record = &self.records[self.fallback];
                let mut params = Params::new();
                if let Some(Segment::CatchAll(name)) = record.pattern.segments().last() {
                    params.insert(name.clone(), location.segments().join("/"));
                }
                (record, params)
            }
        };

        tracing::trace!(path = %location.path(), pattern = %record.pattern.as_str(), "Resolved route");

        MatchedRoute::new(
            location,
            record.pattern.as_str().to_string(),
            params,
            record.meta.clone(),
            record.views.clone(),
            record.redirect.clone(),
        )
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Patterns in match order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.pattern.as_str())
    }

    /// Distinct eagerly loaded views, in match order
    pub fn eager_views(&self) -> Vec<ViewHandle> {
        let mut eager: Vec<ViewHandle> = Vec::new();
        for handle in self.records.iter().flat_map(|r| r.views.iter()) {
            if handle.is_eager() && !eager.contains(handle) {
                eager.push(handle.clone());
            }
        }
        eager
    }
}

fn flatten(
    entry: &RouteEntry,
    parent_path: &str,
    parent_meta: &RouteMeta,
    parent_views: &[ViewHandle],
    out: &mut Vec<RouteRecord>,
) -> Result<()> {
    let path = join_path(parent_path, entry.path());

    if !entry.is_matchable() && entry.child_entries().is_empty() {
        return Err(RouteError::EmptyRoute(path));
    }

    let meta = parent_meta.inherit(entry.route_meta());
    let mut views = parent_views.to_vec();
    if let Some(view) = entry.view_handle() {
        views.push(view.clone());
    }

    if entry.is_matchable() {
        out.push(RouteRecord {
            pattern: PathPattern::parse(&path)?,
            meta: meta.clone(),
            views: views.clone(),
            redirect: entry.redirect_target().map(str::to_string),
        });
    }

    for child in entry.child_entries() {
        flatten(child, &path, &meta, &views, out)?;
    }

    Ok(())
}

fn join_path(parent: &str, child: &str) -> String {
    if child.starts_with('/') || parent.is_empty() {
        return format!("/{}", child.trim_start_matches('/'));
    }
    if child.is_empty() {
        return parent.to_string();
    }
    format!("{}/{}", parent.trim_end_matches('/'), child)
}
