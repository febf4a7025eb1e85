//! Waypoint Routes
//!
//! Maps request paths to views:
//! 1. Static segments match exactly
//! 2. `:name` segments capture one path segment
//! 3. `*name` captures the rest of the path (the catch-all)
//!
//! Tables are validated once at startup and are immutable afterwards.
//! Resolution is total: every table must contain a catch-all.

mod entry;
mod error;
mod location;
mod matched;
mod meta;
mod pattern;
mod table;
mod view;

pub use entry::RouteEntry;
pub use error::RouteError;
pub use location::Location;
pub use matched::{MatchedRoute, Params};
pub use meta::{AccessPolicy, RouteMeta};
pub use pattern::{PathPattern, Segment};
pub use table::RouteTable;
pub use view::{ViewCache, ViewHandle, ViewLoader, ViewLoading};

pub type Result<T> = std::result::Result<T, RouteError>;
