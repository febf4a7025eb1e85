//! Navigation resolver
//!
//! Owns the route table, the access guard and the view cache. Every
//! navigation takes a ticket; when a newer navigation starts while an older
//! one is suspended on the session restore, the older one is abandoned
//! (last request wins).

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use waypoint_routes::{MatchedRoute, RouteTable, ViewCache, ViewLoader};
use waypoint_session::{Authenticator, CredentialStore, SessionState};
use waypoint_storage::Database;

use crate::config::Config;
use crate::error::CoreError;
use crate::guard::{AccessGuard, GuardDecision};
use crate::phase::{NavigationPhase, PhaseTracker};
use crate::routes::app_routes;
use crate::Result;

/// A committed navigation.
#[derive(Debug, Clone)]
pub struct Navigation<V> {
    pub route: MatchedRoute,
    /// Materialized views, outermost layout first
    pub views: Vec<Arc<V>>,
    /// The originally requested path when redirects were followed
    pub redirected_from: Option<String>,
    pub navigated_at: DateTime<Utc>,
}

impl<V> Navigation<V> {
    pub fn path(&self) -> &str {
        self.route.path()
    }

    pub fn title(&self) -> Option<&str> {
        self.route.title()
    }
}

#[derive(Debug, Clone)]
pub enum NavigationOutcome<V> {
    Completed(Navigation<V>),
    /// A newer navigation started before this one was decided
    Superseded { path: String },
}

impl<V> NavigationOutcome<V> {
    pub fn completed(self) -> Option<Navigation<V>> {
        match self {
            NavigationOutcome::Completed(navigation) => Some(navigation),
            NavigationOutcome::Superseded { .. } => None,
        }
    }

    pub fn is_superseded(&self) -> bool {
        matches!(self, NavigationOutcome::Superseded { .. })
    }
}

pub struct Navigator<L: ViewLoader> {
    table: Arc<RouteTable>,
    guard: Arc<AccessGuard>,
    views: Arc<ViewCache<L>>,
    current: Arc<RwLock<Option<MatchedRoute>>>,
    phase: Arc<PhaseTracker>,
    tickets: Arc<AtomicU64>,
    max_redirects: usize,
}

impl<L: ViewLoader> Navigator<L> {
    /// Build a navigator over an already validated table.
    ///
    /// Eager views are loaded here so a broken layout fails at startup.
    pub fn new(table: RouteTable, session: SessionState, loader: L, config: &Config) -> Result<Self> {
        config.validate()?;

        let views = ViewCache::new(loader);
        for handle in table.eager_views() {
            views.materialize(&handle)?;
        }

        let guard = AccessGuard::new(
            session,
            config.login_path.clone(),
            config.landing_path.clone(),
        );

        Ok(Self {
            table: Arc::new(table),
            guard: Arc::new(guard),
            views: Arc::new(views),
            current: Arc::new(RwLock::new(None)),
            phase: Arc::new(PhaseTracker::new()),
            tickets: Arc::new(AtomicU64::new(0)),
            max_redirects: config.max_redirects,
        })
    }

    /// Open the settings store from `config` and build the application navigator.
    pub fn open(config: &Config, authenticator: Arc<dyn Authenticator>, loader: L) -> Result<Self> {
        config.validate()?;

        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::open(&config.database_path)?;

        let credentials =
            CredentialStore::with_keys(db, &config.access_token_key, &config.refresh_token_key);
        let session = SessionState::new(credentials, authenticator);
        let table = RouteTable::new(app_routes())?;

        let navigator = Self::new(table, session, loader, config)?;
        tracing::info!(database = %config.database_path.display(), "Navigator ready");

        Ok(navigator)
    }

    pub fn resolve(&self, path: &str) -> MatchedRoute {
        self.table.resolve(path)
    }

    pub async fn guard(&self, to: &MatchedRoute, from: Option<&MatchedRoute>) -> GuardDecision {
        self.guard.check(to, from).await
    }

    pub fn session(&self) -> &SessionState {
        self.guard.session()
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// The last committed route
    pub fn current(&self) -> Option<MatchedRoute> {
        self.current.read().clone()
    }

    pub fn phase(&self) -> NavigationPhase {
        self.phase.current()
    }

    pub fn is_view_loaded(&self, component: &str) -> bool {
        self.views.is_loaded(component)
    }

    /// Navigate to `path`, following redirect entries and guard redirects.
    pub async fn navigate(&self, path: &str) -> Result<NavigationOutcome<L::View>> {
        let ticket = self.tickets.fetch_add(1, Ordering::SeqCst) + 1;
        self.phase.begin(ticket);

        let requested = path.to_string();
        let mut target = requested.clone();
        let mut redirects = 0usize;

        loop {
            let route = self.table.resolve(&target);

            if let Some(to) = route.redirect() {
                self.phase.advance(ticket, NavigationPhase::Redirecting);
                tracing::debug!(from = %route.path(), to = %to, "Following redirect entry");
                target = self.redirect(ticket, &requested, to, &mut redirects)?;
                continue;
            }

            self.phase.advance(ticket, NavigationPhase::GuardEvaluating);
            if self.guard.will_suspend() {
                self.phase.advance(ticket, NavigationPhase::Suspended);
            }

            let from = self.current();
            let decision = self.guard.check(&route, from.as_ref()).await;

            if self.tickets.load(Ordering::SeqCst) != ticket {
                tracing::debug!(path = %requested, ticket, "Navigation superseded");
                self.phase.advance(ticket, NavigationPhase::Idle);
                return Ok(NavigationOutcome::Superseded { path: requested });
            }

            match decision {
                GuardDecision::Redirect(to) => {
                    self.phase.advance(ticket, NavigationPhase::Redirecting);
                    tracing::info!(from = %route.path(), to = %to, "Guard redirected navigation");
                    target = self.redirect(ticket, &requested, &to, &mut redirects)?;
                }
                GuardDecision::Proceed => {
                    self.phase.advance(ticket, NavigationPhase::Proceeding);
                    return self.commit(ticket, route, requested, redirects);
                }
            }
        }
    }

    fn redirect(
        &self,
        ticket: u64,
        requested: &str,
        to: &str,
        redirects: &mut usize,
    ) -> Result<String> {
        *redirects += 1;
        if *redirects > self.max_redirects {
            self.phase.advance(ticket, NavigationPhase::Idle);
            tracing::warn!(path = %requested, limit = self.max_redirects, "Redirect limit reached");
            return Err(CoreError::RedirectLoop {
                path: requested.to_string(),
                limit: self.max_redirects,
            });
        }

        self.phase.advance(ticket, NavigationPhase::Resolving);
        Ok(to.to_string())
    }

    fn commit(
        &self,
        ticket: u64,
        route: MatchedRoute,
        requested: String,
        redirects: usize,
    ) -> Result<NavigationOutcome<L::View>> {
        let views = match self.views.materialize_chain(route.views()) {
            Ok(views) => views,
            Err(e) => {
                self.phase.advance(ticket, NavigationPhase::Idle);
                tracing::error!(path = %route.path(), error = %e, "Failed to load views");
                return Err(e.into());
            }
        };

        *self.current.write() = Some(route.clone());
        self.phase.advance(ticket, NavigationPhase::Idle);

        tracing::info!(
            path = %route.path(),
            pattern = %route.pattern(),
            redirects,
            "Navigated"
        );

        Ok(NavigationOutcome::Completed(Navigation {
            route,
            views,
            redirected_from: (redirects > 0).then_some(requested),
            navigated_at: Utc::now(),
        }))
    }
}

impl<L: ViewLoader> Clone for Navigator<L> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            guard: Arc::clone(&self.guard),
            views: Arc::clone(&self.views),
            current: Arc::clone(&self.current),
            phase: Arc::clone(&self.phase),
            tickets: Arc::clone(&self.tickets),
            max_redirects: self.max_redirects,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{session, signed_in, FakeAuthenticator, NamedViews};
    use std::path::PathBuf;
    use tokio::sync::Notify;
    use waypoint_routes::{RouteEntry, RouteError};

    fn config() -> Config {
        Config::new(PathBuf::from("/tmp/waypoint-test"))
    }

    fn navigator(session: SessionState) -> Navigator<NamedViews> {
        let table = RouteTable::new(app_routes()).unwrap();
        Navigator::new(table, session, NamedViews, &config()).unwrap()
    }

    fn view_names(navigation: &Navigation<String>) -> Vec<&str> {
        navigation.views.iter().map(|v| v.as_str()).collect()
    }

    #[tokio::test]
    async fn test_root_redirects_to_login() {
        let auth = FakeAuthenticator::accepting();
        let nav = navigator(session(None, &auth));

        let navigation = nav.navigate("/").await.unwrap().completed().unwrap();

        assert_eq!(navigation.path(), "/auth/login");
        assert_eq!(navigation.redirected_from.as_deref(), Some("/"));
        assert_eq!(view_names(&navigation), ["Login"]);
        assert_eq!(nav.phase(), NavigationPhase::Idle);
    }

    #[tokio::test]
    async fn test_chat_detail_signed_out() {
        let auth = FakeAuthenticator::accepting();
        let nav = navigator(session(None, &auth));

        let route = nav.resolve("/service/chat/42");
        assert_eq!(route.pattern(), "/service/chat/:id");
        assert_eq!(route.param("id"), Some("42"));

        let navigation = nav
            .navigate("/service/chat/42")
            .await
            .unwrap()
            .completed()
            .unwrap();

        assert_eq!(navigation.path(), "/auth/login");
        assert_eq!(navigation.redirected_from.as_deref(), Some("/service/chat/42"));
        assert!(!nav.is_view_loaded("Chat"));
    }

    #[tokio::test]
    async fn test_chat_detail_signed_in() {
        let auth = FakeAuthenticator::accepting();
        let session = session(None, &auth);
        signed_in(&session).await;
        let nav = navigator(session);

        let navigation = nav
            .navigate("/service/chat/42")
            .await
            .unwrap()
            .completed()
            .unwrap();

        assert_eq!(navigation.route.param("id"), Some("42"));
        assert_eq!(navigation.title(), Some("Loading..."));
        assert_eq!(view_names(&navigation), ["MainLayout", "Chat"]);
        assert!(navigation.redirected_from.is_none());
        assert_eq!(nav.current().unwrap().pattern(), "/service/chat/:id");
    }

    #[tokio::test]
    async fn test_persisted_credential_sends_login_to_landing() {
        let auth = FakeAuthenticator::accepting();
        let nav = navigator(session(Some("alice"), &auth));

        let navigation = nav.navigate("/auth/login").await.unwrap().completed().unwrap();
        assert_eq!(navigation.path(), "/service/tracker");
        assert_eq!(navigation.title(), Some("Tracker"));

        nav.navigate("/service/profile").await.unwrap();
        assert_eq!(auth.calls(), 1);
        assert!(nav.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_not_found_is_public() {
        let auth = FakeAuthenticator::accepting();
        let nav = navigator(session(None, &auth));

        let navigation = nav
            .navigate("/service/chat/42/extra")
            .await
            .unwrap()
            .completed()
            .unwrap();

        assert_eq!(navigation.route.pattern(), "/*pathMatch");
        assert_eq!(view_names(&navigation), ["NotFound"]);
    }

    #[tokio::test]
    async fn test_layout_loaded_eagerly() {
        let auth = FakeAuthenticator::accepting();
        let nav = navigator(session(None, &auth));

        assert!(nav.is_view_loaded("MainLayout"));
        assert!(!nav.is_view_loaded("Tracker"));
        assert!(!nav.is_view_loaded("Login"));
    }

    #[tokio::test]
    async fn test_redirect_loop_detected() {
        let auth = FakeAuthenticator::accepting();
        let table = RouteTable::new(vec![
            RouteEntry::new("/locked").lazy("Locked").requires_auth(),
            RouteEntry::new("/*pathMatch").lazy("NotFound"),
        ])
        .unwrap();
        let config = Config {
            login_path: "/locked".to_string(),
            max_redirects: 3,
            ..config()
        };
        let nav = Navigator::new(table, session(None, &auth), NamedViews, &config).unwrap();

        match nav.navigate("/locked").await {
            Err(CoreError::RedirectLoop { path, limit }) => {
                assert_eq!(path, "/locked");
                assert_eq!(limit, 3);
            }
            other => panic!("Expected redirect loop, got {:?}", other.map(|o| o.is_superseded())),
        }
        assert_eq!(nav.phase(), NavigationPhase::Idle);
        assert!(nav.current().is_none());
    }

    #[tokio::test]
    async fn test_view_failure_keeps_current_route() {
        let auth = FakeAuthenticator::accepting();
        let table = RouteTable::new(vec![
            RouteEntry::new("/home").lazy("Home"),
            RouteEntry::new("/broken").lazy("Broken"),
            RouteEntry::new("/*pathMatch").lazy("NotFound"),
        ])
        .unwrap();
        let nav = Navigator::new(table, session(None, &auth), NamedViews, &config()).unwrap();

        nav.navigate("/home").await.unwrap();
        let result = nav.navigate("/broken").await;

        assert!(matches!(
            result,
            Err(CoreError::Route(RouteError::ViewLoad { .. }))
        ));
        assert_eq!(nav.current().unwrap().path(), "/home");
        assert_eq!(nav.phase(), NavigationPhase::Idle);
    }

    #[tokio::test]
    async fn test_broken_layout_fails_at_startup() {
        let auth = FakeAuthenticator::accepting();
        let table = RouteTable::new(vec![
            RouteEntry::new("/app").eager("Broken"),
            RouteEntry::new("/*pathMatch").lazy("NotFound"),
        ])
        .unwrap();

        let result = Navigator::new(table, session(None, &auth), NamedViews, &config());
        assert!(matches!(result, Err(CoreError::Route(_))));
    }

    #[tokio::test]
    async fn test_overlapping_navigation_last_wins() {
        let gate = Arc::new(Notify::new());
        let auth = FakeAuthenticator::gated(gate.clone());
        let nav = navigator(session(Some("alice"), &auth));

        let first = nav.navigate("/service/tracker");
        let second = async {
            tokio::task::yield_now().await;
            assert_eq!(nav.phase(), NavigationPhase::Suspended);
            gate.notify_one();
            nav.navigate("/service/reader").await
        };

        let (first, second) = tokio::join!(first, second);

        assert!(first.unwrap().is_superseded());
        let navigation = second.unwrap().completed().unwrap();
        assert_eq!(navigation.path(), "/service/reader");
        assert_eq!(nav.current().unwrap().path(), "/service/reader");
        assert_eq!(auth.calls(), 1);
        assert!(!nav.is_view_loaded("Tracker"));
    }

    #[tokio::test]
    async fn test_open_creates_store() {
        let dir = std::env::temp_dir().join(format!(
            "waypoint-open-{}-{}",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let config = Config::new(dir.clone());
        let auth = FakeAuthenticator::accepting();

        let nav = Navigator::open(&config, auth.clone(), NamedViews).unwrap();
        assert!(config.database_path.exists());
        assert_eq!(nav.table().len(), 12);

        let navigation = nav.navigate("/").await.unwrap().completed().unwrap();
        assert_eq!(navigation.path(), "/auth/login");

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_open_rejects_shared_credential_key() {
        let dir = std::env::temp_dir().join(format!("waypoint-shared-key-{}", std::process::id()));
        let mut config = Config::new(dir);
        config.refresh_token_key = config.access_token_key.clone();

        let result = Navigator::open(&config, FakeAuthenticator::accepting(), NamedViews);

        assert!(matches!(result, Err(CoreError::Config(_))));
        assert!(!config.database_path.exists());
    }
}
