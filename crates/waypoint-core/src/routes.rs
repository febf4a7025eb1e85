//! Application route table

use waypoint_routes::RouteEntry;

pub const LOGIN_PATH: &str = "/auth/login";
pub const LANDING_PATH: &str = "/service/tracker";

/// Routes of the client. `MainLayout` wraps every service page and is
/// loaded up front; pages load on first visit.
pub fn app_routes() -> Vec<RouteEntry> {
    vec![
        RouteEntry::new("/auth")
            .requires_guest()
            .children(vec![RouteEntry::new("login").lazy("Login")]),
        RouteEntry::new("/service")
            .eager("MainLayout")
            .requires_auth()
            .children(vec![
                page("tracker", "Tracker", "Tracker"),
                page("collector", "Collector", "Collector"),
                page("startup", "Startup", "Startup"),
                page("reader", "Reader", "Reader"),
                page("transcription", "Transcription", "Transcription"),
                page("chat", "NewChat", "Chat"),
                // Replaced by the conversation name once it loads
                page("chat/:id", "Chat", "Loading..."),
                page("profile", "Profile", "Profile"),
            ]),
        RouteEntry::new("/").redirect(LOGIN_PATH),
        RouteEntry::new("/*pathMatch").lazy("NotFound"),
    ]
}

fn page(path: &str, component: &str, title: &str) -> RouteEntry {
    RouteEntry::new(path).lazy(component).title(title)
}
