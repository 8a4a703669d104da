use shared::types::{Identity, Role};

use crate::guard::{GuardOutcome, RouteRequirement, evaluate};
use crate::session::Session;

pub const LOGIN_PATH: &str = "/login";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Route {
    pub path: String,
    pub title: String,
    /// `None` for public pages.
    pub requirement: Option<RouteRequirement>,
}

impl Route {
    pub fn is_public(&self) -> bool {
        self.requirement.is_none()
    }
}

/// Where a navigation attempt ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render { path: String },
    Suspend,
    Redirect { to: String, from: Option<String> },
    NotFound,
}

// ---------------------------------------------------------------------------
// RouteTable
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn public(mut self, path: &str, title: &str) -> Self {
        self.routes.push(Route {
            path: path.to_string(),
            title: title.to_string(),
            requirement: None,
        });
        self
    }

    pub fn protected(mut self, path: &str, title: &str, requirement: RouteRequirement) -> Self {
        self.routes.push(Route {
            path: path.to_string(),
            title: title.to_string(),
            requirement: Some(requirement),
        });
        self
    }

    /// The ad dashboard's pages.
    pub fn dashboard() -> Self {
        let advertiser = || RouteRequirement::only(Role::Advertiser);
        let viewer = || RouteRequirement::only(Role::Viewer);

        Self::new()
            // ── Public ───────────────────────────────────────────────────────
            .public("/", "Home")
            .public(LOGIN_PATH, "Login")
            .public("/signup", "Sign up")
            .public("/features", "Features")
            .public("/benefits", "Benefits")
            .public("/faq", "FAQ")
            .public(UNAUTHORIZED_PATH, "Unauthorized")
            // ── Admin ────────────────────────────────────────────────────────
            .protected(
                "/admin/*",
                "Admin dashboard",
                RouteRequirement::only(Role::Administrator),
            )
            // ── Advertiser ───────────────────────────────────────────────────
            .protected("/advertiser", "Advertiser dashboard", advertiser())
            .protected("/advertiser/create-ad", "Create ad", advertiser())
            .protected("/advertiser/campaigns", "Campaigns", advertiser())
            .protected("/advertiser/analytics", "Analytics", advertiser())
            .protected("/advertiser/targeting", "Targeting", advertiser())
            .protected("/advertiser/budget", "Budget", advertiser())
            // ── Viewer ───────────────────────────────────────────────────────
            .protected("/viewer", "Viewer dashboard", viewer())
            .protected("/viewer/my-ads", "My ads", viewer())
            .protected("/viewer/preferences", "Preferences", viewer())
            // ── Any signed-in user ───────────────────────────────────────────
            .protected("/settings", "Settings", RouteRequirement::any_authenticated())
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// First declared route matching `path`.
    pub fn find(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|r| path_matches(&r.path, path))
    }

    pub fn navigate(&self, path: &str, session: &Session) -> Navigation {
        let Some(route) = self.find(path) else {
            return Navigation::NotFound;
        };

        let clean = strip_query(path).to_string();
        let Some(requirement) = &route.requirement else {
            return Navigation::Render { path: clean };
        };

        match evaluate(session, requirement) {
            GuardOutcome::Suspend => Navigation::Suspend,
            GuardOutcome::RedirectToLogin => Navigation::Redirect {
                to: LOGIN_PATH.to_string(),
                from: Some(path.to_string()),
            },
            GuardOutcome::RedirectToUnauthorized => Navigation::Redirect {
                to: UNAUTHORIZED_PATH.to_string(),
                from: None,
            },
            GuardOutcome::Render => Navigation::Render { path: clean },
        }
    }
}

// ---------------------------------------------------------------------------
// Path matching
// ---------------------------------------------------------------------------

fn strip_query(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}

pub fn path_matches(route_path: &str, request_path: &str) -> bool {
    let clean = strip_query(request_path);

    if route_path == clean {
        return true;
    }

    // "/admin/*" matches "/admin" and everything below it.
    if let Some(prefix) = route_path.strip_suffix("/*") {
        return clean == prefix
            || clean
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'));
    }

    // Segment-by-segment matching for `:param` wildcards.
    let route_segs: Vec<&str> = route_path.split('/').collect();
    let path_segs: Vec<&str> = clean.split('/').collect();

    if route_segs.len() != path_segs.len() {
        return false;
    }

    route_segs
        .iter()
        .zip(path_segs.iter())
        .all(|(r, p)| (r.starts_with(':') && !p.is_empty()) || r == p)
}

/// Only same-origin absolute paths: `/x` but not `//host`, `/\host` or
/// `https://host`.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

/// Where to go after a successful login: the page the user was bounced
/// from, or their role's landing page.
pub fn post_login_destination(identity: &Identity, from: Option<&str>) -> String {
    match from.map(str::trim) {
        Some(path) if is_local_path(path) && strip_query(path) != LOGIN_PATH => path.to_string(),
        _ => identity.role().landing_path().to_string(),
    }
}
