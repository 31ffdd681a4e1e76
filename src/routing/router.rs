//! Route lookup and path rewriting.

use crate::routing::ServiceName;

/// One route: an inbound path prefix, the backend that owns it, and the
/// prefix the backend expects in its place.
#[derive(Debug, Clone)]
pub struct Route {
    pub prefix: &'static str,
    pub service: ServiceName,
    pub rewrite: &'static str,
}

impl Route {
    /// Replace the matched prefix with the backend-side prefix.
    ///
    /// A bare prefix hit maps to the backend root with a trailing slash
    /// (`/api/auth` → `/auth/`), everything else keeps its remainder
    /// (`/api/auth/login` → `/auth/login`).
    pub fn rewrite_path(&self, path: &str) -> String {
        let rest = &path[self.prefix.len()..];
        if rest.is_empty() {
            format!("{}/", self.rewrite)
        } else {
            format!("{}{}", self.rewrite, rest)
        }
    }
}

/// Ordered route table; first match wins.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// The gateway's route table.
    pub fn nexus_default() -> Self {
        Self {
            routes: vec![
                Route { prefix: "/api/auth", service: ServiceName::User, rewrite: "/auth" },
                Route { prefix: "/api/users", service: ServiceName::User, rewrite: "/users" },
                Route { prefix: "/api/projects", service: ServiceName::Content, rewrite: "/projects" },
                Route { prefix: "/api/tasks", service: ServiceName::Content, rewrite: "/tasks" },
                Route { prefix: "/api/comments", service: ServiceName::Content, rewrite: "/comments" },
                Route { prefix: "/api/notifications", service: ServiceName::Notification, rewrite: "/notifications" },
                Route { prefix: "/api/preferences", service: ServiceName::Notification, rewrite: "/preferences" },
                Route { prefix: "/api/webhooks", service: ServiceName::Notification, rewrite: "/webhooks" },
            ],
        }
    }

    /// Find the route owning `path`, if any.
    ///
    /// Matching is segment-aware: `/api/auth` matches `/api/auth` and
    /// `/api/auth/login` but not `/api/authx`.
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| {
            path.strip_prefix(route.prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}
