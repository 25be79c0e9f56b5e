//! Root Role Dispatch
//!
//! The root route does not render content of its own: once the session is
//! identified it forwards the user to the landing page configured for the
//! session's role. Unrecognized roles fall back to the login page rather
//! than any privileged default.

use std::collections::HashMap;

use crate::gate::{NavigationSurface, Redirect};
use crate::role::Role;
use crate::routes::LOGIN_PATH;
use crate::session::Session;

/// Mapping from role to default landing route, with a fallback for
/// anonymous or unresolved sessions.
#[derive(Debug, Clone)]
pub struct RoleLandingTable {
    landing: HashMap<Role, String>,
    fallback: String,
}

impl RoleLandingTable {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            landing: HashMap::new(),
            fallback: fallback.into(),
        }
    }

    pub fn with_landing(mut self, role: Role, path: impl Into<String>) -> Self {
        self.landing.insert(role, path.into());
        self
    }

    /// The application's landing table: one dashboard per role, login as
    /// the fallback.
    pub fn standard() -> Self {
        Self::new(LOGIN_PATH)
            .with_landing(Role::Owner, "/owner/dashboard")
            .with_landing(Role::Manager, "/manager/dashboard")
            .with_landing(Role::Runner, "/runner/dashboard")
            .with_landing(Role::Admin, "/admin/dashboard")
    }

    pub fn landing_for(&self, role: Role) -> Option<&str> {
        self.landing.get(&role).map(String::as_str)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

/// Outcome of one dispatch evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchDecision {
    /// Session still resolving; render a placeholder.
    Pending,
    /// Forward to the landing route (or login), replacing the history entry.
    Redirect(Redirect),
}

impl DispatchDecision {
    pub fn apply<N: NavigationSurface>(&self, nav: &N) -> N::Output {
        match self {
            DispatchDecision::Pending => nav.render_pending(),
            DispatchDecision::Redirect(redirect) => nav.redirect(&redirect.to, redirect.replace),
        }
    }
}

/// Route an identified session to its role's landing page.
///
/// Total over every session value. A role missing from the table fails
/// closed to the fallback, never to an arbitrary landing page.
pub fn dispatch(session: &Session, table: &RoleLandingTable) -> DispatchDecision {
    match session {
        Session::Loading => DispatchDecision::Pending,
        Session::Anonymous => DispatchDecision::Redirect(Redirect::replacing(table.fallback())),
        Session::Identified { role, .. } => match table.landing_for(*role) {
            Some(path) => DispatchDecision::Redirect(Redirect::replacing(path)),
            None => DispatchDecision::Redirect(Redirect::replacing(table.fallback())),
        },
    }
}
