//! Access Gate
//!
//! Per-route enforcement: a pure evaluation from (session, guard spec) to a
//! gate decision. The decision is data; the caller maps it onto the
//! navigation surface, which keeps access logic unit-testable without a
//! rendering environment.

use crate::error::AccessError;
use crate::role::Role;
use crate::routes::LOGIN_PATH;
use crate::session::Session;

/// Static declaration of which roles may enter a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuardSpec {
    allowed_roles: Vec<Role>,
    redirect_to: String,
}

impl RouteGuardSpec {
    /// Build a guard for the given roles. An empty role set is a
    /// programming error and is rejected here, at construction time.
    pub fn new(allowed: impl IntoIterator<Item = Role>) -> Result<Self, AccessError> {
        let mut allowed_roles: Vec<Role> = Vec::new();
        for role in allowed {
            if !allowed_roles.contains(&role) {
                allowed_roles.push(role);
            }
        }
        if allowed_roles.is_empty() {
            return Err(AccessError::EmptyGuard);
        }
        Ok(Self {
            allowed_roles,
            redirect_to: crate::routes::UNAUTHORIZED_PATH.to_string(),
        })
    }

    /// Guard admitting any identified session, regardless of role.
    pub fn any_identified() -> Self {
        Self {
            allowed_roles: Role::ALL.to_vec(),
            redirect_to: crate::routes::UNAUTHORIZED_PATH.to_string(),
        }
    }

    /// Override the denied-case redirect target.
    pub fn with_redirect(mut self, to: impl Into<String>) -> Self {
        self.redirect_to = to.into();
        self
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles.contains(&role)
    }

    pub fn allowed_roles(&self) -> &[Role] {
        &self.allowed_roles
    }

    pub fn redirect_target(&self) -> &str {
        &self.redirect_to
    }
}

/// A navigation instruction produced by a denied gate or the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: String,
    /// Replace the current navigation entry instead of pushing, so
    /// back-navigation cannot re-enter the page without re-evaluation.
    pub replace: bool,
}

impl Redirect {
    pub fn replacing(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            replace: true,
        }
    }
}

/// Outcome of one gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Session carries an allowed role; render the protected content.
    Allow,
    /// Session still resolving; render a placeholder, perform no navigation.
    Pending,
    /// Session is anonymous or carries a disallowed role.
    Deny(Redirect),
}

impl GateDecision {
    /// Map the decision onto a navigation surface. Exactly one surface
    /// operation is invoked per evaluation.
    pub fn apply<N: NavigationSurface>(&self, nav: &N) -> N::Output {
        match self {
            GateDecision::Allow => nav.render_children(),
            GateDecision::Pending => nav.render_pending(),
            GateDecision::Deny(redirect) => nav.redirect(&redirect.to, redirect.replace),
        }
    }
}

/// The effectful side of routing, implemented by the shell.
pub trait NavigationSurface {
    type Output;

    fn redirect(&self, to: &str, replace: bool) -> Self::Output;
    fn render_children(&self) -> Self::Output;
    fn render_pending(&self) -> Self::Output;
}

/// Evaluate a guard against the current session.
///
/// Pure function of its inputs: deterministic and side-effect-free. A
/// loading session never redirects (that would flash a redirect on every
/// page load before the first resolution lands).
pub fn evaluate(session: &Session, spec: &RouteGuardSpec) -> GateDecision {
    match session {
        Session::Loading => GateDecision::Pending,
        Session::Anonymous => GateDecision::Deny(Redirect::replacing(LOGIN_PATH)),
        Session::Identified { role, .. } => {
            if spec.allows(*role) {
                GateDecision::Allow
            } else {
                GateDecision::Deny(Redirect::replacing(spec.redirect_target()))
            }
        }
    }
}
