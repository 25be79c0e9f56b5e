//! Route Table
//!
//! Static declaration of the shell's route groups and their guards,
//! validated at construction time. The shell builds its router from this
//! table; the catch-all path renders the not-found view and the legacy
//! dashboard path redirects to root.

use crate::error::AccessError;
use crate::gate::RouteGuardSpec;
use crate::role::Role;

pub const ROOT_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/auth";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";
pub const LEGACY_DASHBOARD_PATH: &str = "/dashboard";

/// One protected route and its guard.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub path: &'static str,
    pub guard: RouteGuardSpec,
}

/// The application's static route table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    protected: Vec<RouteEntry>,
    public: Vec<&'static str>,
    legacy_redirects: Vec<(&'static str, &'static str)>,
}

impl RouteTable {
    /// Build the dashboard route table. Fails if any guard is declared
    /// with an empty role set.
    pub fn standard() -> Result<Self, AccessError> {
        let owner = RouteGuardSpec::new([Role::Owner])?;
        let manager = RouteGuardSpec::new([Role::Manager])?;
        let runner = RouteGuardSpec::new([Role::Runner])?;
        let admin = RouteGuardSpec::new([Role::Admin])?;

        let mut protected = vec![RouteEntry {
            path: ROOT_PATH,
            guard: RouteGuardSpec::any_identified(),
        }];

        for path in [
            "/owner/dashboard",
            "/owner/properties",
            "/owner/financials",
            "/owner/documents",
            "/owner/communications",
        ] {
            protected.push(RouteEntry {
                path,
                guard: owner.clone(),
            });
        }

        for path in ["/manager/dashboard", "/manager/clients", "/manager/operations"] {
            protected.push(RouteEntry {
                path,
                guard: manager.clone(),
            });
        }

        for path in ["/runner/dashboard", "/runner/inspections"] {
            protected.push(RouteEntry {
                path,
                guard: runner.clone(),
            });
        }

        protected.push(RouteEntry {
            path: "/admin/dashboard",
            guard: admin,
        });

        Ok(Self {
            protected,
            public: vec![LOGIN_PATH, UNAUTHORIZED_PATH],
            legacy_redirects: vec![(LEGACY_DASHBOARD_PATH, ROOT_PATH)],
        })
    }

    pub fn protected(&self) -> &[RouteEntry] {
        &self.protected
    }

    pub fn public(&self) -> &[&'static str] {
        &self.public
    }

    pub fn legacy_redirects(&self) -> &[(&'static str, &'static str)] {
        &self.legacy_redirects
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public.contains(&path)
    }

    /// Guard declared for a protected path, if any.
    pub fn guard_for(&self, path: &str) -> Option<&RouteGuardSpec> {
        self.protected
            .iter()
            .find(|entry| entry.path == path)
            .map(|entry| &entry.guard)
    }
}
