//! PropDeck Access Control
//!
//! The role-based access-control core for the dashboard shell:
//! - Session resolution against an identity provider and a role store,
//!   with supersession of stale in-flight lookups
//! - Pure route-gate evaluation (allow / pending / deny-with-redirect)
//! - Role landing dispatch for the root route
//! - The validated static route table
//!
//! The crate owns decisions only. Rendering and navigation are performed by
//! the caller through the [`NavigationSurface`] boundary.

pub mod dispatch;
pub mod error;
pub mod gate;
pub mod resolver;
pub mod role;
pub mod routes;
pub mod session;

pub use dispatch::{dispatch, DispatchDecision, RoleLandingTable};
pub use error::AccessError;
pub use gate::{evaluate, GateDecision, NavigationSurface, Redirect, RouteGuardSpec};
pub use resolver::{AuthEvent, IdentityProvider, PrincipalRef, RoleStore, SessionResolver};
pub use role::Role;
pub use routes::{
    RouteEntry, RouteTable, LEGACY_DASHBOARD_PATH, LOGIN_PATH, ROOT_PATH, UNAUTHORIZED_PATH,
};
pub use session::Session;
