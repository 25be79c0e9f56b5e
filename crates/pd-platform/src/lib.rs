//! PropDeck Platform
//!
//! Everything around the access-control core:
//! - Hosted backend adapters (identity provider, role store) speaking the
//!   hosted auth and REST data APIs
//! - The dashboard shell: an axum router that mounts a gate on every
//!   protected route group and maps gate decisions onto HTTP responses
//!
//! ## Module Organization
//!
//! - `identity` - hosted auth adapter (sign-in, sign-out, current user)
//! - `roles` - hosted user-role lookup
//! - `shell` - router, navigation surface, views
//! - `shared` - error types

pub mod identity;
pub mod roles;
pub mod shared;
pub mod shell;

pub use identity::HostedIdentityProvider;
pub use roles::HostedRoleStore;
pub use shared::error::{PlatformError, Result};
pub use shell::{shell_router, ShellState};
