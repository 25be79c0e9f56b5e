//! Hosted Identity Adapter

pub mod hosted;

pub use hosted::{AuthUser, HostedIdentityProvider};
