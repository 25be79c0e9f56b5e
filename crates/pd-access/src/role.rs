//! Role Enumeration
//!
//! Closed set of dashboard roles. The backend schema stores the role as a
//! loosely-typed string; this enum is the only place those strings are
//! interpreted, and unknown values are rejected rather than passed through.

use serde::{Deserialize, Serialize};

/// Dashboard role. Exactly one role is assigned per identified session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Property owner - portfolio, financials, documents
    #[serde(rename = "property_owner")]
    Owner,
    /// Property manager - clients and operations
    #[serde(rename = "property_manager")]
    Manager,
    /// Field runner - inspections and task execution
    #[serde(rename = "property_runner")]
    Runner,
    /// Platform administrator
    #[serde(rename = "super_admin")]
    Admin,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Role; 4] = [Role::Owner, Role::Manager, Role::Runner, Role::Admin];

    /// Parse a backend role string. Returns `None` for unknown values so
    /// callers fail closed instead of guessing.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "property_owner" => Some(Role::Owner),
            "property_manager" => Some(Role::Manager),
            "property_runner" => Some(Role::Runner),
            "super_admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Backend wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "property_owner",
            Role::Manager => "property_manager",
            Role::Runner => "property_runner",
            Role::Admin => "super_admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
