//! Session State
//!
//! The resolver's current belief about the user: still loading, anonymous,
//! or identified with a role. The role is carried inside the `Identified`
//! variant, so "role present iff identified" holds by construction.

use crate::role::Role;

/// Current authentication state of the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// Resolution in progress; gates render a placeholder, never redirect.
    Loading,
    /// No authenticated principal, or the principal has no role record.
    Anonymous,
    /// Authenticated principal with a resolved role.
    Identified { user_id: String, role: Role },
}

impl Session {
    pub fn identified(user_id: impl Into<String>, role: Role) -> Self {
        Self::Identified {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Session::Loading)
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Session::Anonymous)
    }

    pub fn is_identified(&self) -> bool {
        matches!(self, Session::Identified { .. })
    }

    /// Role of the identified session, if any.
    pub fn role(&self) -> Option<Role> {
        match self {
            Session::Identified { role, .. } => Some(*role),
            _ => None,
        }
    }

    /// Principal id of the identified session, if any.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Session::Identified { user_id, .. } => Some(user_id),
            _ => None,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::Loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_loading() {
        assert!(Session::default().is_loading());
    }

    #[test]
    fn test_role_present_iff_identified() {
        assert_eq!(Session::Loading.role(), None);
        assert_eq!(Session::Anonymous.role(), None);
        assert_eq!(
            Session::identified("u-1", Role::Manager).role(),
            Some(Role::Manager)
        );
    }

    #[test]
    fn test_user_id_accessor() {
        let session = Session::identified("u-42", Role::Owner);
        assert_eq!(session.user_id(), Some("u-42"));
        assert_eq!(Session::Anonymous.user_id(), None);
    }
}
