//! Session Resolver
//!
//! Owns the single authoritative [`Session`] value and keeps it current
//! against the identity provider and the role store. Gates observe the
//! session through [`SessionResolver::subscribe`]; only the resolver writes.
//!
//! Resolution is a two-step lookup (current principal, then that
//! principal's role). Each resolution claims a generation from a monotonic
//! counter and publishes its result only while that generation is still the
//! newest, so a stale in-flight lookup can never overwrite the session
//! produced by a later auth event.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::AccessError;
use crate::role::Role;
use crate::session::Session;

/// Authenticated principal as reported by the identity provider, before
/// role lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalRef {
    /// Backend user id
    pub id: String,
    /// Email address, when the provider reports one
    pub email: Option<String>,
}

impl PrincipalRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Auth lifecycle events emitted by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// Identity provider boundary: who is signed in right now.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn current_principal(&self) -> Result<Option<PrincipalRef>, AccessError>;
}

/// Role store boundary: one read of the user-role record.
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn role_for_principal(&self, user_id: &str) -> Result<Option<Role>, AccessError>;
}

/// Maintains the shared session and notifies subscribers on change.
pub struct SessionResolver {
    identity: Arc<dyn IdentityProvider>,
    roles: Arc<dyn RoleStore>,
    session_tx: watch::Sender<Session>,
    generation: AtomicU64,
}

impl SessionResolver {
    pub fn new(identity: Arc<dyn IdentityProvider>, roles: Arc<dyn RoleStore>) -> Self {
        let (session_tx, _) = watch::channel(Session::Loading);
        Self {
            identity,
            roles,
            session_tx,
            generation: AtomicU64::new(0),
        }
    }

    /// Subscribe to session changes. The receiver always holds the latest
    /// published session.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session_tx.subscribe()
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Session {
        self.session_tx.borrow().clone()
    }

    /// Initial resolution on application start.
    pub async fn initialize(&self) {
        self.resolve().await;
    }

    /// React to an auth lifecycle event from the identity provider.
    ///
    /// Sign-out resets the session to anonymous without any network round
    /// trip; the generation bump also invalidates any lookup still in
    /// flight. Sign-in and token refresh re-run the full resolution.
    pub async fn handle_auth_event(&self, event: AuthEvent) {
        match event {
            AuthEvent::SignedOut => {
                let generation = self.next_generation();
                debug!(generation, "auth event: signed out");
                self.publish_if_current(generation, Session::Anonymous);
            }
            AuthEvent::SignedIn | AuthEvent::TokenRefreshed => {
                debug!(?event, "auth event: re-resolving session");
                self.resolve().await;
            }
        }
    }

    async fn resolve(&self) {
        let generation = self.next_generation();
        self.publish_if_current(generation, Session::Loading);

        let principal = match self.identity.current_principal().await {
            Ok(principal) => principal,
            Err(error) => {
                warn!(%error, "identity lookup failed, treating session as anonymous");
                self.publish_if_current(generation, Session::Anonymous);
                return;
            }
        };

        let Some(principal) = principal else {
            self.publish_if_current(generation, Session::Anonymous);
            return;
        };

        match self.roles.role_for_principal(&principal.id).await {
            Ok(Some(role)) => {
                self.publish_if_current(
                    generation,
                    Session::Identified {
                        user_id: principal.id,
                        role,
                    },
                );
            }
            Ok(None) => {
                debug!(user_id = %principal.id, "no role record for principal");
                self.publish_if_current(generation, Session::Anonymous);
            }
            Err(error) => {
                // Transient backend failure degrades to anonymous rather
                // than crashing or assuming a role.
                warn!(user_id = %principal.id, %error, "role lookup failed, treating session as anonymous");
                self.publish_if_current(generation, Session::Anonymous);
            }
        }
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publish `session` unless a newer resolution has claimed a later
    /// generation in the meantime.
    fn publish_if_current(&self, generation: u64, session: Session) {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding stale session resolution");
            return;
        }
        self.session_tx.send_replace(session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Mutex;

    struct StubIdentity {
        principal: Mutex<Option<PrincipalRef>>,
        fail: bool,
    }

    impl StubIdentity {
        fn signed_in(id: &str) -> Self {
            Self {
                principal: Mutex::new(Some(PrincipalRef::new(id))),
                fail: false,
            }
        }

        fn signed_out() -> Self {
            Self {
                principal: Mutex::new(None),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                principal: Mutex::new(None),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl IdentityProvider for StubIdentity {
        async fn current_principal(&self) -> Result<Option<PrincipalRef>, AccessError> {
            if self.fail {
                return Err(AccessError::identity("connection refused"));
            }
            Ok(self.principal.lock().await.clone())
        }
    }

    struct StubRoles {
        role: Option<Role>,
        fail: bool,
    }

    #[async_trait]
    impl RoleStore for StubRoles {
        async fn role_for_principal(&self, _user_id: &str) -> Result<Option<Role>, AccessError> {
            if self.fail {
                return Err(AccessError::role_store("backend unavailable"));
            }
            Ok(self.role)
        }
    }

    fn resolver(identity: StubIdentity, roles: StubRoles) -> SessionResolver {
        SessionResolver::new(Arc::new(identity), Arc::new(roles))
    }

    #[tokio::test]
    async fn test_starts_loading() {
        let resolver = resolver(
            StubIdentity::signed_out(),
            StubRoles {
                role: None,
                fail: false,
            },
        );
        assert!(resolver.current().is_loading());
    }

    #[tokio::test]
    async fn test_initialize_identified() {
        let resolver = resolver(
            StubIdentity::signed_in("u-1"),
            StubRoles {
                role: Some(Role::Manager),
                fail: false,
            },
        );
        resolver.initialize().await;
        assert_eq!(resolver.current(), Session::identified("u-1", Role::Manager));
    }

    #[tokio::test]
    async fn test_initialize_anonymous_without_principal() {
        let resolver = resolver(
            StubIdentity::signed_out(),
            StubRoles {
                role: Some(Role::Owner),
                fail: false,
            },
        );
        resolver.initialize().await;
        assert!(resolver.current().is_anonymous());
    }

    #[tokio::test]
    async fn test_missing_role_record_is_anonymous() {
        let resolver = resolver(
            StubIdentity::signed_in("u-1"),
            StubRoles {
                role: None,
                fail: false,
            },
        );
        resolver.initialize().await;
        assert!(resolver.current().is_anonymous());
    }

    #[tokio::test]
    async fn test_identity_failure_is_anonymous() {
        let resolver = resolver(
            StubIdentity::failing(),
            StubRoles {
                role: Some(Role::Admin),
                fail: false,
            },
        );
        resolver.initialize().await;
        assert!(resolver.current().is_anonymous());
    }

    #[tokio::test]
    async fn test_role_fetch_failure_is_anonymous() {
        let resolver = resolver(
            StubIdentity::signed_in("u-1"),
            StubRoles {
                role: None,
                fail: true,
            },
        );
        resolver.initialize().await;
        assert!(resolver.current().is_anonymous());
    }

    #[tokio::test]
    async fn test_sign_out_resets_immediately() {
        let resolver = resolver(
            StubIdentity::signed_in("u-1"),
            StubRoles {
                role: Some(Role::Runner),
                fail: false,
            },
        );
        resolver.initialize().await;
        assert!(resolver.current().is_identified());

        resolver.handle_auth_event(AuthEvent::SignedOut).await;
        assert!(resolver.current().is_anonymous());
    }

    #[tokio::test]
    async fn test_subscribers_observe_transitions() {
        let resolver = resolver(
            StubIdentity::signed_in("u-1"),
            StubRoles {
                role: Some(Role::Owner),
                fail: false,
            },
        );
        let mut rx = resolver.subscribe();
        assert!(rx.borrow().is_loading());

        resolver.initialize().await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().role(), Some(Role::Owner));
    }
}
