//! Hosted Auth Client
//!
//! Adapter over the hosted auth API: password-grant sign-in, sign-out, and
//! current-user lookup. Holds the issued token set and broadcasts auth
//! lifecycle events; the resolver consumes those events through the pump in
//! the shell binary.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use pd_access::{AccessError, AuthEvent, IdentityProvider, PrincipalRef};
use pd_config::BackendConfig;

use crate::shared::error::{PlatformError, Result};

/// Capacity of the auth-event channel; events are tiny and consumed
/// promptly by the resolver pump.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// User payload returned by the hosted auth API.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Token grant response.
#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct TokenSet {
    access_token: String,
    refresh_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl TokenSet {
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => at <= Utc::now(),
            None => false,
        }
    }
}

/// Client for the hosted auth service.
pub struct HostedIdentityProvider {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    token: RwLock<Option<TokenSet>>,
    events: broadcast::Sender<AuthEvent>,
}

impl HostedIdentityProvider {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| PlatformError::configuration(format!("HTTP client: {}", e)))?;

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            anon_key: config.anon_key.clone(),
            token: RwLock::new(None),
            events,
        })
    }

    /// Subscribe to auth lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    /// Whether a token set is currently held (expired or not).
    pub fn has_session(&self) -> bool {
        self.token.read().is_some()
    }

    /// Current access token, if one is held and unexpired.
    pub fn access_token(&self) -> Option<String> {
        let guard = self.token.read();
        match guard.as_ref() {
            Some(token) if !token.is_expired() => Some(token.access_token.clone()),
            _ => None,
        }
    }

    /// Password-grant sign-in. On success the token set is stored and a
    /// `SignedIn` event is broadcast.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<()> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Err(PlatformError::InvalidCredentials);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PlatformError::backend(status.as_u16(), message));
        }

        let grant: TokenResponse = response.json().await?;
        let expires_at = grant.expires_in.map(|secs| Utc::now() + Duration::seconds(secs));
        *self.token.write() = Some(TokenSet {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token,
            expires_at,
        });

        info!(email, "signed in against hosted auth");
        let _ = self.events.send(AuthEvent::SignedIn);
        Ok(())
    }

    /// Exchange the held refresh token for a fresh token set and broadcast
    /// `TokenRefreshed`. Returns `false` when no refresh token is held.
    pub async fn refresh(&self) -> Result<bool> {
        let refresh_token = {
            let guard = self.token.read();
            guard.as_ref().and_then(|t| t.refresh_token.clone())
        };
        let Some(refresh_token) = refresh_token else {
            return Ok(false);
        };

        let url = format!("{}/auth/v1/token?grant_type=refresh_token", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PlatformError::backend(status.as_u16(), message));
        }

        let grant: TokenResponse = response.json().await?;
        let expires_at = grant.expires_in.map(|secs| Utc::now() + Duration::seconds(secs));
        *self.token.write() = Some(TokenSet {
            access_token: grant.access_token,
            refresh_token: grant.refresh_token.or(Some(refresh_token)),
            expires_at,
        });

        debug!("access token refreshed");
        let _ = self.events.send(AuthEvent::TokenRefreshed);
        Ok(true)
    }

    /// Revoke the current token (best effort) and broadcast `SignedOut`.
    /// The local session ends even if revocation fails upstream.
    pub async fn sign_out(&self) -> Result<()> {
        let token = self.token.write().take();

        if let Some(token) = token {
            let url = format!("{}/auth/v1/logout", self.base_url);
            let result = self
                .http
                .post(&url)
                .header("apikey", &self.anon_key)
                .bearer_auth(&token.access_token)
                .send()
                .await;
            if let Err(error) = result {
                warn!(%error, "token revocation failed");
            }
        }

        info!("signed out");
        let _ = self.events.send(AuthEvent::SignedOut);
        Ok(())
    }

    async fn fetch_current_user(&self) -> Result<Option<AuthUser>> {
        let Some(access_token) = self.access_token() else {
            debug!("no usable access token, no current principal");
            return Ok(None);
        };

        let url = format!("{}/auth/v1/user", self.base_url);
        let response = self
            .http
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&access_token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!("hosted auth rejected the token, no current principal");
            return Ok(None);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PlatformError::backend(status.as_u16(), message));
        }

        let user: AuthUser = response.json().await?;
        Ok(Some(user))
    }
}

#[async_trait]
impl IdentityProvider for HostedIdentityProvider {
    async fn current_principal(&self) -> std::result::Result<Option<PrincipalRef>, AccessError> {
        let user = self
            .fetch_current_user()
            .await
            .map_err(|e| AccessError::identity(e.to_string()))?;

        Ok(user.map(|u| {
            let principal = PrincipalRef::new(u.id.to_string());
            match u.email {
                Some(email) => principal.with_email(email),
                None => principal,
            }
        }))
    }
}
