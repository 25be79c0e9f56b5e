//! Hosted User-Role Lookup
//!
//! Single read of the `user_roles` record through the hosted REST data
//! API. Role strings outside the known enumeration resolve to no role
//! (fail closed) rather than passing through.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use pd_access::{AccessError, Role, RoleStore};
use pd_config::BackendConfig;

use crate::identity::HostedIdentityProvider;
use crate::shared::error::{PlatformError, Result};

#[derive(Debug, Deserialize)]
struct UserRoleRow {
    role: String,
}

/// Client for the `user_roles` table.
pub struct HostedRoleStore {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    identity: Arc<HostedIdentityProvider>,
}

impl HostedRoleStore {
    pub fn new(config: &BackendConfig, identity: Arc<HostedIdentityProvider>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| PlatformError::configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            anon_key: config.anon_key.clone(),
            identity,
        })
    }

    async fn fetch_role(&self, user_id: &str) -> Result<Option<Role>> {
        let url = format!("{}/rest/v1/user_roles", self.base_url);
        let mut request = self
            .http
            .get(&url)
            .header("apikey", &self.anon_key)
            .query(&[("user_id", format!("eq.{}", user_id)), ("select", "role".to_string())]);

        // Row-level security scopes the read to the signed-in user.
        if let Some(token) = self.identity.access_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PlatformError::backend(status.as_u16(), message));
        }

        let rows: Vec<UserRoleRow> = response.json().await?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };

        match Role::parse(&row.role) {
            Some(role) => Ok(Some(role)),
            None => {
                warn!(user_id, value = %row.role, "unknown role value in user_roles, failing closed");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl RoleStore for HostedRoleStore {
    async fn role_for_principal(
        &self,
        user_id: &str,
    ) -> std::result::Result<Option<Role>, AccessError> {
        self.fetch_role(user_id)
            .await
            .map_err(|e| AccessError::role_store(e.to_string()))
    }
}
