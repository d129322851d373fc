use crate::response::{NO_MEMBERSHIP_MARKER, error_details, list_body, membership_body};
use crate::{ClientResult, endpoint, http_client};

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client as ReqwestClient, StatusCode};
use serde_json::Value;
use tg_auth::{Membership, Role, SessionToken};
use tg_gate::{MembershipError, MembershipSource};

pub const TENANT_SLUG_HEADER: &str = "X-Tenant-Slug";

const MY_MEMBERSHIP_PATH: &str = "/membership/my-membership";
const ROLES_PATH: &str = "/membership/roles";

/// Client for the membership API
pub struct MembershipClient {
    pub base_url: String,
    client: ReqwestClient,
}

impl MembershipClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - API URL (e.g., "http://localhost:8000")
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: http_client(timeout)?,
        })
    }

    /// GET `path` with the bearer token and tenant header
    async fn get(
        &self,
        path: &str,
        token: &SessionToken,
        tenant_slug: &str,
        query: &[(&str, &str)],
    ) -> Result<(StatusCode, String), MembershipError> {
        let mut url = endpoint(&self.base_url, path)
            .map_err(|e| MembershipError::network(e.to_string()))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", token.as_str()))
            .header(TENANT_SLUG_HEADER, tenant_slug)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| MembershipError::network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MembershipError::network(e.to_string()))?;
        Ok((status, body))
    }
}

#[async_trait]
impl MembershipSource for MembershipClient {
    async fn my_membership(
        &self,
        token: &SessionToken,
        tenant_slug: &str,
    ) -> Result<Option<Membership>, MembershipError> {
        let (status, body) = self
            .get(MY_MEMBERSHIP_PATH, token, tenant_slug, &[("tenant", tenant_slug)])
            .await?;

        if status == StatusCode::NOT_FOUND || body.contains(NO_MEMBERSHIP_MARKER) {
            debug!("No membership for tenant {tenant_slug}");
            return Ok(None);
        }

        if !status.is_success() {
            let (code, message) = error_details(&body);
            return Err(MembershipError::api(status.as_u16(), code, message));
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| MembershipError::malformed(format!("membership body: {e}")))?;

        match membership_body(value) {
            Some(inner) => serde_json::from_value(inner)
                .map(Some)
                .map_err(|e| MembershipError::malformed(format!("membership: {e}"))),
            None => Ok(None),
        }
    }

    async fn list_roles(
        &self,
        token: &SessionToken,
        tenant_slug: &str,
    ) -> Result<Vec<Role>, MembershipError> {
        let (status, body) = self.get(ROLES_PATH, token, tenant_slug, &[]).await?;

        if !status.is_success() {
            let (code, message) = error_details(&body);
            return Err(MembershipError::api(status.as_u16(), code, message));
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| MembershipError::malformed(format!("roles body: {e}")))?;

        // Roles that fail to parse are skipped rather than failing the listing
        let roles = list_body(value)
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<Role>(item) {
                Ok(role) => Some(role),
                Err(e) => {
                    warn!("Skipping malformed role for {tenant_slug}: {e}");
                    None
                }
            })
            .collect();
        Ok(roles)
    }
}
