use crate::{DirectoryError, MembershipError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tg_auth::{Membership, Role, SessionToken, deserialize_id, deserialize_optional_id};

/// Membership endpoint
#[async_trait]
pub trait MembershipSource: Send + Sync {
    /// The caller's membership in `tenant_slug`, or `None` when there is none yet.
    async fn my_membership(
        &self,
        token: &SessionToken,
        tenant_slug: &str,
    ) -> Result<Option<Membership>, MembershipError>;

    async fn list_roles(
        &self,
        token: &SessionToken,
        tenant_slug: &str,
    ) -> Result<Vec<Role>, MembershipError>;
}

/// Tenant lookup by slug
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    async fn tenant_id_for_slug(&self, tenant_slug: &str)
    -> Result<Option<String>, DirectoryError>;
}

/// Pages listing, used by the denial view
#[async_trait]
pub trait PageDirectory: Send + Sync {
    /// Pages of `tenant_id` open to everyone plus those restricted to `role_id`.
    async fn visible_pages(
        &self,
        tenant_id: &str,
        role_id: Option<&str>,
    ) -> Result<Vec<PageSummary>, DirectoryError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSummary {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub role: Option<String>,
}
