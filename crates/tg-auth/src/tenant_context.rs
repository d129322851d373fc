use crate::{AuthError, Membership, MembershipClaims, Result as AuthErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::Serialize;

/// Resolved tenant context for an admitted user.
/// Built either from token claims (fast path) or a membership lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantContext {
    pub user_id: String,
    pub tenant_id: String,
    pub role_id: String,
    pub role_key: Option<String>,
}

impl TenantContext {
    #[track_caller]
    pub fn from_claims(user_id: &str, claims: MembershipClaims) -> AuthErrorResult<Self> {
        let MembershipClaims {
            tenant_id,
            role_id,
            role_key,
        } = claims;

        let tenant_id = tenant_id.ok_or_else(|| AuthError::InvalidClaim {
            claim: "tenant_id".to_string(),
            message: "tenant_id is not present in token".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;
        let role_id = role_id.ok_or_else(|| AuthError::InvalidClaim {
            claim: "role_id".to_string(),
            message: "role_id is not present in token".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(Self {
            user_id: user_id.to_string(),
            tenant_id,
            role_id,
            role_key,
        })
    }

    pub fn from_membership(user_id: &str, membership: Membership) -> Self {
        Self {
            user_id: user_id.to_string(),
            tenant_id: membership.tenant_id,
            role_id: membership.role_id,
            role_key: membership.role_key,
        }
    }
}
