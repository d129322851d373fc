use crate::PageSummary;

use serde::Serialize;
use tg_auth::TenantContext;

pub const NO_MEMBERSHIP_MESSAGE: &str = "No membership found for this organization";
pub const TENANT_NOT_FOUND_MESSAGE: &str = "Organization not found";
pub const TENANT_MISMATCH_MESSAGE: &str = "User does not have access to this organization";
pub const ROLE_NOT_PERMITTED_MESSAGE: &str = "Your role is not permitted in this organization";
pub const UNEXPECTED_FAILURE_MESSAGE: &str = "Unable to verify access. Please try again.";

/// Context handed to the nested routes once access is granted
pub type AccessGrant = TenantContext;

/// Where the gate currently is for one resolution key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateStatus {
    Unchecked,
    Checking,
    Allowed,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// No membership yet. Expected for new users, so nobody is alerted.
    NoMembership,
    /// Network failure or malformed response
    Unexpected,
    TenantMismatch,
    TenantNotFound,
    RoleNotPermitted,
}

impl DenialKind {
    pub fn notifies(self) -> bool {
        matches!(self, DenialKind::Unexpected)
    }

    pub fn message(self) -> &'static str {
        match self {
            DenialKind::NoMembership => NO_MEMBERSHIP_MESSAGE,
            DenialKind::Unexpected => UNEXPECTED_FAILURE_MESSAGE,
            DenialKind::TenantMismatch => TENANT_MISMATCH_MESSAGE,
            DenialKind::TenantNotFound => TENANT_NOT_FOUND_MESSAGE,
            DenialKind::RoleNotPermitted => ROLE_NOT_PERMITTED_MESSAGE,
        }
    }
}

/// Fallback shown instead of the tenant's routes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DenialView {
    pub kind: DenialKind,
    pub message: String,
    pub public_pages: Vec<PageSummary>,
    pub logout_path: String,
}

/// What the route gate renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum GateView {
    Redirect { to: String },
    Checking,
    Outlet(AccessGrant),
    Denied(DenialView),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    pub allowed: bool,
    pub error_message: Option<String>,
}

impl GateView {
    /// `None` while a check is still running.
    pub fn decision(&self) -> Option<AccessDecision> {
        match self {
            GateView::Checking => None,
            GateView::Redirect { .. } => Some(AccessDecision {
                allowed: false,
                error_message: None,
            }),
            GateView::Outlet(_) => Some(AccessDecision {
                allowed: true,
                error_message: None,
            }),
            GateView::Denied(denial) => Some(AccessDecision {
                allowed: false,
                error_message: Some(denial.message.clone()),
            }),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, GateView::Outlet(_))
    }
}

pub fn login_path(tenant_slug: &str) -> String {
    format!("/app/{tenant_slug}/login")
}
