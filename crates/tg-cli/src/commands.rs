use crate::CliResult;

use std::sync::Arc;

use log::info;
use serde::Serialize;
use tg_auth::{
    MembershipClaims, TokenClaims, UserInfo, decode_claims, extract_user_info, is_token_expired,
    read_membership_claims,
};
use tg_cache::{CacheConfig, SessionCache};
use tg_client::{MembershipClient, RestDirectory};
use tg_config::Config;
use tg_gate::{
    AccessGate, GateServices, GateView, LogNotifier, MembershipResolver, Session, login_path,
};

pub const EXIT_ALLOWED: u8 = 0;
pub const EXIT_DENIED: u8 = 2;

/// Decoded view of a token, as printed by `tg claims`
#[derive(Debug, Serialize)]
pub struct ClaimsReport {
    pub claims: Option<TokenClaims>,
    pub membership: MembershipClaims,
    pub user: UserInfo,
    pub expired: bool,
    /// Whether the gate can skip the membership lookup for this token
    pub fast_path: bool,
}

pub fn claims_report(token: &str, now_unix: i64) -> ClaimsReport {
    let membership = read_membership_claims(token);
    ClaimsReport {
        claims: decode_claims(token),
        fast_path: membership.is_complete(),
        membership,
        user: extract_user_info(token),
        expired: is_token_expired(token, now_unix),
    }
}

/// Wire the gate to the configured membership API and directory.
pub fn build_gate(config: &Config) -> CliResult<AccessGate> {
    let timeout = config.api.timeout();
    let cache = SessionCache::new(CacheConfig::from(&config.cache));

    let membership = MembershipClient::new(&config.api.base_url, timeout)?;
    let directory = Arc::new(RestDirectory::new(
        config.directory.require_url()?,
        config.directory.api_key.as_deref(),
        timeout,
    )?);

    Ok(AccessGate::new(GateServices {
        resolver: MembershipResolver::new(Arc::new(membership), cache.clone()),
        tenants: directory.clone(),
        pages: directory,
        notifier: Arc::new(LogNotifier),
        cache,
    }))
}

/// Run one access check. Without a user id (flag or token) there is no
/// session and the check redirects to login.
pub async fn check(gate: &AccessGate, token: &str, user: Option<&str>, tenant: &str) -> GateView {
    let user_id = user
        .map(String::from)
        .or_else(|| extract_user_info(token).user_id);
    let session = user_id.map(|user_id| Session::new(user_id, token));

    let view = gate.evaluate(session.as_ref(), tenant).await;
    if let Some(decision) = view.decision() {
        info!(
            "Access to {tenant}: allowed={} {}",
            decision.allowed,
            decision.error_message.as_deref().unwrap_or("")
        );
    }
    view
}

pub fn logout_view(tenant: &str) -> GateView {
    GateView::Redirect {
        to: login_path(tenant),
    }
}

pub fn exit_code(view: &GateView) -> u8 {
    if view.is_allowed() {
        EXIT_ALLOWED
    } else {
        EXIT_DENIED
    }
}
