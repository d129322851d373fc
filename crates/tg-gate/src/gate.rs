use crate::view::login_path;
use crate::{
    AccessGrant, CheckToken, DenialKind, DenialView, DirectoryError, GateStatus, GateView,
    MembershipResolver, Notifier, PageDirectory, PageSummary, ResolutionKey, Session,
    TenantDirectory,
};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, error, info, warn};
use regex::Regex;
use tg_auth::{TenantContext, read_membership_claims};
use tg_cache::SessionCache;

/// Cache namespaces dropped on logout
const LOGOUT_PATTERNS: [&str; 3] = ["^session:", "^membership:", "^tenant:"];

pub fn tenant_cache_key(tenant_slug: &str) -> String {
    format!("tenant:slug:{tenant_slug}")
}

/// Collaborators the gate talks to
#[derive(Clone)]
pub struct GateServices {
    pub resolver: MembershipResolver,
    pub tenants: Arc<dyn TenantDirectory>,
    pub pages: Arc<dyn PageDirectory>,
    pub notifier: Arc<dyn Notifier>,
    pub cache: SessionCache,
}

struct GateState {
    status: GateStatus,
    key: Option<ResolutionKey>,
    generation: u64,
    view: Option<GateView>,
    check: Option<CheckToken>,
    last_slug: Option<String>,
}

impl Default for GateState {
    fn default() -> Self {
        Self {
            status: GateStatus::Unchecked,
            key: None,
            generation: 0,
            view: None,
            check: None,
            last_slug: None,
        }
    }
}

impl GateState {
    fn reset(&mut self) {
        if let Some(check) = self.check.take() {
            check.cancel();
        }
        self.status = GateStatus::Unchecked;
        self.key = None;
        self.view = None;
        self.generation += 1;
    }
}

/// Returns the gate to `Unchecked` if the evaluation that started this
/// generation goes away before committing, e.g. when its future is dropped.
struct PendingCheck<'a> {
    gate: &'a AccessGate,
    generation: u64,
}

impl Drop for PendingCheck<'_> {
    fn drop(&mut self) {
        let mut state = self.gate.lock();
        if state.status == GateStatus::Checking && state.generation == self.generation {
            debug!("Abandoned access check, resetting gate");
            state.reset();
        }
    }
}

struct Denial {
    kind: DenialKind,
    tenant_id: Option<String>,
}

impl Denial {
    fn new(kind: DenialKind) -> Self {
        Self {
            kind,
            tenant_id: None,
        }
    }

    fn for_tenant(kind: DenialKind, tenant_id: String) -> Self {
        Self {
            kind,
            tenant_id: Some(tenant_id),
        }
    }

    fn unexpected(cause: &dyn std::fmt::Display) -> Self {
        error!("Access check failed: {cause}");
        Self::new(DenialKind::Unexpected)
    }
}

/// Route gate in front of `/app/:tenantSlug/*`.
///
/// `unchecked -> checking -> {allowed | denied}`, tracked per resolution key.
/// Repeated evaluations for the same key reuse the terminal view or report
/// `Checking` while a check is running. A check that has been superseded by a
/// newer one never commits its result.
pub struct AccessGate {
    services: GateServices,
    state: Mutex<GateState>,
}

impl AccessGate {
    pub fn new(services: GateServices) -> Self {
        Self {
            services,
            state: Mutex::new(GateState::default()),
        }
    }

    pub fn status(&self) -> GateStatus {
        self.lock().status
    }

    pub async fn evaluate(&self, session: Option<&Session>, tenant_slug: &str) -> GateView {
        let Some(session) = session else {
            let mut state = self.lock();
            state.reset();
            state.last_slug = Some(tenant_slug.to_string());
            debug!("No session, redirecting to login for {tenant_slug}");
            return GateView::Redirect {
                to: login_path(tenant_slug),
            };
        };

        let key = ResolutionKey::new(&session.user_id, tenant_slug);
        let (generation, check) = {
            let mut state = self.lock();
            state.last_slug = Some(tenant_slug.to_string());

            if state.key.as_ref() == Some(&key) {
                match (state.status, &state.view) {
                    (GateStatus::Checking, _) => return GateView::Checking,
                    (GateStatus::Allowed | GateStatus::Denied, Some(view)) => return view.clone(),
                    _ => {}
                }
            }

            state.reset();
            let check = CheckToken::new();
            state.status = GateStatus::Checking;
            state.key = Some(key.clone());
            state.check = Some(check.clone());
            (state.generation, check)
        };

        debug!("Checking access for {}", key.as_str());
        let _pending = PendingCheck {
            gate: self,
            generation,
        };
        let view = tokio::select! {
            biased;
            _ = check.cancelled() => None,
            view = self.check(session, tenant_slug) => Some(view),
        };

        let Some(view) = view else {
            debug!("Access check for {} was cancelled", key.as_str());
            return GateView::Checking;
        };

        let mut state = self.lock();
        if state.status != GateStatus::Checking || state.generation != generation {
            drop(state);
            debug!("Dropping superseded access check for {}", key.as_str());
            return GateView::Checking;
        }

        state.status = if view.is_allowed() {
            GateStatus::Allowed
        } else {
            GateStatus::Denied
        };
        state.view = Some(view.clone());
        state.check = None;
        drop(state);
        view
    }

    /// Cancel any running check, forget the memoized decision and drop the
    /// session-scoped cache entries.
    ///
    /// Returns the login redirect for the last evaluated tenant.
    pub fn logout(&self) -> Option<GateView> {
        let last_slug = {
            let mut state = self.lock();
            state.reset();
            state.last_slug.take()
        };

        for pattern in LOGOUT_PATTERNS {
            match Regex::new(pattern) {
                Ok(regex) => self.services.cache.clear_pattern(&regex),
                Err(e) => warn!("Invalid cache pattern {pattern}: {e}"),
            }
        }
        info!("Logged out, session cache cleared");

        last_slug.map(|slug| GateView::Redirect {
            to: login_path(&slug),
        })
    }

    async fn check(&self, session: &Session, tenant_slug: &str) -> GateView {
        match self.admit(session, tenant_slug).await {
            Ok(grant) => {
                info!(
                    "Access granted to {} for tenant {} (role {})",
                    grant.user_id, tenant_slug, grant.role_id
                );
                GateView::Outlet(grant)
            }
            Err(denial) => GateView::Denied(self.deny(session, tenant_slug, denial).await),
        }
    }

    async fn admit(&self, session: &Session, tenant_slug: &str) -> Result<AccessGrant, Denial> {
        let claims = read_membership_claims(session.token.as_str());

        let context = if claims.is_complete() {
            debug!("Membership taken from token claims");
            TenantContext::from_claims(&session.user_id, claims)
                .map_err(|e| Denial::unexpected(&e))?
        } else {
            match self.services.resolver.resolve(session, tenant_slug).await {
                Ok(Some(membership)) => TenantContext::from_membership(&session.user_id, membership),
                Ok(None) => return Err(Denial::new(DenialKind::NoMembership)),
                Err(e) => return Err(Denial::unexpected(&e)),
            }
        };

        let tenant_id = match self.tenant_id(tenant_slug).await {
            Ok(Some(tenant_id)) => tenant_id,
            Ok(None) => return Err(Denial::new(DenialKind::TenantNotFound)),
            Err(e) => return Err(Denial::unexpected(&e)),
        };

        if tenant_id != context.tenant_id {
            warn!(
                "Tenant mismatch for {}: membership {} but {} resolves to {}",
                context.user_id, context.tenant_id, tenant_slug, tenant_id
            );
            return Err(Denial::for_tenant(DenialKind::TenantMismatch, tenant_id));
        }

        let roles = match self
            .services
            .resolver
            .roles(&session.token, tenant_slug)
            .await
        {
            Ok(roles) => roles,
            Err(e) => {
                let mut denial = Denial::unexpected(&e);
                denial.tenant_id = Some(tenant_id);
                return Err(denial);
            }
        };

        if !roles.iter().any(|role| role.id == context.role_id) {
            return Err(Denial::for_tenant(DenialKind::RoleNotPermitted, tenant_id));
        }

        Ok(context)
    }

    async fn deny(&self, session: &Session, tenant_slug: &str, denial: Denial) -> DenialView {
        let message = denial.kind.message();
        if denial.kind.notifies() {
            self.services.notifier.notify_error(message);
        } else {
            info!(
                "Access denied to {} for tenant {}: {}",
                session.user_id, tenant_slug, message
            );
        }

        let tenant_id = match denial.tenant_id {
            Some(tenant_id) => Some(tenant_id),
            None if denial.kind == DenialKind::TenantNotFound => None,
            None => self.tenant_id(tenant_slug).await.ok().flatten(),
        };
        let public_pages = match tenant_id {
            Some(tenant_id) => self.public_pages(session, tenant_slug, &tenant_id).await,
            None => Vec::new(),
        };

        DenialView {
            kind: denial.kind,
            message: message.to_string(),
            public_pages,
            logout_path: login_path(tenant_slug),
        }
    }

    async fn public_pages(
        &self,
        session: &Session,
        tenant_slug: &str,
        tenant_id: &str,
    ) -> Vec<PageSummary> {
        let public_role_id = match self
            .services
            .resolver
            .roles(&session.token, tenant_slug)
            .await
        {
            Ok(roles) => roles
                .iter()
                .find(|role| role.is_public())
                .map(|role| role.id.clone()),
            Err(e) => {
                warn!("No public role for {tenant_slug}: {e}");
                None
            }
        };

        match self
            .services
            .pages
            .visible_pages(tenant_id, public_role_id.as_deref())
            .await
        {
            Ok(pages) => pages,
            Err(e) => {
                warn!("Could not list public pages for {tenant_slug}: {e}");
                Vec::new()
            }
        }
    }

    async fn tenant_id(&self, tenant_slug: &str) -> Result<Option<String>, Arc<DirectoryError>> {
        let key = tenant_cache_key(tenant_slug);
        let ttl = self.services.cache.config().default_ttl;
        let tenants = Arc::clone(&self.services.tenants);
        let slug = tenant_slug.to_string();

        self.services
            .cache
            .get(&key, ttl, move || async move {
                tenants.tenant_id_for_slug(&slug).await
            })
            .await
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
