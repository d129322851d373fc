use crate::{MembershipError, MembershipSource, Session};

use std::sync::Arc;

use futures::join;
use log::{debug, info, warn};
use tg_auth::{Membership, Role, SessionToken};
use tg_cache::SessionCache;

pub fn membership_cache_key(user_id: &str, tenant_slug: &str) -> String {
    format!("membership:{user_id}:{tenant_slug}")
}

pub fn roles_cache_key(tenant_slug: &str) -> String {
    format!("session:roles:{tenant_slug}")
}

/// Slow path of the access check: asks the membership endpoint, once per
/// user and tenant for as long as the cache entry lives.
#[derive(Clone)]
pub struct MembershipResolver {
    source: Arc<dyn MembershipSource>,
    cache: SessionCache,
}

impl MembershipResolver {
    pub fn new(source: Arc<dyn MembershipSource>, cache: SessionCache) -> Self {
        Self { source, cache }
    }

    pub async fn resolve(
        &self,
        session: &Session,
        tenant_slug: &str,
    ) -> Result<Option<Membership>, Arc<MembershipError>> {
        let key = membership_cache_key(&session.user_id, tenant_slug);
        let ttl = self.cache.config().default_ttl;
        let source = Arc::clone(&self.source);
        let token = session.token.clone();
        let slug = tenant_slug.to_string();

        debug!("Resolving membership for {key}");
        self.cache
            .get(&key, ttl, move || async move {
                source.my_membership(&token, &slug).await
            })
            .await
    }

    /// Warm the cache at login: membership and roles are fetched in parallel.
    ///
    /// Failures are logged and left uncached, so the next access check asks
    /// again.
    pub async fn preload(&self, session: &Session, tenant_slug: &str) {
        debug!("Preloading session data for {tenant_slug}");
        let (membership, roles) = join!(
            self.resolve(session, tenant_slug),
            self.roles(&session.token, tenant_slug)
        );

        if let Err(e) = &membership {
            warn!("Failed to preload membership for {tenant_slug}: {e}");
        }
        if let Err(e) = &roles {
            warn!("Failed to preload roles for {tenant_slug}: {e}");
        }
        if membership.is_ok() && roles.is_ok() {
            info!("Session data preloaded for {tenant_slug}");
        }
    }

    /// Drop the cached membership and roles for this user and tenant.
    pub fn invalidate(&self, session: &Session, tenant_slug: &str) {
        self.cache
            .invalidate(&membership_cache_key(&session.user_id, tenant_slug));
        self.cache.invalidate(&roles_cache_key(tenant_slug));
        debug!("Invalidated session data for {tenant_slug}");
    }

    /// Force a re-fetch of everything `preload` caches.
    pub async fn refresh(&self, session: &Session, tenant_slug: &str) {
        self.invalidate(session, tenant_slug);
        self.preload(session, tenant_slug).await;
    }

    /// Roles defined by the tenant, cached for the session.
    pub async fn roles(
        &self,
        token: &SessionToken,
        tenant_slug: &str,
    ) -> Result<Arc<Vec<Role>>, Arc<MembershipError>> {
        let key = roles_cache_key(tenant_slug);
        let ttl = self.cache.config().session_ttl;
        let source = Arc::clone(&self.source);
        let token = token.clone();
        let slug = tenant_slug.to_string();

        self.cache
            .get(&key, ttl, move || async move {
                source.list_roles(&token, &slug).await.map(Arc::new)
            })
            .await
    }
}
