mod logout;

use crate::{
    AccessGate, DirectoryError, GateServices, MembershipError, MembershipResolver,
    MembershipSource, Notifier, PageDirectory, PageSummary, Session, TenantDirectory,
};

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};
use tg_auth::{Membership, Role, SessionToken};
use tg_cache::SessionCache;

/// Unsigned token with the given payload
pub(crate) fn token(payload: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}

pub(crate) fn session_with_claims(tenant_id: &str, role_id: &str) -> Session {
    Session::new(
        "u1",
        token(json!({"sub": "u1", "tenant_id": tenant_id, "role_id": role_id, "role_key": "owner"})),
    )
}

pub(crate) fn session_without_claims() -> Session {
    Session::new("u1", token(json!({"sub": "u1"})))
}

pub(crate) fn role(id: &str, key: &str) -> Role {
    Role {
        id: id.to_string(),
        key: Some(key.to_string()),
        name: None,
    }
}

pub(crate) enum MembershipReply {
    Found(Membership),
    Missing,
    Fail,
}

pub(crate) struct FakeMembership {
    pub reply: Mutex<MembershipReply>,
    pub roles: Mutex<Option<Vec<Role>>>,
    pub delay: Duration,
    pub membership_calls: AtomicUsize,
    pub role_calls: AtomicUsize,
}

impl FakeMembership {
    pub(crate) fn new(reply: MembershipReply, roles: Vec<Role>) -> Self {
        Self {
            reply: Mutex::new(reply),
            roles: Mutex::new(Some(roles)),
            delay: Duration::ZERO,
            membership_calls: AtomicUsize::new(0),
            role_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn membership_calls(&self) -> usize {
        self.membership_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MembershipSource for FakeMembership {
    async fn my_membership(
        &self,
        _token: &SessionToken,
        _tenant_slug: &str,
    ) -> Result<Option<Membership>, MembershipError> {
        self.membership_calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &*self.reply.lock().unwrap() {
            MembershipReply::Found(membership) => Ok(Some(membership.clone())),
            MembershipReply::Missing => Ok(None),
            MembershipReply::Fail => Err(MembershipError::network("connection refused")),
        }
    }

    async fn list_roles(
        &self,
        _token: &SessionToken,
        _tenant_slug: &str,
    ) -> Result<Vec<Role>, MembershipError> {
        self.role_calls.fetch_add(1, Ordering::SeqCst);
        match &*self.roles.lock().unwrap() {
            Some(roles) => Ok(roles.clone()),
            None => Err(MembershipError::api(500, "INTERNAL", "roles unavailable")),
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeDirectory {
    pub tenants: HashMap<String, String>,
    pub pages: Vec<PageSummary>,
    pub pages_fail: bool,
    pub tenant_calls: AtomicUsize,
    pub page_requests: Mutex<Vec<(String, Option<String>)>>,
}

impl FakeDirectory {
    pub(crate) fn with_tenant(slug: &str, tenant_id: &str) -> Self {
        let mut directory = Self::default();
        directory
            .tenants
            .insert(slug.to_string(), tenant_id.to_string());
        directory
    }
}

#[async_trait]
impl TenantDirectory for FakeDirectory {
    async fn tenant_id_for_slug(
        &self,
        tenant_slug: &str,
    ) -> Result<Option<String>, DirectoryError> {
        self.tenant_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tenants.get(tenant_slug).cloned())
    }
}

#[async_trait]
impl PageDirectory for FakeDirectory {
    async fn visible_pages(
        &self,
        tenant_id: &str,
        role_id: Option<&str>,
    ) -> Result<Vec<PageSummary>, DirectoryError> {
        self.page_requests
            .lock()
            .unwrap()
            .push((tenant_id.to_string(), role_id.map(str::to_string)));
        if self.pages_fail {
            return Err(DirectoryError::api(503, "pages unavailable"));
        }
        Ok(self.pages.clone())
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    pub messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify_error(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

pub(crate) struct Harness {
    pub gate: Arc<AccessGate>,
    pub membership: Arc<FakeMembership>,
    pub directory: Arc<FakeDirectory>,
    pub notifier: Arc<RecordingNotifier>,
    pub cache: SessionCache,
}

impl Harness {
    pub(crate) fn new(membership: FakeMembership, directory: FakeDirectory) -> Self {
        let membership = Arc::new(membership);
        let directory = Arc::new(directory);
        let notifier = Arc::new(RecordingNotifier::default());
        let cache = SessionCache::default();

        let gate = AccessGate::new(GateServices {
            resolver: MembershipResolver::new(membership.clone(), cache.clone()),
            tenants: directory.clone(),
            pages: directory.clone(),
            notifier: notifier.clone(),
            cache: cache.clone(),
        });

        Self {
            gate: Arc::new(gate),
            membership,
            directory,
            notifier,
            cache,
        }
    }
}
