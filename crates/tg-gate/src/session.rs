use tg_auth::SessionToken;

/// An authenticated session as handed over by the identity layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub token: SessionToken,
}

impl Session {
    pub fn new(user_id: impl Into<String>, token: impl Into<SessionToken>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
        }
    }
}

/// Identity of one access check, compared field by field.
///
/// A session object that changes without changing this key does not trigger
/// a new resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolutionKey {
    user_id: String,
    tenant_slug: String,
    label: String,
}

impl ResolutionKey {
    pub fn new(user_id: &str, tenant_slug: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            tenant_slug: tenant_slug.to_string(),
            label: format!("{user_id}-{tenant_slug}"),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn tenant_slug(&self) -> &str {
        &self.tenant_slug
    }

    /// `<user_id>-<tenant_slug>`, for logs only. Distinct keys may share it.
    pub fn as_str(&self) -> &str {
        &self.label
    }
}
