pub mod check_token;
pub mod error;
pub mod gate;
pub mod notifier;
pub mod resolver;
pub mod session;
pub mod source;
pub mod view;

pub use check_token::CheckToken;
pub use error::{DirectoryError, MembershipError};
pub use gate::{AccessGate, GateServices, tenant_cache_key};
pub use notifier::{LogNotifier, Notifier};
pub use resolver::{MembershipResolver, membership_cache_key, roles_cache_key};
pub use session::{ResolutionKey, Session};
pub use source::{MembershipSource, PageDirectory, PageSummary, TenantDirectory};
pub use view::{
    AccessDecision, AccessGrant, DenialKind, DenialView, GateStatus, GateView, login_path,
};

#[cfg(test)]
mod tests;
