pub mod claim_reader;
pub mod claims;
pub mod error;
pub mod membership;
pub mod session_token;
pub mod tenant_context;

pub use claim_reader::{
    decode_claims, decode_payload, extract_user_info, is_token_expired, read_membership_claims,
};
pub use claims::{MembershipClaims, TokenClaims, UserData, UserInfo};
pub use error::{AuthError, Result};
pub use membership::{
    Membership, PUBLIC_ROLE_KEY, Role, deserialize_id, deserialize_optional_id,
};
pub use session_token::SessionToken;
pub use tenant_context::TenantContext;

#[cfg(test)]
mod tests;
