use crate::{AuthError, MembershipClaims, Result as AuthErrorResult, TokenClaims, UserInfo};

use std::panic::Location;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use error_location::ErrorLocation;
use log::debug;

/// Decode the payload segment of a token without verifying its signature.
///
/// Signature verification belongs to the server that consumes the bearer
/// token; this only reads claims for routing decisions.
#[track_caller]
pub fn decode_payload(token: &str) -> AuthErrorResult<TokenClaims> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(AuthError::MalformedToken {
            segments: segments.len(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    // Accept both base64 alphabets, padded or not
    let normalized: String = segments[1]
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let bytes = URL_SAFE_NO_PAD
        .decode(normalized.as_bytes())
        .map_err(|e| AuthError::PayloadEncoding {
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

    serde_json::from_slice(&bytes).map_err(|e| AuthError::PayloadJson {
        source: e,
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Decode claims, returning `None` for anything malformed.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    match decode_payload(token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            debug!("Token claims unreadable ({}): {}", e.error_code(), e);
            None
        }
    }
}

/// Tenant/role identifiers carried by the token (fast path input).
pub fn read_membership_claims(token: &str) -> MembershipClaims {
    decode_claims(token)
        .map(|claims| claims.membership())
        .unwrap_or_default()
}

pub fn extract_user_info(token: &str) -> UserInfo {
    decode_claims(token)
        .map(|claims| claims.user_info())
        .unwrap_or_default()
}

/// Missing or unreadable `exp` counts as expired.
pub fn is_token_expired(token: &str, now_unix: i64) -> bool {
    match decode_claims(token).and_then(|claims| claims.exp) {
        Some(exp) => exp < now_unix,
        None => true,
    }
}
