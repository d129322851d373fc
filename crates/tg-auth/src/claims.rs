use crate::deserialize_optional_id;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Decoded session token payload.
///
/// Every field is optional and a field of an unexpected type reads as absent
/// without discarding the rest of the payload. Tokens issued before login-time enrichment carry
/// only the standard fields, older ones nest identifiers under `user_data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (identity provider user id)
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub sub: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub tenant_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub role_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub role_key: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,
    /// Expiration timestamp (Unix)
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub exp: Option<i64>,
    /// Issued at timestamp (Unix)
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub iat: Option<i64>,
    /// Legacy nested identifiers
    #[serde(
        default,
        deserialize_with = "deserialize_user_data",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_data: Option<UserData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub tenant_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub role_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub user_id: Option<String>,
}

/// Tenant/role identifiers embedded in a token, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MembershipClaims {
    pub tenant_id: Option<String>,
    pub role_id: Option<String>,
    pub role_key: Option<String>,
}

impl MembershipClaims {
    /// Both identifiers present: the membership lookup can be skipped.
    pub fn is_complete(&self) -> bool {
        self.tenant_id.is_some() && self.role_id.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    pub user_id: Option<String>,
    pub tenant_id: Option<String>,
    pub role_id: Option<String>,
    pub role_key: Option<String>,
}

impl TokenClaims {
    pub(crate) fn membership(&self) -> MembershipClaims {
        let nested = self.user_data.as_ref();

        MembershipClaims {
            tenant_id: present(&self.tenant_id)
                .or_else(|| nested.and_then(|data| present(&data.tenant_id))),
            role_id: present(&self.role_id)
                .or_else(|| nested.and_then(|data| present(&data.role_id))),
            role_key: present(&self.role_key),
        }
    }

    pub(crate) fn user_info(&self) -> UserInfo {
        let membership = self.membership();
        let nested = self.user_data.as_ref();

        UserInfo {
            user_id: present(&self.user_id)
                .or_else(|| present(&self.sub))
                .or_else(|| nested.and_then(|data| present(&data.user_id))),
            tenant_id: membership.tenant_id,
            role_id: membership.role_id,
            role_key: membership.role_key,
        }
    }
}

// Empty strings are treated the same as a missing claim
fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Whole(i64),
    Fractional(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Unix seconds as an integer, a float (truncated) or a numeric string.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawTimestamp>::deserialize(deserializer)? {
        Some(RawTimestamp::Whole(secs)) => Some(secs),
        Some(RawTimestamp::Fractional(secs)) if secs.is_finite() => Some(secs.trunc() as i64),
        Some(RawTimestamp::Text(text)) => text.trim().parse().ok(),
        _ => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserData {
    Object(UserData),
    Other(IgnoredAny),
}

fn deserialize_user_data<'de, D>(deserializer: D) -> Result<Option<UserData>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawUserData>::deserialize(deserializer)? {
        Some(RawUserData::Object(data)) => Some(data),
        _ => None,
    })
}
