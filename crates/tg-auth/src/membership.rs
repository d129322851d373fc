use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Key of the role granted to anonymous visitors of a tenant.
pub const PUBLIC_ROLE_KEY: &str = "public";

/// One user's relationship to one tenant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    #[serde(deserialize_with = "deserialize_id")]
    pub tenant_id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub role_id: String,
    #[serde(default)]
    pub role_key: Option<String>,
}

/// A role defined by a tenant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl Role {
    pub fn is_public(&self) -> bool {
        self.key.as_deref() == Some(PUBLIC_ROLE_KEY)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
    Other(IgnoredAny),
}

/// Identifiers arrive as strings (UUIDs) or integers (database keys).
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match RawId::deserialize(deserializer)? {
        RawId::Text(s) if !s.is_empty() => Ok(s),
        RawId::Text(_) => Err(serde::de::Error::custom("identifier cannot be empty")),
        RawId::Number(n) => Ok(n.to_string()),
        RawId::Other(_) => Err(serde::de::Error::custom(
            "identifier must be a string or an integer",
        )),
    }
}

/// Nullable identifier. Empty strings and values of any other type read as
/// `None`.
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(s)) if !s.is_empty() => Some(s),
        Some(RawId::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
