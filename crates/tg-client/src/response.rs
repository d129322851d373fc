use serde_json::Value;

/// Marker the membership API puts in its error body when the user has not
/// joined the tenant yet.
pub(crate) const NO_MEMBERSHIP_MARKER: &str = "No TenantMembership found";

/// Unwrap `{"membership": ...}` or `{"data": ...}`.
/// `None` for `null` or an empty object.
pub(crate) fn membership_body(body: Value) -> Option<Value> {
    let inner = match body {
        Value::Object(mut map) => match map.remove("membership").or_else(|| map.remove("data")) {
            Some(inner) => inner,
            None => Value::Object(map),
        },
        other => other,
    };

    match &inner {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        _ => Some(inner),
    }
}

/// Accepts a bare array, `{"results": [...]}` or `{"data": [...]}`.
pub(crate) fn list_body(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results").or_else(|| map.remove("data")) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// `(code, message)` from the error shapes the API produces:
/// `{"error": {"code", "message"}}`, `{"detail": ...}` or `{"message": ...}`.
pub(crate) fn error_details(body: &str) -> (String, String) {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let field = |value: &Value, name: &str| value.get(name).and_then(Value::as_str).map(String::from);

    let Some(value) = parsed else {
        return (String::from("UNKNOWN"), body.trim().to_string());
    };

    if let Some(error) = value.get("error") {
        let code = field(error, "code").unwrap_or_else(|| String::from("UNKNOWN"));
        let message = field(error, "message")
            .or_else(|| error.as_str().map(String::from))
            .unwrap_or_else(|| String::from("Unknown error"));
        return (code, message);
    }

    let code = field(&value, "code").unwrap_or_else(|| String::from("UNKNOWN"));
    let message = field(&value, "detail")
        .or_else(|| field(&value, "message"))
        .unwrap_or_else(|| String::from("Unknown error"));
    (code, message)
}
