use crate::endpoint;
use crate::response::{error_details, list_body, membership_body};

use serde_json::json;

#[test]
fn given_wrapped_membership_when_unwrapped_then_inner_object() {
    let inner = membership_body(json!({"membership": {"tenant_id": "T1", "role_id": "R1"}}));

    assert_eq!(inner, Some(json!({"tenant_id": "T1", "role_id": "R1"})));
}

#[test]
fn given_bare_membership_when_unwrapped_then_unchanged() {
    let body = json!({"tenant_id": "T1", "role_id": "R1"});

    assert_eq!(membership_body(body.clone()), Some(body));
}

#[test]
fn given_empty_or_null_membership_when_unwrapped_then_none() {
    assert_eq!(membership_body(json!(null)), None);
    assert_eq!(membership_body(json!({})), None);
    assert_eq!(membership_body(json!({"data": {}})), None);
}

#[test]
fn given_list_envelopes_when_unwrapped_then_items() {
    assert_eq!(list_body(json!([1, 2])).len(), 2);
    assert_eq!(list_body(json!({"results": [1]})).len(), 1);
    assert_eq!(list_body(json!({"data": [1, 2, 3]})).len(), 3);
    assert!(list_body(json!({"results": "nope"})).is_empty());
    assert!(list_body(json!("text")).is_empty());
}

#[test]
fn given_error_bodies_when_parsed_then_code_and_message() {
    assert_eq!(
        error_details(r#"{"error": {"code": "FORBIDDEN", "message": "nope"}}"#),
        ("FORBIDDEN".to_string(), "nope".to_string())
    );
    assert_eq!(
        error_details(r#"{"detail": "Not found."}"#),
        ("UNKNOWN".to_string(), "Not found.".to_string())
    );
    assert_eq!(
        error_details("Bad Gateway\n"),
        ("UNKNOWN".to_string(), "Bad Gateway".to_string())
    );
}

#[test]
fn given_base_with_trailing_slash_when_joined_then_single_slash() {
    let url = endpoint("http://localhost:8000/", "/membership/roles").unwrap();

    assert_eq!(url.as_str(), "http://localhost:8000/membership/roles");
}

#[test]
fn given_invalid_base_when_joined_then_error() {
    assert!(endpoint("not a url", "/membership/roles").is_err());
}
