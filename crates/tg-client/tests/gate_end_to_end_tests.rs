//! Access gate wired to the HTTP collaborators, against wiremock servers

use tg_client::{MembershipClient, RestDirectory};
use tg_gate::{
    AccessGate, DenialKind, GateServices, GateView, LogNotifier, MembershipResolver, Session,
};

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tg_cache::SessionCache;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const TIMEOUT: Duration = Duration::from_secs(5);

/// Unsigned token without membership claims (header `{"alg":"none"}`, payload `{"sub":"u1"}`)
const BARE_TOKEN: &str = "eyJhbGciOiJub25lIn0.eyJzdWIiOiJ1MSJ9.sig";

fn gate(api: &MockServer, db: &MockServer) -> AccessGate {
    let cache = SessionCache::default();
    let membership = MembershipClient::new(&api.uri(), TIMEOUT).unwrap();
    let directory = Arc::new(RestDirectory::new(&db.uri(), Some("anon-key"), TIMEOUT).unwrap());

    AccessGate::new(GateServices {
        resolver: MembershipResolver::new(Arc::new(membership), cache.clone()),
        tenants: directory.clone(),
        pages: directory,
        notifier: Arc::new(LogNotifier),
        cache,
    })
}

async fn mount_tenant(db: &MockServer, slug: &str, tenant_id: &str) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/tenants"))
        .and(query_param("slug", format!("eq.{slug}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": tenant_id}])))
        .mount(db)
        .await;
}

#[tokio::test]
async fn test_slow_path_membership_grants_access_with_one_membership_request() {
    let api = MockServer::start().await;
    let db = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/membership/my-membership"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "membership": {"tenant_id": "T1", "role_id": "R1", "role_key": "editor"}
        })))
        .expect(1)
        .mount(&api)
        .await;
    Mock::given(method("GET"))
        .and(path("/membership/roles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": "R1", "key": "editor"}]
        })))
        .expect(1)
        .mount(&api)
        .await;
    mount_tenant(&db, "acme", "T1").await;

    let gate = gate(&api, &db);
    let session = Session::new("u1", BARE_TOKEN);

    let first = gate.evaluate(Some(&session), "acme").await;
    let second = gate.evaluate(Some(&session), "acme").await;

    assert!(first.is_allowed());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_no_membership_denial_offers_public_pages() {
    let api = MockServer::start().await;
    let db = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/membership/my-membership"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&api)
        .await;
    Mock::given(method("GET"))
        .and(path("/membership/roles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "RP", "key": "public"}
        ])))
        .mount(&api)
        .await;
    mount_tenant(&db, "acme", "T1").await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/pages"))
        .and(query_param("or", "(role.is.null,role.eq.RP)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "p1", "name": "Landing", "role": null}
        ])))
        .mount(&db)
        .await;

    let gate = gate(&api, &db);
    let view = gate
        .evaluate(Some(&Session::new("u1", BARE_TOKEN)), "acme")
        .await;

    let GateView::Denied(denial) = view else {
        panic!("expected denial, got {view:?}");
    };
    assert_eq!(denial.kind, DenialKind::NoMembership);
    assert_eq!(denial.public_pages.len(), 1);
    assert_eq!(denial.public_pages[0].name, "Landing");
    assert_eq!(denial.logout_path, "/app/acme/login");
}
