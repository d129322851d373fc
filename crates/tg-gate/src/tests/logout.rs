use crate::tests::{
    FakeDirectory, FakeMembership, Harness, MembershipReply, role, session_without_claims,
};
use crate::{GateStatus, GateView};

use std::sync::Arc;
use std::time::Duration;

use tg_auth::Membership;
use tokio::time::sleep;

fn allowed_harness(delay: Duration) -> Harness {
    Harness::new(
        FakeMembership::new(
            MembershipReply::Found(Membership {
                tenant_id: "T1".to_string(),
                role_id: "R1".to_string(),
                role_key: None,
            }),
            vec![role("R1", "editor")],
        )
        .with_delay(delay),
        FakeDirectory::with_tenant("acme", "T1"),
    )
}

#[tokio::test]
async fn given_allowed_session_when_logout_then_cache_cleared_and_redirected() {
    // Given
    let harness = allowed_harness(Duration::ZERO);
    let session = session_without_claims();
    assert!(harness.gate.evaluate(Some(&session), "acme").await.is_allowed());
    harness.cache.set("unrelated:key", 1_u8, Duration::from_secs(60));

    // When
    let redirect = harness.gate.logout();

    // Then
    assert_eq!(
        redirect,
        Some(GateView::Redirect {
            to: "/app/acme/login".to_string()
        })
    );
    assert_eq!(harness.gate.status(), GateStatus::Unchecked);
    assert_eq!(harness.cache.len(), 1);
    assert!(harness.cache.contains("unrelated:key"));
}

#[tokio::test]
async fn given_logged_out_when_evaluated_again_then_membership_resolved_again() {
    let harness = allowed_harness(Duration::ZERO);
    let session = session_without_claims();

    harness.gate.evaluate(Some(&session), "acme").await;
    harness.gate.logout();
    harness.gate.evaluate(Some(&session), "acme").await;

    assert_eq!(harness.membership.membership_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn given_check_in_progress_when_logout_then_check_never_commits() {
    // Given
    let harness = allowed_harness(Duration::from_millis(100));
    let gate = Arc::clone(&harness.gate);
    let session = session_without_claims();
    let running = tokio::spawn(async move { gate.evaluate(Some(&session), "acme").await });
    sleep(Duration::from_millis(1)).await;
    assert_eq!(harness.gate.status(), GateStatus::Checking);

    // When
    harness.gate.logout();

    // Then
    assert_eq!(running.await.unwrap(), GateView::Checking);
    assert_eq!(harness.gate.status(), GateStatus::Unchecked);
    assert_eq!(harness.cache.pending_len(), 0);
}

#[test]
fn given_fresh_gate_when_logout_then_no_redirect() {
    let harness = allowed_harness(Duration::ZERO);

    assert_eq!(harness.gate.logout(), None);
}
