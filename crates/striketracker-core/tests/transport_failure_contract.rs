//! Contract Test: Transport Failures
//!
//! Constraints verified:
//! - A failed or timed-out remote call reaches the caller unchanged
//! - Every remote call is attempted exactly once, nothing is retried
//! - A create that fails after the object exists removes the object again
//! - A failed cleanup still reports the error that aborted the create

mod common;

use std::time::Duration;

use common::*;
use serde_json::json;
use striketracker_core::{Error, Operation, ProviderRequest, StrikeTrackerProvider};

async fn host(provider: &StrikeTrackerProvider) -> String {
    let created = provider
        .dispatch(ProviderRequest::with_state(
            "striketracker_host",
            Operation::Create,
            json!({ "account_hash": "acct", "name": "www" }),
        ))
        .await
        .unwrap();
    created.state.unwrap()["id"].as_str().unwrap().to_string()
}

async fn origin(provider: &StrikeTrackerProvider) -> serde_json::Value {
    provider
        .dispatch(ProviderRequest::with_state(
            "striketracker_origin",
            Operation::Create,
            json!({ "account_hash": "acct", "name": "web", "hostname": "o.example.com" }),
        ))
        .await
        .unwrap()
        .state
        .unwrap()
}

fn scope() -> serde_json::Value {
    json!({ "name": "images", "path": "/images" })
}

#[tokio::test]
async fn failed_configuration_update_removes_new_scope() {
    let (provider, api) = provider();
    let host_hash = host(&provider).await;
    let scopes_before = api.scope_ids(&host_hash);
    api.fail("update_configuration");

    let err = provider
        .dispatch(ProviderRequest::with_state(
            "striketracker_configuration",
            Operation::Create,
            json!({ "account_hash": "acct", "host_hash": host_hash, "scope": scope() }),
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(_)), "{err}");
    assert_eq!(api.scope_ids(&host_hash), scopes_before, "no scope left behind");
    assert_eq!(api.calls_to("create_scope"), 1);
    assert_eq!(api.calls_to("update_configuration"), 1);
    assert_eq!(api.calls_to("delete_scope"), 1);
}

#[tokio::test]
async fn failed_cleanup_keeps_original_error() {
    let (provider, api) = provider();
    let host_hash = host(&provider).await;
    api.fail("update_configuration");
    api.fail("delete_scope");

    let err = provider
        .dispatch(ProviderRequest::with_state(
            "striketracker_configuration",
            Operation::Create,
            json!({ "account_hash": "acct", "host_hash": host_hash, "scope": scope() }),
        ))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "HTTP error: update_configuration: connection reset");
    assert_eq!(api.calls_to("delete_scope"), 1);
}

#[tokio::test]
async fn failed_read_back_removes_new_origin() {
    let (provider, api) = provider();
    api.fail("get_origin");

    let err = provider
        .dispatch(ProviderRequest::with_state(
            "striketracker_origin",
            Operation::Create,
            json!({ "account_hash": "acct", "name": "web", "hostname": "o.example.com" }),
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(_)), "{err}");
    assert_eq!(api.origin_count(), 0);
    assert_eq!(api.calls_to("delete_origin"), 1);
}

#[tokio::test]
async fn failed_read_back_removes_new_host() {
    let (provider, api) = provider();
    api.fail("get_host");

    let err = provider
        .dispatch(ProviderRequest::with_state(
            "striketracker_host",
            Operation::Create,
            json!({ "account_hash": "acct", "name": "www" }),
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(_)), "{err}");
    assert_eq!(api.host_count(), 0);
    assert_eq!(api.calls_to("delete_host"), 1);
}

#[tokio::test]
async fn failed_read_back_removes_new_certificate() {
    let (provider, api) = provider();
    api.fail("get_certificate");

    let err = provider
        .dispatch(ProviderRequest::with_state(
            "striketracker_certificate",
            Operation::Create,
            json!({ "account_hash": "acct", "certificate": "c", "key": "k" }),
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(_)), "{err}");
    assert_eq!(api.calls_to("get_certificate"), 1);
    assert_eq!(api.calls_to("delete_certificate"), 1);
}

#[tokio::test]
async fn transport_error_is_returned_once() {
    let (provider, api) = provider();
    let mut state = origin(&provider).await;
    let reads_before = api.calls_to("get_origin");
    api.fail("update_origin");

    state["port"] = json!(8080);
    let err = provider
        .dispatch(ProviderRequest::with_state(
            "striketracker_origin",
            Operation::Update,
            state,
        ))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "HTTP error: update_origin: connection reset");
    assert_eq!(api.calls_to("update_origin"), 1);
    assert_eq!(api.calls_to("get_origin"), reads_before, "no read after a failed write");
}

#[tokio::test(start_paused = true)]
async fn slow_call_times_out_after_request_timeout() {
    let (provider, api) = provider();
    let state = origin(&provider).await;
    let reads_before = api.calls_to("get_origin");
    api.stall("get_origin", Duration::from_secs(60));

    let err = provider
        .dispatch(ProviderRequest::with_state(
            "striketracker_origin",
            Operation::Read,
            state,
        ))
        .await
        .unwrap_err();

    match err {
        Error::Timeout { operation, after } => {
            assert_eq!(operation, "read striketracker_origin");
            assert_eq!(after, Duration::from_secs(8));
        }
        other => panic!("expected timeout, got {other}"),
    }
    assert_eq!(api.calls_to("get_origin"), reads_before + 1);
}

#[tokio::test(start_paused = true)]
async fn deadline_caps_the_cycle() {
    let (provider, api) = provider();
    let state = origin(&provider).await;
    api.stall("get_origin", Duration::from_secs(60));

    let mut request = ProviderRequest::with_state("striketracker_origin", Operation::Read, state);
    request.deadline_secs = Some(2);
    let err = provider.dispatch(request).await.unwrap_err();

    match err {
        Error::Timeout { after, .. } => assert!(after <= Duration::from_secs(2)),
        other => panic!("expected timeout, got {other}"),
    }
    // One read-back during create, one timed-out read
    assert_eq!(api.calls_to("get_origin"), 2);
}
