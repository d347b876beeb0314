//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML service → paginated HTTP requests → items

use futures::{StreamExt, TryStreamExt};
use pagewalk::pagination::StopReason;
use pagewalk::{
    load_service, ClientConfig, Cursor, Error, JsonListOperation, ListRequest, Page,
    PagingControls,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_config(server: &MockServer) -> ClientConfig {
    ClientConfig::from_json_str(&format!(
        r#"{{
            "endpoint": "{}",
            "auth": {{"type": "bearer", "token": "test-token"}},
            "http": {{"max_retries": 0, "rate_limit": null}}
        }}"#,
        server.uri()
    ))
    .unwrap()
}

fn rules(range: std::ops::Range<usize>) -> Vec<Value> {
    range.map(|i| json!({"Name": format!("rule-{i}")})).collect()
}

async fn mount_page(server: &MockServer, request: Value, response: Value) {
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("X-Amz-Target", "AWSEvents.ListRules"))
        .and(body_json(request))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Auto-iteration
// ============================================================================

#[tokio::test]
async fn test_auto_iteration_follows_cursors() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        json!({"NamePrefix": "ops", "Limit": 100}),
        json!({"Rules": rules(0..100), "NextToken": "c1"}),
    )
    .await;
    mount_page(
        &server,
        json!({"NamePrefix": "ops", "Limit": 100, "NextToken": "c1"}),
        json!({"Rules": rules(100..200), "NextToken": "c2"}),
    )
    .await;
    mount_page(
        &server,
        json!({"NamePrefix": "ops", "Limit": 100, "NextToken": "c2"}),
        json!({"Rules": rules(200..240)}),
    )
    .await;

    let service = load_service("events").unwrap();
    let paginator = JsonListOperation::new(&service, "ListRules", &client_config(&server))
        .unwrap()
        .into_paginator();

    let (request, controls) = ListRequest::builder()
        .field("NamePrefix", "ops")
        .build()
        .unwrap();
    let outcome = paginator.collect(request, controls).await.unwrap();

    assert_eq!(outcome.items.len(), 240);
    assert_eq!(outcome.items[0]["Name"], "rule-0");
    assert_eq!(outcome.items[239]["Name"], "rule-239");
    assert_eq!(outcome.pages_fetched, 3);
    assert_eq!(outcome.next_cursor, None);
    assert_eq!(outcome.stop_reason, Some(StopReason::Exhausted));
}

#[tokio::test]
async fn test_emit_limit_shrinks_last_request() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        json!({"Limit": 100}),
        json!({"Rules": rules(0..100), "NextToken": "c1"}),
    )
    .await;
    mount_page(
        &server,
        json!({"Limit": 50, "NextToken": "c1"}),
        json!({"Rules": rules(100..150), "NextToken": "c2"}),
    )
    .await;

    let service = load_service("events").unwrap();
    let paginator = JsonListOperation::new(&service, "ListRules", &client_config(&server))
        .unwrap()
        .into_paginator();

    let (request, controls) = ListRequest::builder()
        .emit_limit(Some(150))
        .build()
        .unwrap();
    let outcome = paginator.collect(request, controls).await.unwrap();

    assert_eq!(outcome.items.len(), 150);
    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.next_cursor, Cursor::new("c2"));
    assert_eq!(outcome.stop_reason, Some(StopReason::EmitLimitReached));
}

// ============================================================================
// Manual paging
// ============================================================================

#[tokio::test]
async fn test_manual_resume_fetches_one_page() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        json!({"Limit": 100, "NextToken": "c_prev"}),
        json!({"Rules": rules(0..10), "NextToken": "c_next"}),
    )
    .await;

    let service = load_service("events").unwrap();
    let paginator = JsonListOperation::new(&service, "ListRules", &client_config(&server))
        .unwrap()
        .into_paginator();

    let (request, controls) = ListRequest::builder()
        .starting_cursor(Cursor::new("c_prev"))
        .build()
        .unwrap();
    let outcome = paginator.collect(request, controls).await.unwrap();

    assert_eq!(outcome.items.len(), 10);
    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(outcome.next_cursor, Cursor::new("c_next"));
    assert_eq!(outcome.stop_reason, Some(StopReason::Manual));
}

// ============================================================================
// Streaming & errors
// ============================================================================

#[tokio::test]
async fn test_items_stream_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("X-Amz-Target", "AmazonML_20141212.DescribeEvaluations"))
        .and(header("Authorization", "Bearer test-token"))
        .and(body_json(json!({"Limit": 100})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Results": [{"EvaluationId": "ev-1"}, {"EvaluationId": "ev-2"}],
            "NextToken": "n1"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(header("X-Amz-Target", "AmazonML_20141212.DescribeEvaluations"))
        .and(body_json(json!({"Limit": 100, "NextToken": "n1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Results": [{"EvaluationId": "ev-3"}]
        })))
        .mount(&server)
        .await;

    let service = load_service("machinelearning").unwrap();
    let paginator =
        JsonListOperation::new(&service, "DescribeEvaluations", &client_config(&server))
            .unwrap()
            .into_paginator();

    let (request, controls) = ListRequest::builder().build().unwrap();
    let ids: Vec<String> = paginator
        .items(request, controls)
        .map_ok(|item| item["EvaluationId"].as_str().unwrap_or_default().to_string())
        .try_collect()
        .await
        .unwrap();

    assert_eq!(ids, vec!["ev-1", "ev-2", "ev-3"]);
}

#[tokio::test]
async fn test_failure_mid_listing_keeps_earlier_pages() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        json!({"Limit": 100}),
        json!({"Rules": rules(0..100), "NextToken": "c1"}),
    )
    .await;
    Mock::given(method("POST"))
        .and(body_json(json!({"Limit": 100, "NextToken": "c1"})))
        .respond_with(ResponseTemplate::new(500).set_body_string("InternalException"))
        .expect(1)
        .mount(&server)
        .await;

    let service = load_service("events").unwrap();
    let paginator = JsonListOperation::new(&service, "ListRules", &client_config(&server))
        .unwrap()
        .into_paginator();

    let (request, _) = ListRequest::builder().build().unwrap();
    let results: Vec<pagewalk::Result<Page<Value>>> =
        paginator.pages(request, PagingControls::new()).collect().await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap().items.len(), 100);
    match &results[1] {
        Err(Error::PageFetch { page, source }) => {
            assert_eq!(*page, 2);
            assert!(matches!(**source, Error::HttpStatus { status: 500, .. }));
        }
        other => panic!("Expected PageFetch error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_operation_is_rejected_before_any_call() {
    let server = MockServer::start().await;
    let service = load_service("events").unwrap();

    let err = JsonListOperation::new(&service, "ListWidgets", &client_config(&server)).unwrap_err();
    assert!(matches!(err, Error::OperationNotFound { .. }));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
