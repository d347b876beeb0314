//! Tests for list operations

use super::*;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig};
use crate::loader::{load_service, load_service_from_str};
use crate::pagination::{Cursor, ListRequest, PageFetcher, PagedRequest, PagingControls};
use crate::types::JsonValue;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> HttpClient {
    HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url(base_url)
            .max_retries(0)
            .no_rate_limit()
            .build(),
    )
    .unwrap()
}

fn request_at(cursor: Option<&str>, page_size: Option<usize>) -> ListRequest {
    let (mut request, _) = ListRequest::builder()
        .field("NamePrefix", "ops")
        .build()
        .unwrap();
    request.set_cursor(cursor.and_then(Cursor::new).as_ref());
    request.set_page_size(page_size);
    request
}

// ============================================================================
// Extraction Tests
// ============================================================================

#[test]
fn test_select_simple_paths() {
    let value = json!({"page": {"items": [{"id": 1}, {"id": 2}]}, "NextToken": "t"});

    assert_eq!(select(&value, "$.NextToken"), Some(&json!("t")));
    assert_eq!(select(&value, "NextToken"), Some(&json!("t")));
    assert_eq!(select(&value, "$.page.items[1].id"), Some(&json!(2)));
    assert_eq!(select(&value, "$"), Some(&value));
    assert_eq!(select(&value, "$.missing.deeper"), None);
    assert_eq!(select(&value, "$.page.items[9]"), None);
}

#[test]
fn test_extract_items() {
    let value = json!({"Results": [{"id": "a"}, {"id": "b"}]});
    assert_eq!(extract_items(&value, "$.Results").unwrap().len(), 2);

    // absent and null both mean an empty page
    assert!(extract_items(&json!({}), "$.Results").unwrap().is_empty());
    assert!(extract_items(&json!({"Results": null}), "$.Results")
        .unwrap()
        .is_empty());
}

#[test]
fn test_extract_items_rejects_non_array() {
    let err = extract_items(&json!({"Results": "nope"}), "$.Results").unwrap_err();
    match err {
        Error::ItemExtraction { path, message } => {
            assert_eq!(path, "$.Results");
            assert!(message.contains("string"));
        }
        other => panic!("Expected ItemExtraction error, got {other:?}"),
    }
}

#[test]
fn test_extract_items_with_wildcard() {
    let value = json!({"groups": [{"id": 1}, {"id": 2}, {"id": 3}]});
    let items = extract_items(&value, "$.groups[*]").unwrap();
    assert_eq!(items.len(), 3);
}

#[test]
fn test_extract_items_invalid_jsonpath() {
    let err = extract_items(&json!({"groups": []}), "$.groups[*").unwrap_err();
    match err {
        Error::JsonPath { message } => assert!(message.starts_with("Invalid JSONPath")),
        other => panic!("Expected JsonPath error, got {other:?}"),
    }
}

#[test]
fn test_extract_cursor() {
    assert_eq!(
        extract_cursor(&json!({"NextToken": "abc=="}), "$.NextToken"),
        Cursor::new("abc==")
    );
    assert_eq!(
        extract_cursor(&json!({"next": 42}), "$.next"),
        Cursor::new("42")
    );
    assert_eq!(extract_cursor(&json!({"NextToken": ""}), "$.NextToken"), None);
    assert_eq!(extract_cursor(&json!({"NextToken": null}), "$.NextToken"), None);
    assert_eq!(extract_cursor(&json!({}), "$.NextToken"), None);
}

// ============================================================================
// Operation Binding Tests
// ============================================================================

#[test]
fn test_unknown_operation() {
    let service = load_service("events").unwrap();
    let err = JsonListOperation::with_client(&service, "ListThings", test_client("http://localhost"))
        .unwrap_err();
    assert!(matches!(err, Error::OperationNotFound { .. }));
}

#[test]
fn test_new_resolves_regional_endpoint() {
    let service = load_service("events").unwrap();
    let config = ClientConfig::default().with_region(Some("eu-central-1".to_string()));

    let op = JsonListOperation::new(&service, "ListRules", &config).unwrap();
    assert_eq!(op.service(), "events");
    assert_eq!(op.definition().name, "ListRules");
}

#[test]
fn test_wire_fields_merge_defaults() {
    let yaml = r#"
name: widgets
operations:
  - name: ListWidgets
    items_path: Widgets
    defaults:
      Status: ACTIVE
      NamePrefix: default
"#;
    let service = load_service_from_str(yaml).unwrap();
    let op =
        JsonListOperation::with_client(&service, "ListWidgets", test_client("http://localhost"))
            .unwrap();

    let wire = op.wire_fields(&request_at(Some("tok"), Some(10)));
    assert_eq!(
        JsonValue::Object(wire),
        json!({"Status": "ACTIVE", "NamePrefix": "ops", "NextToken": "tok", "Limit": 10})
    );
}

// ============================================================================
// Fetch Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_page_posts_json_with_target() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("X-Amz-Target", "AWSEvents.ListRules"))
        .and(header("Content-Type", "application/x-amz-json-1.1"))
        .and(body_json(json!({"NamePrefix": "ops", "NextToken": "c1", "Limit": 50})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Rules": [{"Name": "a"}, {"Name": "b"}],
            "NextToken": "c2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = load_service("events").unwrap();
    let op = JsonListOperation::with_client(&service, "ListRules", test_client(&server.uri()))
        .unwrap();

    let page = op.fetch_page(&request_at(Some("c1"), Some(50))).await.unwrap();
    assert_eq!(page.items, vec![json!({"Name": "a"}), json!({"Name": "b"})]);
    assert_eq!(page.next_cursor, Cursor::new("c2"));
}

#[tokio::test]
async fn test_fetch_page_get_uses_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/widgets"))
        .and(query_param("NamePrefix", "ops"))
        .and(query_param("marker", "m1"))
        .and(query_param("max", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"widgets": [1, 2, 3]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let yaml = r#"
name: widgets
operations:
  - name: ListWidgets
    method: GET
    path: /v1/widgets
    items_path: $.data.widgets
    cursor_field: marker
    next_cursor_path: $.data.marker
    limit_field: max
"#;
    let service = load_service_from_str(yaml).unwrap();
    let op = JsonListOperation::with_client(&service, "ListWidgets", test_client(&server.uri()))
        .unwrap();

    let page = op.fetch_page(&request_at(Some("m1"), Some(5))).await.unwrap();
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.next_cursor, None);
}

#[tokio::test]
async fn test_fetch_page_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"__type":"ValidationException","message":"bad Limit"}"#),
        )
        .mount(&server)
        .await;

    let service = load_service("machinelearning").unwrap();
    let op = JsonListOperation::with_client(&service, "DescribeMLModels", test_client(&server.uri()))
        .unwrap();

    let err = op.fetch_page(&request_at(None, Some(100))).await.unwrap_err();
    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("ValidationException"));
        }
        other => panic!("Expected HttpStatus error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_page_invalid_json() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let service = load_service("machinelearning").unwrap();
    let op = JsonListOperation::with_client(&service, "DescribeMLModels", test_client(&server.uri()))
        .unwrap();

    let err = op.fetch_page(&request_at(None, None)).await.unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_paginator_over_operation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_json(json!({"NamePrefix": "ops", "Limit": 100})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Results": [{"MLModelId": "m-1"}],
            "NextToken": "n1"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_json(json!({"NamePrefix": "ops", "NextToken": "n1", "Limit": 100})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Results": [{"MLModelId": "m-2"}]
        })))
        .mount(&server)
        .await;

    let service = load_service("machinelearning").unwrap();
    let paginator =
        JsonListOperation::with_client(&service, "DescribeMLModels", test_client(&server.uri()))
            .unwrap()
            .into_paginator();

    let outcome = paginator
        .collect(request_at(None, None), PagingControls::new())
        .await
        .unwrap();

    assert_eq!(
        outcome.items,
        vec![json!({"MLModelId": "m-1"}), json!({"MLModelId": "m-2"})]
    );
    assert_eq!(outcome.pages_fetched, 2);
}
