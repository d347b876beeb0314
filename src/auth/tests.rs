//! Tests for the auth module

use super::*;
use std::collections::HashMap;

fn build(auth: &AuthConfig) -> reqwest::Request {
    let client = reqwest::Client::new();
    auth.apply(client.post("https://example.com/")).build().unwrap()
}

#[test]
fn test_no_auth() {
    let built = build(&AuthConfig::None);
    assert!(built.headers().get("Authorization").is_none());
    assert!(AuthConfig::None.is_none());
}

#[test]
fn test_api_key_header() {
    let built = build(&AuthConfig::api_key_header("X-API-Key", "test-key-123"));
    assert_eq!(built.headers().get("X-API-Key").unwrap(), "test-key-123");
}

#[test]
fn test_api_key_header_with_prefix() {
    let auth = AuthConfig::ApiKey {
        location: Location::Header,
        header_name: None,
        query_param: None,
        prefix: Some("Token ".to_string()),
        value: "abc".to_string(),
    };
    let built = build(&auth);
    assert_eq!(built.headers().get("Authorization").unwrap(), "Token abc");
}

#[test]
fn test_api_key_query() {
    let auth = AuthConfig::ApiKey {
        location: Location::Query,
        header_name: None,
        query_param: Some("key".to_string()),
        prefix: None,
        value: "secret".to_string(),
    };
    let built = build(&auth);
    assert_eq!(built.url().query(), Some("key=secret"));
}

#[test]
fn test_bearer() {
    let built = build(&AuthConfig::bearer("tok"));
    assert_eq!(built.headers().get("Authorization").unwrap(), "Bearer tok");
}

#[test]
fn test_basic() {
    let auth = AuthConfig::Basic {
        username: "user".to_string(),
        password: "pass".to_string(),
    };
    let built = build(&auth);
    // base64("user:pass")
    assert_eq!(
        built.headers().get("Authorization").unwrap(),
        "Basic dXNlcjpwYXNz"
    );
}

#[test]
fn test_custom_headers() {
    let mut headers = HashMap::new();
    headers.insert("X-Amz-Security-Token".to_string(), "session".to_string());
    let built = build(&AuthConfig::CustomHeaders { headers });
    assert_eq!(
        built.headers().get("X-Amz-Security-Token").unwrap(),
        "session"
    );
}

#[test]
fn test_auth_config_deserialize() {
    let auth: AuthConfig =
        serde_json::from_str(r#"{"type": "bearer", "token": "abc"}"#).unwrap();
    assert_eq!(auth, AuthConfig::bearer("abc"));

    let auth: AuthConfig =
        serde_json::from_str(r#"{"type": "api_key", "header_name": "X-Key", "value": "v"}"#)
            .unwrap();
    assert_eq!(auth, AuthConfig::api_key_header("X-Key", "v"));

    let auth: AuthConfig = serde_json::from_str(r#"{"type": "none"}"#).unwrap();
    assert!(auth.is_none());
}
