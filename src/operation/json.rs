//! JSON-over-HTTP list operation
//!
//! Turns a declarative [`OperationDefinition`] into a [`PageFetcher`]: the
//! request fields go out as a JSON body (POST) or query string (GET), and
//! items and the next cursor are read back from the response by path.

use super::extract::{extract_cursor, extract_items};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::loader::{OperationDefinition, ServiceDefinition};
use crate::pagination::{
    Cursor, ListRequest, PageFetcher, PagedResponse, Paginator, PagingSettings,
};
use crate::types::{JsonObject, JsonValue, Method, StringMap};
use async_trait::async_trait;
use tracing::debug;

/// One parsed response page
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPage {
    /// Items found at the operation's items path
    pub items: Vec<JsonValue>,
    /// Cursor found at the operation's next-cursor path
    pub next_cursor: Option<Cursor>,
}

impl JsonPage {
    /// Read a page out of a response body
    pub fn from_value(value: &JsonValue, operation: &OperationDefinition) -> Result<Self> {
        Ok(Self {
            items: extract_items(value, &operation.items_path)?,
            next_cursor: extract_cursor(value, &operation.next_cursor_path),
        })
    }
}

impl PagedResponse for JsonPage {
    type Item = JsonValue;

    fn next_cursor(&self) -> Option<Cursor> {
        self.next_cursor.clone()
    }

    fn into_items(self) -> Vec<JsonValue> {
        self.items
    }
}

/// A list operation of a service, bound to an HTTP client
#[derive(Debug)]
pub struct JsonListOperation {
    service: String,
    operation: OperationDefinition,
    headers: StringMap,
    client: HttpClient,
}

impl JsonListOperation {
    /// Bind an operation using the client configuration
    pub fn new(service: &ServiceDefinition, operation: &str, config: &ClientConfig) -> Result<Self> {
        let endpoint = config.resolve_endpoint(&service.endpoint_prefix)?;
        let client = HttpClient::with_auth(config.http_client_config(endpoint), config.auth.clone())?;
        Self::with_client(service, operation, client)
    }

    /// Bind an operation to an existing client
    pub fn with_client(
        service: &ServiceDefinition,
        operation: &str,
        client: HttpClient,
    ) -> Result<Self> {
        let operation = service.operation(operation)?.clone();

        let mut headers = service.headers.clone();
        headers.insert("Content-Type".to_string(), service.content_type.clone());
        if let Some(target) = service.target_for(&operation) {
            headers.insert("X-Amz-Target".to_string(), target);
        }

        Ok(Self {
            service: service.name.clone(),
            operation,
            headers,
            client,
        })
    }

    /// Service name
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Operation definition
    pub fn definition(&self) -> &OperationDefinition {
        &self.operation
    }

    /// Paging settings declared by the operation
    pub fn paging_settings(&self) -> PagingSettings {
        self.operation.paging_settings()
    }

    /// Wrap in a paginator using the operation's paging settings
    pub fn into_paginator(self) -> Paginator<Self> {
        let settings = self.paging_settings();
        Paginator::new(self).with_settings(settings)
    }

    /// Request fields as sent, operation defaults underneath caller fields
    pub fn wire_fields(&self, request: &ListRequest) -> JsonObject {
        let mut wire = self.operation.defaults.clone();
        wire.extend(request.to_wire(
            &self.operation.cursor_field,
            self.operation.limit_field.as_deref(),
        ));
        wire
    }

    fn request_config(&self, request: &ListRequest) -> RequestConfig {
        let mut config = RequestConfig::new();
        for (key, value) in &self.headers {
            config = config.header(key, value);
        }

        let wire = self.wire_fields(request);
        match self.operation.method {
            Method::POST => config.json(JsonValue::Object(wire)),
            Method::GET => wire.into_iter().fold(config, |config, (key, value)| {
                config.query(key, query_value(value))
            }),
        }
    }
}

#[async_trait]
impl PageFetcher for JsonListOperation {
    type Request = ListRequest;
    type Response = JsonPage;

    async fn fetch_page(&self, request: &ListRequest) -> Result<JsonPage> {
        debug!(
            service = %self.service,
            operation = %self.operation.name,
            cursor = request.cursor().map(Cursor::as_str),
            page_size = ?request.page_size(),
            "Calling list operation"
        );

        let response = self
            .client
            .send(
                self.operation.method.into(),
                &self.operation.path,
                self.request_config(request),
            )
            .await?;
        let body = response.text().await?;
        let value: JsonValue = serde_json::from_str(&body)
            .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))?;

        JsonPage::from_value(&value, &self.operation)
    }
}

fn query_value(value: JsonValue) -> String {
    match value {
        JsonValue::String(s) => s,
        other => other.to_string(),
    }
}
