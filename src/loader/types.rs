//! Loader types
//!
//! Declarative service definition types for YAML parsing.

use crate::error::{Error, Result};
use crate::pagination::{PagingSettings, DEFAULT_PAGE_CAP};
use crate::types::{JsonObject, Method, StringMap};
use serde::{Deserialize, Serialize};

// ============================================================================
// Service Definition
// ============================================================================

/// A remote service exposing paginated list operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServiceDefinition {
    /// Service name
    pub name: String,
    /// Human-readable title
    #[serde(default)]
    pub title: Option<String>,
    /// Host prefix used to derive the regional endpoint
    #[serde(default)]
    pub endpoint_prefix: String,
    /// Prefix of the `X-Amz-Target` header; no header when absent
    #[serde(default)]
    pub target_prefix: Option<String>,
    /// Request content type
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Headers sent with every operation
    #[serde(default)]
    pub headers: StringMap,
    /// List operations
    pub operations: Vec<OperationDefinition>,
}

fn default_content_type() -> String {
    "application/x-amz-json-1.1".to_string()
}

impl ServiceDefinition {
    /// Look up an operation by name
    ///
    /// Exact match first, then case-insensitive.
    pub fn operation(&self, name: &str) -> Result<&OperationDefinition> {
        self.operations
            .iter()
            .find(|op| op.name == name)
            .or_else(|| {
                self.operations
                    .iter()
                    .find(|op| op.name.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| Error::operation_not_found(&self.name, name))
    }

    /// Operation names in definition order
    pub fn operation_names(&self) -> Vec<&str> {
        self.operations.iter().map(|op| op.name.as_str()).collect()
    }

    /// `X-Amz-Target` value for an operation
    pub fn target_for(&self, operation: &OperationDefinition) -> Option<String> {
        self.target_prefix
            .as_ref()
            .map(|prefix| format!("{prefix}.{}", operation.name))
    }
}

// ============================================================================
// Operation Definition
// ============================================================================

/// One cursor-paginated list operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OperationDefinition {
    /// Operation name
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: Option<String>,
    /// HTTP method
    #[serde(default)]
    pub method: Method,
    /// URL path relative to the endpoint
    #[serde(default = "default_path")]
    pub path: String,
    /// Path to the item array in the response
    pub items_path: String,
    /// Request field carrying the cursor
    #[serde(default = "default_cursor_field")]
    pub cursor_field: String,
    /// Path to the next cursor in the response
    #[serde(default = "default_next_cursor_path")]
    pub next_cursor_path: String,
    /// Request field carrying the page size; `null` when the operation has none
    #[serde(default = "default_limit_field")]
    pub limit_field: Option<String>,
    /// Largest page the server returns
    #[serde(default = "default_page_cap")]
    pub page_cap: usize,
    /// Send the page cap when no emit limit is set
    #[serde(default = "default_true")]
    pub send_page_cap: bool,
    /// Static request fields merged under caller filters
    #[serde(default)]
    pub defaults: JsonObject,
}

fn default_path() -> String {
    "/".to_string()
}

fn default_cursor_field() -> String {
    "NextToken".to_string()
}

fn default_next_cursor_path() -> String {
    "$.NextToken".to_string()
}

#[allow(clippy::unnecessary_wraps)]
fn default_limit_field() -> Option<String> {
    Some("Limit".to_string())
}

fn default_page_cap() -> usize {
    DEFAULT_PAGE_CAP
}

fn default_true() -> bool {
    true
}

impl OperationDefinition {
    /// Paging settings for the driver
    ///
    /// Without a page-size field there is nothing to send, so the server's
    /// default page size applies.
    pub fn paging_settings(&self) -> PagingSettings {
        let settings = PagingSettings::with_page_cap(self.page_cap);
        if self.send_page_cap && self.limit_field.is_some() {
            settings
        } else {
            settings.server_default_page_size()
        }
    }
}
