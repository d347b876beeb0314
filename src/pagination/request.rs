//! Request builder
//!
//! Collects filter and sort fields for a list call. Absent values are left
//! out of the request entirely rather than sent as defaults.

use super::driver::PagedRequest;
use super::types::{Cursor, PagingControls};
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

/// Sort direction understood by the modelled list operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending
    #[serde(rename = "asc")]
    Ascending,
    /// Descending
    #[serde(rename = "dsc")]
    Descending,
}

/// Immutable list request
///
/// Filter fields are fixed at build time; only the driver changes the
/// cursor and page size between fetches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListRequest {
    fields: JsonObject,
    cursor: Option<Cursor>,
    page_size: Option<usize>,
}

impl ListRequest {
    /// Start building a request
    pub fn builder() -> ListRequestBuilder {
        ListRequestBuilder::default()
    }

    /// Filter and sort fields
    pub fn fields(&self) -> &JsonObject {
        &self.fields
    }

    /// Cursor of the pending fetch
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Page size of the pending fetch
    pub fn page_size(&self) -> Option<usize> {
        self.page_size
    }

    /// Fields as sent on the wire, cursor and page size included under the
    /// operation's field names
    pub fn to_wire(&self, cursor_field: &str, limit_field: Option<&str>) -> JsonObject {
        let mut wire = self.fields.clone();
        if let Some(cursor) = &self.cursor {
            wire.insert(
                cursor_field.to_string(),
                JsonValue::String(cursor.as_str().to_string()),
            );
        }
        if let (Some(field), Some(size)) = (limit_field, self.page_size) {
            wire.insert(field.to_string(), JsonValue::from(size));
        }
        wire
    }
}

impl PagedRequest for ListRequest {
    fn set_cursor(&mut self, cursor: Option<&Cursor>) {
        self.cursor = cursor.cloned();
    }

    fn set_page_size(&mut self, page_size: Option<usize>) {
        self.page_size = page_size;
    }
}

/// Builder for [`ListRequest`] and its [`PagingControls`]
#[derive(Debug, Default)]
pub struct ListRequestBuilder {
    fields: JsonObject,
    controls: PagingControls,
    error: Option<Error>,
}

impl ListRequestBuilder {
    /// Set a field
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Serialize) -> Self {
        let name = name.into();
        match serde_json::to_value(value) {
            Ok(JsonValue::Null) => {}
            Ok(value) => {
                self.fields.insert(name, value);
            }
            Err(e) => {
                self.error
                    .get_or_insert_with(|| Error::invalid_value(name, e.to_string()));
            }
        }
        self
    }

    /// Set a field only when a value is present
    #[must_use]
    pub fn field_opt<V: Serialize>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.field(name, value),
            None => self,
        }
    }

    /// Set several fields at once
    #[must_use]
    pub fn fields<K, V>(self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Serialize,
    {
        fields
            .into_iter()
            .fold(self, |builder, (name, value)| builder.field(name, value))
    }

    /// Set the sort order field
    #[must_use]
    pub fn sort_order(self, name: impl Into<String>, order: Option<SortOrder>) -> Self {
        self.field_opt(name, order)
    }

    /// Resume from a cursor returned by an earlier manual call
    #[must_use]
    pub fn starting_cursor(mut self, cursor: Option<Cursor>) -> Self {
        self.controls.start_cursor = cursor;
        self
    }

    /// Drop the first `skip` items of the first page, as reported by a
    /// truncated earlier run
    #[must_use]
    pub fn skip_items(mut self, skip: usize) -> Self {
        self.controls.skip = skip;
        self
    }

    /// Cap the total number of emitted items
    #[must_use]
    pub fn emit_limit(mut self, limit: Option<usize>) -> Self {
        self.controls.emit_limit = limit;
        self
    }

    /// Fetch a single page only
    #[must_use]
    pub fn no_auto_iteration(mut self, enabled: bool) -> Self {
        self.controls.no_auto_iteration = enabled;
        self
    }

    /// Finish the request
    pub fn build(self) -> Result<(ListRequest, PagingControls)> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let request = ListRequest {
            fields: self.fields,
            cursor: None,
            page_size: None,
        };
        Ok((request, self.controls))
    }
}
