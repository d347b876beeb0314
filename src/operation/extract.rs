//! Response field extraction
//!
//! Plain dotted paths (`$.Results`, `page.items[0]`) are walked directly;
//! anything with a wildcard goes through jsonpath-rust.

use crate::error::{Error, Result};
use crate::pagination::Cursor;
use crate::types::JsonValue;

/// Items of one page
///
/// A missing or `null` field means an empty page.
pub fn extract_items(value: &JsonValue, path: &str) -> Result<Vec<JsonValue>> {
    if path.contains('*') {
        return extract_with_jsonpath(value, path);
    }

    match select(value, path) {
        Some(JsonValue::Array(items)) => Ok(items.clone()),
        Some(JsonValue::Null) | None => Ok(Vec::new()),
        Some(other) => Err(Error::ItemExtraction {
            path: path.to_string(),
            message: format!("expected an array, found {}", type_name(other)),
        }),
    }
}

/// Next cursor of one page
///
/// Strings are taken verbatim and numbers in their decimal form; absent,
/// `null` and empty values all mean the listing is complete.
pub fn extract_cursor(value: &JsonValue, path: &str) -> Option<Cursor> {
    match select(value, path)? {
        JsonValue::String(token) => Cursor::new(token.as_str()),
        JsonValue::Number(n) => Cursor::new(n.to_string()),
        _ => None,
    }
}

/// Walk a simple dotted path
pub fn select<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.trim();
    let path = path
        .strip_prefix("$.")
        .or_else(|| path.strip_prefix('$'))
        .unwrap_or(path);
    if path.is_empty() {
        return Some(value);
    }

    path.split('.').try_fold(value, |current, part| {
        let Some(bracket) = part.find('[') else {
            return current.get(part);
        };
        let name = &part[..bracket];
        let index = part[bracket + 1..].strip_suffix(']')?.parse::<usize>().ok()?;
        let current = if name.is_empty() {
            current
        } else {
            current.get(name)?
        };
        current.get(index)
    })
}

fn extract_with_jsonpath(value: &JsonValue, path: &str) -> Result<Vec<JsonValue>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path)
        .map_err(|e| Error::json_path(format!("Invalid JSONPath: {e}")))?;

    match jp.find(value) {
        JsonValue::Array(items) => Ok(items),
        JsonValue::Null => Ok(Vec::new()),
        other => Ok(vec![other]),
    }
}

fn type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
