//! List operations
//!
//! A single generic operation type covers every service: the definition
//! supplies field names and response paths, the driver supplies the loop.

mod extract;
mod json;

pub use extract::{extract_cursor, extract_items, select};
pub use json::{JsonListOperation, JsonPage};

#[cfg(test)]
mod tests;
