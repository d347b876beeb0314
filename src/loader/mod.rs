//! YAML Loader module
//!
//! Parse service definitions from YAML files.
//!
//! # Overview
//!
//! The loader module provides:
//! - `ServiceDefinition` - A service and its list operations
//! - `OperationDefinition` - Request and response shape of one operation
//! - YAML parsing with validation

mod parser;
mod types;

pub use parser::{load_service, load_service_from_str, validate_service};
pub use types::{OperationDefinition, ServiceDefinition};
