//! YAML parser for service definitions
//!
//! Parses and validates service YAML files.
//! Supports both built-in services (by name) and custom YAML files (by path).

use crate::error::{Error, Result};
use crate::loader::types::{OperationDefinition, ServiceDefinition};
use crate::services;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load a service definition from a name or file path
///
/// Bare names (no path separators, no `.yaml` extension) are looked up in the
/// built-in catalog first.
///
/// # Examples
///
/// ```ignore
/// let events = load_service("events")?;
/// let custom = load_service("./my-service.yaml")?;
/// ```
pub fn load_service(path: impl AsRef<Path>) -> Result<ServiceDefinition> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if !path_str.contains('/')
        && !path_str.contains('\\')
        && !path_str.ends_with(".yaml")
        && !path_str.ends_with(".yml")
    {
        if let Some(yaml) = services::get_builtin(&path_str) {
            return load_service_from_str(yaml);
        }
    }

    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::config(format!(
                "Service '{}' not found. Built-in services: {}. Or provide a path to a YAML file.",
                path.display(),
                services::list_builtin().join(", ")
            ))
        } else {
            Error::config(format!(
                "Failed to read service file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_service_from_str(&content)
}

/// Load a service definition from a YAML string
pub fn load_service_from_str(yaml: &str) -> Result<ServiceDefinition> {
    let def: ServiceDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse service YAML: {e}")))?;

    validate_service(&def)?;
    Ok(def)
}

/// Validate a service definition
pub fn validate_service(def: &ServiceDefinition) -> Result<()> {
    if def.name.trim().is_empty() {
        return Err(Error::config("Service name cannot be empty"));
    }

    if def.operations.is_empty() {
        return Err(Error::config(format!(
            "Service '{}' must have at least one operation",
            def.name
        )));
    }

    let mut seen = HashSet::new();
    for op in &def.operations {
        if !seen.insert(op.name.as_str()) {
            return Err(Error::config(format!(
                "Duplicate operation name '{}' in service '{}'",
                op.name, def.name
            )));
        }
        validate_operation(op)?;
    }

    Ok(())
}

fn validate_operation(op: &OperationDefinition) -> Result<()> {
    if op.name.trim().is_empty() {
        return Err(Error::config("Operation name cannot be empty"));
    }

    if op.items_path.trim().is_empty() {
        return Err(Error::config(format!(
            "Operation '{}' items_path cannot be empty",
            op.name
        )));
    }

    if op.cursor_field.trim().is_empty() {
        return Err(Error::config(format!(
            "Operation '{}' cursor_field cannot be empty",
            op.name
        )));
    }

    if op.page_cap == 0 {
        return Err(Error::invalid_value(
            format!("{}.page_cap", op.name),
            "must be at least 1",
        ));
    }

    Ok(())
}
