//! Built-in service definitions embedded in the binary
//!
//! Lets users pass `--service events` instead of a file path.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Built-in service YAML definitions
pub static BUILTIN_SERVICES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        let mut m = HashMap::new();

        m.insert(
            "machinelearning",
            include_str!("../services/machinelearning.yaml"),
        );
        m.insert("ml", include_str!("../services/machinelearning.yaml"));

        m.insert("events", include_str!("../services/events.yaml"));
        m.insert("cloudwatch-events", include_str!("../services/events.yaml"));

        m
    });

/// Get a built-in service by name
pub fn get_builtin(name: &str) -> Option<&'static str> {
    BUILTIN_SERVICES.get(name).copied()
}

/// Check if a name refers to a built-in service
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_SERVICES.contains_key(name)
}

/// List built-in service names (primary names only)
pub fn list_builtin() -> Vec<&'static str> {
    vec!["events", "machinelearning"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_share_definition() {
        assert_eq!(get_builtin("ml"), get_builtin("machinelearning"));
        assert_eq!(get_builtin("cloudwatch-events"), get_builtin("events"));
    }

    #[test]
    fn test_primary_names_are_builtin() {
        for name in list_builtin() {
            assert!(is_builtin(name), "{name} should be built in");
        }
        assert!(!is_builtin("stripe"));
        assert!(get_builtin("stripe").is_none());
    }
}
