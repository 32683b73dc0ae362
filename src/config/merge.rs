//! Deep merge functionality for YAML configurations.
//!
//! Implements field-by-field merging where higher tier values override lower tier values.
//! Arrays are replaced entirely, not concatenated.

use serde_json::Value;

/// Deep merge two JSON values, with `overlay` taking precedence over `base`.
///
/// - Objects are merged recursively: keys in overlay override keys in base
/// - Arrays, strings, numbers, booleans, nulls are replaced entirely
/// - If overlay is null, the base value is preserved (null means "not specified")
///
/// # Example
/// ```
/// use serde_json::json;
/// use taskboard::config::deep_merge;
///
/// let base = json!({
///     "server": { "port": 3000, "host": "127.0.0.1" },
///     "pagination": { "default_limit": 10 }
/// });
/// let overlay = json!({
///     "server": { "port": 8080 },
///     "pagination": null
/// });
/// let result = deep_merge(base, overlay);
/// assert_eq!(result["server"]["port"], 8080);
/// assert_eq!(result["server"]["host"], "127.0.0.1");
/// assert_eq!(result["pagination"]["default_limit"], 10);
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        // Both are objects: merge recursively
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged_value = if let Some(base_value) = base_map.remove(&key) {
                    deep_merge(base_value, overlay_value)
                } else {
                    overlay_value
                };
                base_map.insert(key, merged_value);
            }
            Value::Object(base_map)
        }
        // Overlay is null: preserve base (null means "not specified")
        (base, Value::Null) => base,
        // Any other case: overlay replaces base entirely
        (_, overlay) => overlay,
    }
}

/// Merge multiple values in order, with later values taking precedence.
///
/// Equivalent to folding `deep_merge` over the list.
pub fn deep_merge_all(values: impl IntoIterator<Item = Value>) -> Value {
    values.into_iter().fold(Value::Null, deep_merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_tier_overrides_single_field() {
        let defaults = json!({
            "server": {"host": "127.0.0.1", "port": 3000, "store_path": "taskboard/db.json"},
            "pagination": {"default_limit": 10, "max_limit": 100}
        });
        let project = json!({"server": {"port": 8080}});

        let result = deep_merge(defaults, project);
        assert_eq!(result["server"]["port"], 8080);
        assert_eq!(result["server"]["store_path"], "taskboard/db.json");
        assert_eq!(result["pagination"]["max_limit"], 100);
    }

    #[test]
    fn test_null_keeps_lower_tier() {
        let base = json!({"server": {"host": "0.0.0.0"}});
        let overlay = json!({"server": {"host": null}});
        assert_eq!(deep_merge(base, overlay), json!({"server": {"host": "0.0.0.0"}}));
    }

    #[test]
    fn test_scalar_replaces_section() {
        let base = json!({"pagination": {"default_limit": 10}});
        let overlay = json!({"pagination": 5});
        assert_eq!(deep_merge(base, overlay), json!({"pagination": 5}));
    }

    #[test]
    fn test_later_tiers_win() {
        let tiers = vec![
            json!({"pagination": {"default_limit": 10, "max_limit": 100}}),
            json!({"pagination": {"default_limit": 20}}),
            json!({"pagination": {"default_limit": 5}}),
        ];
        assert_eq!(
            deep_merge_all(tiers),
            json!({"pagination": {"default_limit": 5, "max_limit": 100}})
        );
    }
}
