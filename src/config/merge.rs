//! Structure-preserving overlay of configuration trees.
//!
//! Both layers are handled as `serde_json::Value` trees: the compiled-in defaults
//! are serialized into one and the YAML file is parsed into the other. The overlay
//! only touches keys it actually mentions.

use serde_json::{Map, Value};

/// Overlay `overlay` onto `base`, key by key.
///
/// - Objects are merged recursively: keys in overlay override keys in base
/// - Arrays, strings, numbers, booleans are replaced entirely
/// - A null in the overlay keeps the base value (an empty YAML key is "not specified")
///
/// # Example
/// ```
/// use serde_json::json;
/// use panda_config::config::deep_merge;
///
/// let defaults = json!({
///     "http": { "port": 8000 },
///     "redis": { "addr": "169.254.15.12:6379", "password": "" }
/// });
/// let file = json!({ "redis": { "password": "hunter2" } });
/// let merged = deep_merge(defaults, file);
/// assert_eq!(merged["redis"]["addr"], "169.254.15.12:6379");
/// assert_eq!(merged["redis"]["password"], "hunter2");
/// assert_eq!(merged["http"]["port"], 8000);
/// ```
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (base, Value::Null) => base,
        (_, overlay) => overlay,
    }
}

/// Lower-case every object key in the tree.
///
/// File keys are case-insensitive. Keys that collapse to the same name are
/// merged with [`deep_merge`] in key order.
pub fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, child) in map {
                let child = lowercase_keys(child);
                let key = key.to_lowercase();
                let merged = match out.remove(&key) {
                    Some(existing) => deep_merge(existing, child),
                    None => child,
                };
                out.insert(key, merged);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_keys).collect()),
        other => other,
    }
}

/// Follow a dotted key path (`"mq.nats.server"`) through nested objects.
///
/// Segments are compared case-insensitively against the (already lower-cased) tree.
/// Returns `None` when any segment is missing or the value is null.
pub fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let mut current = root;
    for segment in key.split('.') {
        current = current.as_object()?.get(&segment.to_lowercase())?;
    }
    if current.is_null() { None } else { Some(current) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_file_only_touches_mentioned_keys() {
        let defaults = json!({
            "http": {"port": 8000},
            "pg": {"dsn": "host=169.254.15.11"},
            "caddy_api": "/app/run/caddy-admin.sock"
        });
        let file = json!({"http": {"port": 9090}});
        let merged = deep_merge(defaults, file);
        assert_eq!(
            merged,
            json!({
                "http": {"port": 9090},
                "pg": {"dsn": "host=169.254.15.11"},
                "caddy_api": "/app/run/caddy-admin.sock"
            })
        );
    }

    #[test]
    fn test_nested_sections_merge_per_key() {
        let defaults = json!({
            "mq": {"type": "nats", "nats": {"server": "nats://a:4222", "user": "panda-wiki", "password": ""}}
        });
        let file = json!({"mq": {"nats": {"password": "s3cret"}}});
        let merged = deep_merge(defaults, file);
        assert_eq!(merged["mq"]["type"], "nats");
        assert_eq!(merged["mq"]["nats"]["server"], "nats://a:4222");
        assert_eq!(merged["mq"]["nats"]["user"], "panda-wiki");
        assert_eq!(merged["mq"]["nats"]["password"], "s3cret");
    }

    #[test]
    fn test_null_in_file_keeps_default() {
        let defaults = json!({"auth": {"type": "jwt", "jwt": {"secret": ""}}});
        let file = json!({"auth": {"type": null, "jwt": null}});
        let merged = deep_merge(defaults.clone(), file);
        assert_eq!(merged, defaults);
    }

    #[test]
    fn test_lists_replace_instead_of_append() {
        let merged = deep_merge(json!({"hosts": ["a", "b"]}), json!({"hosts": ["c"]}));
        assert_eq!(merged, json!({"hosts": ["c"]}));
    }

    #[test]
    fn test_unknown_keys_are_carried() {
        let merged = deep_merge(json!({"http": {"port": 8000}}), json!({"feature": {"beta": true}}));
        assert_eq!(merged["feature"]["beta"], true);
        assert_eq!(merged["http"]["port"], 8000);
    }

    #[test]
    fn test_lowercase_keys_recurses() {
        let value = json!({"HTTP": {"Port": 9090}, "Redis": {"ADDR": "x:6379"}, "list": [{"K": 1}]});
        assert_eq!(
            lowercase_keys(value),
            json!({"http": {"port": 9090}, "redis": {"addr": "x:6379"}, "list": [{"k": 1}]})
        );
    }

    #[test]
    fn test_lowercase_keys_collapses_duplicates() {
        let value = json!({"s3": {"endpoint": "a:9000"}, "S3": {"secret_key": "k"}});
        let lowered = lowercase_keys(value);
        assert_eq!(lowered["s3"]["secret_key"], "k");
        assert_eq!(lowered["s3"]["endpoint"], "a:9000");
    }

    #[test]
    fn test_lookup_paths() {
        let root = json!({"mq": {"nats": {"server": "nats://x:4222"}}, "empty": null});
        assert_eq!(lookup(&root, "mq.nats.server"), Some(&json!("nats://x:4222")));
        assert_eq!(lookup(&root, "MQ.Nats.SERVER"), Some(&json!("nats://x:4222")));
        assert!(lookup(&root, "mq.nats.missing").is_none());
        assert!(lookup(&root, "mq.nats.server.deeper").is_none());
        assert!(lookup(&root, "empty").is_none());
        assert!(lookup(&root, "").is_none());
    }
}
