//! String-keyed access to the merged default+file values.
//!
//! This is the loose companion to [`Config`](super::Config): lookups never fail,
//! values are coerced between types on a best-effort basis, and a missing key or
//! an unconvertible value yields the type's zero value. Environment overrides are
//! NOT reflected here; read the typed configuration for the final values.

use super::merge::{lookup, lowercase_keys};
use serde_json::Value;

/// Immutable tree of merged default+file values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    root: Value,
}

impl Settings {
    pub fn new(root: Value) -> Self {
        Self {
            root: lowercase_keys(root),
        }
    }

    /// Raw value at a dotted key (`"mq.nats.server"`), case-insensitive.
    pub fn get(&self, key: &str) -> Option<&Value> {
        lookup(&self.root, key)
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get_string(&self, key: &str) -> String {
        self.get(key).map(coerce_string).unwrap_or_default()
    }

    pub fn get_int(&self, key: &str) -> i64 {
        self.get(key).map(coerce_i64).unwrap_or_default()
    }

    pub fn get_uint64(&self, key: &str) -> u64 {
        self.get(key).map(coerce_u64).unwrap_or_default()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).map(coerce_bool).unwrap_or_default()
    }

    /// A list value, or a string split on whitespace.
    pub fn get_string_slice(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Array(items)) => items.iter().map(coerce_string).collect(),
            Some(Value::String(s)) => s.split_whitespace().map(str::to_string).collect(),
            _ => Vec::new(),
        }
    }

    pub fn get_float64(&self, key: &str) -> f64 {
        self.get(key).map(coerce_f64).unwrap_or_default()
    }
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn coerce_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

fn coerce_u64(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64))
            .unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        Value::Bool(b) => u64::from(*b),
        _ => 0,
    }
}

fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.trim(), "1" | "t" | "T" | "true" | "TRUE" | "True"),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

fn coerce_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s.trim().parse().unwrap_or_default(),
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings() -> Settings {
        Settings::new(json!({
            "http": {"port": 9090},
            "log": {"level": -4},
            "feature": {
                "Enabled": true,
                "flag_text": "t",
                "ratio": 0.75,
                "ratio_text": " 1.5 ",
                "limit_text": "42",
                "bad_number": "forty-two",
                "hosts": ["a", "b", 3],
                "words": "one two  three",
                "negative": -3,
                "huge": 18446744073709551615u64
            }
        }))
    }

    #[test]
    fn test_missing_keys_yield_zero_values() {
        let s = settings();
        assert_eq!(s.get_string("nope"), "");
        assert_eq!(s.get_int("nope.deeper"), 0);
        assert_eq!(s.get_uint64("nope"), 0);
        assert!(!s.get_bool("nope"));
        assert!(s.get_string_slice("nope").is_empty());
        assert_eq!(s.get_float64("nope"), 0.0);
        assert!(!s.is_set("nope"));
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let s = settings();
        assert!(s.get_bool("feature.enabled"));
        assert!(s.get_bool("FEATURE.ENABLED"));
        assert_eq!(s.get_int("HTTP.Port"), 9090);
    }

    #[test]
    fn test_numeric_coercions() {
        let s = settings();
        assert_eq!(s.get_int("feature.limit_text"), 42);
        assert_eq!(s.get_int("feature.ratio"), 0);
        assert_eq!(s.get_int("feature.bad_number"), 0);
        assert_eq!(s.get_int("log.level"), -4);
        assert_eq!(s.get_int("feature.enabled"), 1);
        assert_eq!(s.get_int("feature.huge"), i64::MAX);
        assert_eq!(s.get_uint64("feature.negative"), 0);
        assert_eq!(s.get_uint64("feature.huge"), u64::MAX);
        assert_eq!(s.get_uint64("http.port"), 9090);
        assert_eq!(s.get_float64("feature.ratio"), 0.75);
        assert_eq!(s.get_float64("feature.ratio_text"), 1.5);
        assert_eq!(s.get_float64("feature.bad_number"), 0.0);
    }

    #[test]
    fn test_bool_coercions() {
        let s = settings();
        assert!(s.get_bool("feature.flag_text"));
        assert!(s.get_bool("http.port"));
        assert!(!s.get_bool("feature.bad_number"));
    }

    #[test]
    fn test_string_coercions() {
        let s = settings();
        assert_eq!(s.get_string("http.port"), "9090");
        assert_eq!(s.get_string("feature.enabled"), "true");
        assert_eq!(s.get_string("feature"), "");
    }

    #[test]
    fn test_string_slices() {
        let s = settings();
        assert_eq!(s.get_string_slice("feature.hosts"), ["a", "b", "3"]);
        assert_eq!(s.get_string_slice("feature.words"), ["one", "two", "three"]);
        assert!(s.get_string_slice("http.port").is_empty());
    }
}
