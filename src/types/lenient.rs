// src/types/lenient.rs
//! Lenient `deserialize_with` helpers for payloads produced by a generative service.
//!
//! Every helper accepts the expected shape and otherwise coerces the value to a
//! safe default. Coercions never fail decoding; they are traced instead.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::json_kind;

fn coercion(expected: &'static str, found: &Value) {
    warn!(
        expected,
        found = json_kind(found),
        "field coercion fallback"
    );
}

/// Converts a scalar into text. Objects resolve through their `name` or `title` key.
pub(crate) fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            debug!(number = %n, "coercing number to string");
            Some(n.to_string())
        }
        Value::Bool(b) => {
            debug!(boolean = b, "coercing boolean to string");
            Some(b.to_string())
        }
        Value::Object(map) => ["name", "title", "label"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        Value::Null | Value::Array(_) => None,
    }
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

pub(crate) fn text_list(value: Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| {
                let text = value_to_text(item);
                if text.is_none() {
                    coercion("string item", item);
                }
                text
            })
            .collect(),
        Value::String(s) => {
            debug!("coercing single string to one-element list");
            non_blank(s).into_iter().collect()
        }
        other => {
            coercion("array of strings", &other);
            Vec::new()
        }
    }
}

/// Required text; anything unusable becomes an empty string.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    match &value {
        Value::Null => Ok(String::new()),
        other => Ok(value_to_text(other).unwrap_or_else(|| {
            coercion("string", other);
            String::new()
        })),
    }
}

/// Optional text; blank strings are treated as absent.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    match &value {
        Value::Null => Ok(None),
        other => {
            let text = value_to_text(other);
            if text.is_none() {
                coercion("string", other);
            }
            Ok(text.and_then(non_blank))
        }
    }
}

pub fn string_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    Ok(text_list(value))
}

/// Optional list: absent or `null` stays `None`, any other shape becomes a list.
pub fn opt_string_vec<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(value) => Some(text_list(value)),
    })
}

pub fn opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    Ok(match &value {
        Value::Null => None,
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => {
                coercion("boolean", &value);
                None
            }
        },
        other => {
            coercion("boolean", other);
            None
        }
    })
}

/// List of records; entries that cannot be decoded are skipped.
pub fn record_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    Ok(match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| {
                if !item.is_object() {
                    coercion("object entry", &item);
                    return None;
                }
                match serde_json::from_value::<T>(item) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!(error = %e, "skipping undecodable entry");
                        None
                    }
                }
            })
            .collect(),
        other => {
            coercion("array of objects", &other);
            Vec::new()
        }
    })
}

/// Nested record; a wrong shape falls back to `T::default()`.
pub fn record<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null);
    Ok(match value {
        Value::Null => T::default(),
        Value::Object(_) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!(error = %e, "nested record fell back to default");
            T::default()
        }),
        other => {
            coercion("object", &other);
            T::default()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "string")]
        name: String,
        #[serde(default, deserialize_with = "opt_string")]
        gpa: Option<String>,
        #[serde(default, deserialize_with = "string_vec")]
        items: Vec<String>,
        #[serde(default, deserialize_with = "opt_string_vec")]
        certs: Option<Vec<String>>,
        #[serde(default, deserialize_with = "opt_bool")]
        current: Option<bool>,
    }

    fn probe(value: Value) -> Probe {
        serde_json::from_value(value).expect("probe decodes")
    }

    #[test]
    fn test_numbers_become_text() {
        let p = probe(json!({"name": 42, "gpa": 3.8}));
        assert_eq!(p.name, "42");
        assert_eq!(p.gpa.as_deref(), Some("3.8"));
    }

    #[test]
    fn test_blank_optional_is_absent() {
        let p = probe(json!({"gpa": "   "}));
        assert_eq!(p.gpa, None);
    }

    #[test]
    fn test_wrong_shapes_fall_back() {
        let p = probe(json!({"name": ["x"], "items": {"a": 1}, "current": "maybe"}));
        assert_eq!(p.name, "");
        assert!(p.items.is_empty());
        assert_eq!(p.current, None);
    }

    #[test]
    fn test_single_string_becomes_list() {
        let p = probe(json!({"items": "Rust"}));
        assert_eq!(p.items, vec!["Rust"]);
    }

    #[test]
    fn test_certification_objects_resolve_to_names() {
        let p = probe(json!({"certs": [{"name": "CKA", "issuer": "CNCF"}, "AWS SAA", null]}));
        assert_eq!(p.certs, Some(vec!["CKA".to_string(), "AWS SAA".to_string()]));
    }

    #[test]
    fn test_absent_optional_list_stays_absent() {
        let p = probe(json!({"certs": null}));
        assert_eq!(p.certs, None);
        let p = probe(json!({}));
        assert_eq!(p.certs, None);
        assert!(p.items.is_empty());
    }

    #[test]
    fn test_string_booleans() {
        assert_eq!(probe(json!({"current": "TRUE"})).current, Some(true));
        assert_eq!(probe(json!({"current": false})).current, Some(false));
    }
}
