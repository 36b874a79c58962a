//! Secret value type.
//!
//! An ordered key/value mapping decoded from one version of a secret.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{Result, StagehandError};

/// An ordered mapping of secret keys to string values.
///
/// Keys are unique and insertion order is significant: the order survives
/// every conversion end-to-end, and two values holding the same pairs in a
/// different order are not equal.
#[derive(Debug, Clone, Default)]
pub struct SecretValue {
    entries: IndexMap<String, String>,
}

impl SecretValue {
    /// Create an empty value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key-value pair.
    ///
    /// A duplicate key overwrites the earlier value in place without
    /// moving its position.
    pub fn insert(&mut self, key: String, value: String) {
        self.entries.insert(key, value);
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Parse the store's JSON representation of a secret.
    ///
    /// Key order in the JSON object is preserved.
    ///
    /// # Errors
    ///
    /// Returns `Format` if the text is not valid JSON, the top level is not
    /// an object, or any field value is not a string.
    pub fn from_json(text: &str) -> Result<Self> {
        let parsed: Value = serde_json::from_str(text)
            .map_err(|e| StagehandError::Format(format!("invalid JSON: {}", e)))?;

        let Value::Object(map) = parsed else {
            return Err(StagehandError::Format(
                "top-level JSON value must be an object".to_string(),
            ));
        };

        let mut entries = IndexMap::with_capacity(map.len());
        for (key, field) in map {
            let Value::String(value) = field else {
                return Err(StagehandError::Format(format!(
                    "field {} must be a string",
                    key
                )));
            };
            entries.insert(key, value);
        }

        Ok(Self { entries })
    }

    /// Serialize to a compact JSON object, keys in iteration order.
    pub fn to_json(&self) -> String {
        let mut map = serde_json::Map::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            map.insert(key.clone(), Value::String(value.clone()));
        }
        Value::Object(map).to_string()
    }
}

// IndexMap equality ignores order; secret values compare as sequences.
impl PartialEq for SecretValue {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().zip(other.entries.iter()).all(|(a, b)| a == b)
    }
}

impl Eq for SecretValue {}

impl FromIterator<(String, String)> for SecretValue {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut value = Self::new();
        for (k, v) in iter {
            value.insert(k, v);
        }
        value
    }
}
