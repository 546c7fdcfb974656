use serde::{Deserialize, Serialize};

/// Single environment variable handed to an external command.
///
/// No validation is applied to either side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Variable name.
    key: String,
    /// Variable value.
    value: String,
}

impl KeyValue {
    /// Create a new key/value pair.
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}
