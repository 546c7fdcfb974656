use serde::{Deserialize, Serialize};

use crate::KeyValue;

/// Extra environment variables for an external command.
///
/// Stored as an ordered list; later entries win on lookup and are applied last when spawning,
/// so they override earlier ones the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Env(pub Vec<KeyValue>);

impl Env {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over all pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &KeyValue> {
        self.0.iter()
    }

    /// Get the value for a key, returning the last matching entry.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|kv| kv.key() == key)
            .map(|kv| kv.value())
    }

    /// Append a pair; it overrides any earlier entry with the same key.
    pub fn push<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.push(KeyValue::new(key, value));
    }
}

#[cfg(test)]
mod tests {
    use super::Env;

    #[test]
    fn last_entry_wins() {
        let mut env = Env::new();
        env.push("AWS_PROFILE", "default");
        env.push("AWS_RETRY_MODE", "standard");
        env.push("AWS_PROFILE", "backup");

        assert_eq!(env.len(), 3);
        assert_eq!(env.get("AWS_PROFILE"), Some("backup"));
        assert_eq!(env.get("AWS_RETRY_MODE"), Some("standard"));
        assert!(env.get("HOME").is_none());
    }

    #[test]
    fn yaml_is_a_plain_list() {
        let yaml = "- key: A\n  value: '1'\n- key: B\n  value: '2'\n";
        let env: Env = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(env.get("A"), Some("1"));
        assert_eq!(env.get("B"), Some("2"));
    }
}
