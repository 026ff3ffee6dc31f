//! Query string building.

use std::fmt::Display;

/// Ordered query parameters. Empty values are never serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value unless it renders as an empty string.
    pub fn insert(&mut self, key: &str, value: impl Display) -> &mut Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.pairs.push((key.to_string(), value));
        }
        self
    }

    pub fn insert_opt<V: Display>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    /// Add a list as one comma-joined parameter. Empty lists are skipped.
    pub fn insert_list<V: Display>(&mut self, key: &str, values: &[V]) -> &mut Self {
        let joined = values
            .iter()
            .map(ToString::to_string)
            .filter(|v| !v.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        self.insert(key, joined)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `""` when empty, otherwise `?k=v&...` with percent-encoded parts.
    pub fn to_query_string(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }

        let encoded = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("?{}", encoded)
    }

    /// Path with this query string appended.
    pub fn apply(&self, path: &str) -> String {
        format!("{}{}", path, self.to_query_string())
    }
}
