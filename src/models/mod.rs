//! Data models for the Patrol backend API.
//!
//! Field names follow the backend's camelCase JSON.

mod activity;
mod auth;
mod incident;
mod nfc;

pub use activity::*;
pub use auth::*;
pub use incident::*;
pub use nfc::*;

use serde::{Deserialize, Serialize};

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

impl<T> Paginated<T> {
    /// Whether pages after this one exist.
    pub fn has_more(&self) -> bool {
        self.limit > 0 && u64::from(self.page) * u64::from(self.limit) < self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paginated_defaults() {
        let page: Paginated<String> = serde_json::from_value(json!({ "data": ["a"] })).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total, 0);
        assert!(!page.has_more());

        let page: Paginated<String> = serde_json::from_value(json!({
            "data": ["a", "b"], "total": 5, "page": 2, "limit": 2
        }))
        .unwrap();
        assert!(page.has_more());
    }
}
