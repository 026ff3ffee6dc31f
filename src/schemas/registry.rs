//! Schema registry keyed by entity name.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde_json::Value;

use super::incident;
use super::rules::{AggregationPolicy, EntitySchema};
use crate::errors::{ClientError, ClientResult};

/// The built-in incident and login schemas.
pub static DEFAULT_SCHEMAS: Lazy<SchemaRegistry> = Lazy::new(SchemaRegistry::with_defaults);

/// Entity schemas keyed by entity name.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, EntitySchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(incident::incident_report());
        registry.register(incident::incident_log());
        registry.register(incident::login());
        registry
    }

    /// Add or replace a schema under its own name.
    pub fn register(&mut self, schema: EntitySchema) {
        self.schemas.insert(schema.name.clone(), schema);
    }

    pub fn get(&self, name: &str) -> Option<&EntitySchema> {
        self.schemas.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Validate `record` against the named schema.
    pub fn validate(&self, name: &str, record: &Value, policy: AggregationPolicy) -> ClientResult<()> {
        let schema = self
            .get(name)
            .ok_or_else(|| ClientError::UnknownSchema(name.to_string()))?;

        schema.validate(record, policy).map_err(|errors| {
            tracing::debug!(
                schema = name,
                failures = errors.len(),
                "Record failed validation"
            );
            ClientError::Validation(errors)
        })
    }
}
