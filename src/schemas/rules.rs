//! Field rules, entity schemas and the validation pass over them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ClientError, ClientResult, ValidationError, ValidationErrors};

/// Declarative constraint on one field plus its user-facing failure message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRule {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
    pub message: String,
}

impl FieldRule {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            required: false,
            min_length: None,
            max_length: None,
            allowed: None,
            message: message.into(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn length(self, min: usize, max: usize) -> Self {
        self.min_length(min).max_length(max)
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Check one value against this rule. `None` means the field is absent.
    pub fn check(&self, value: Option<&Value>) -> bool {
        let value = match value {
            Some(v) if !is_empty(v) => v,
            _ => return !self.required,
        };

        if let Value::String(s) = value {
            let len = s.chars().count();
            if self.min_length.is_some_and(|min| len < min) {
                return false;
            }
            if self.max_length.is_some_and(|max| len > max) {
                return false;
            }
        }

        match &self.allowed {
            Some(allowed) => value
                .as_str()
                .is_some_and(|s| allowed.iter().any(|a| a == s)),
            None => true,
        }
    }
}

/// Absent, null, blank strings and empty arrays all count as "not provided".
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Whether a validation pass stops at the first failure or gathers them all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AggregationPolicy {
    FailFast,
    #[default]
    CollectAll,
}

/// Named collection of field rules describing one form or record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub name: String,
    pub fields: BTreeMap<String, FieldRule>,
}

impl EntitySchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Add a rule, replacing any rule already set for the field.
    pub fn rule(mut self, field: impl Into<String>, rule: FieldRule) -> Self {
        self.fields.insert(field.into(), rule);
        self
    }

    /// Copy every rule of `base` that is not already set here.
    pub fn extend(mut self, base: &EntitySchema) -> Self {
        for (field, rule) in &base.fields {
            self.fields
                .entry(field.clone())
                .or_insert_with(|| rule.clone());
        }
        self
    }

    pub fn without(mut self, field: &str) -> Self {
        self.fields.remove(field);
        self
    }

    pub fn get(&self, field: &str) -> Option<&FieldRule> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Reject rules that can never pass.
    pub fn check_integrity(&self) -> ClientResult<()> {
        for (field, rule) in &self.fields {
            if let (Some(min), Some(max)) = (rule.min_length, rule.max_length) {
                if min > max {
                    return Err(ClientError::InvalidRequest(format!(
                        "{}.{}: minLength {} exceeds maxLength {}",
                        self.name, field, min, max
                    )));
                }
            }
            if rule.allowed.as_ref().is_some_and(|a| a.is_empty()) {
                return Err(ClientError::InvalidRequest(format!(
                    "{}.{}: empty enum domain",
                    self.name, field
                )));
            }
        }
        Ok(())
    }

    /// Validate a JSON record. A non-object record has no fields at all.
    pub fn validate(&self, record: &Value, policy: AggregationPolicy) -> Result<(), ValidationErrors> {
        let object = record.as_object();
        let mut failures = Vec::new();

        for (field, rule) in &self.fields {
            let value = object.and_then(|o| o.get(field));
            if rule.check(value) {
                continue;
            }
            failures.push(ValidationError::new(field.as_str(), rule.message.as_str()));
            if policy == AggregationPolicy::FailFast {
                break;
            }
        }

        match ValidationErrors::from_vec(failures) {
            Some(errors) => Err(errors),
            None => Ok(()),
        }
    }
}

/// Validate any serialisable record against a schema.
pub fn validate_record<T: Serialize>(
    schema: &EntitySchema,
    record: &T,
    policy: AggregationPolicy,
) -> ClientResult<()> {
    let value = serde_json::to_value(record)?;
    schema.validate(&value, policy)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn title_schema() -> EntitySchema {
        EntitySchema::new("note")
            .rule(
                "title",
                FieldRule::new("Title must be 3-10 characters")
                    .required()
                    .length(3, 10),
            )
            .rule(
                "mood",
                FieldRule::new("Pick a mood").one_of(["calm", "busy"]),
            )
    }

    #[test]
    fn test_required_missing_fails() {
        let errors = title_schema()
            .validate(&json!({}), AggregationPolicy::CollectAll)
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().field, "title");
        assert_eq!(errors.first().message, "Title must be 3-10 characters");
    }

    #[test]
    fn test_required_blank_or_null_fails() {
        let schema = title_schema();
        assert!(schema
            .validate(&json!({ "title": "   " }), AggregationPolicy::CollectAll)
            .is_err());
        assert!(schema
            .validate(&json!({ "title": null }), AggregationPolicy::CollectAll)
            .is_err());
    }

    #[test]
    fn test_length_boundaries_count_characters() {
        let rule = FieldRule::new("bad").length(3, 10);
        assert!(rule.check(Some(&json!("abc"))));
        assert!(!rule.check(Some(&json!("ab"))));
        assert!(rule.check(Some(&json!("a".repeat(10)))));
        assert!(!rule.check(Some(&json!("a".repeat(11)))));
        // Multi-byte characters count once each
        assert!(rule.check(Some(&json!("éééééééééé"))));
    }

    #[test]
    fn test_optional_absent_passes() {
        let rule = FieldRule::new("bad").max_length(5).one_of(["x"]);
        assert!(rule.check(None));
        assert!(rule.check(Some(&json!(""))));
    }

    #[test]
    fn test_enum_is_exact_match() {
        let schema = title_schema();
        assert!(schema
            .validate(
                &json!({ "title": "Gate", "mood": "calm" }),
                AggregationPolicy::CollectAll
            )
            .is_ok());
        assert!(schema
            .validate(
                &json!({ "title": "Gate", "mood": "Calm" }),
                AggregationPolicy::CollectAll
            )
            .is_err());
        assert!(schema
            .validate(
                &json!({ "title": "Gate", "mood": 3 }),
                AggregationPolicy::CollectAll
            )
            .is_err());
    }

    #[test]
    fn test_fail_fast_stops_at_first() {
        let record = json!({ "mood": "angry" });
        let schema = title_schema();

        let all = schema
            .validate(&record, AggregationPolicy::CollectAll)
            .unwrap_err();
        assert_eq!(all.len(), 2);

        let first = schema
            .validate(&record, AggregationPolicy::FailFast)
            .unwrap_err();
        assert_eq!(first.len(), 1);
        assert_eq!(first.first().field, "mood");
    }

    #[test]
    fn test_non_object_record_fails_required() {
        let errors = title_schema()
            .validate(&json!("title"), AggregationPolicy::CollectAll)
            .unwrap_err();
        assert_eq!(errors.first().field, "title");
    }

    #[test]
    fn test_extend_keeps_overrides() {
        let base = EntitySchema::new("base")
            .rule("a", FieldRule::new("base a").required())
            .rule("b", FieldRule::new("base b"));
        let variant = EntitySchema::new("variant")
            .rule("a", FieldRule::new("variant a"))
            .extend(&base)
            .without("b");

        assert_eq!(variant.get("a").unwrap().message, "variant a");
        assert!(!variant.get("a").unwrap().required);
        assert!(variant.get("b").is_none());
    }

    #[test]
    fn test_check_integrity_rejects_inverted_bounds() {
        let schema = EntitySchema::new("broken").rule("x", FieldRule::new("x").length(5, 2));
        assert!(schema.check_integrity().is_err());
        assert!(title_schema().check_integrity().is_ok());
    }

    #[test]
    fn test_rule_serializes_enum_key() {
        let rule = FieldRule::new("Pick one").required().one_of(["a", "b"]);
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["enum"], json!(["a", "b"]));
        assert_eq!(json["required"], true);
        assert!(json.get("minLength").is_none());
    }

    #[test]
    fn test_validate_record_from_struct() {
        #[derive(Serialize)]
        struct Note {
            title: String,
        }

        let ok = Note {
            title: "Lobby".to_string(),
        };
        assert!(validate_record(&title_schema(), &ok, AggregationPolicy::FailFast).is_ok());

        let bad = Note {
            title: "L".to_string(),
        };
        let err = validate_record(&title_schema(), &bad, AggregationPolicy::FailFast).unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }
}
