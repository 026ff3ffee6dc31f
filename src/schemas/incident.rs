//! Incident form schemas.
//!
//! Both incident variants are built from one base rule set so shared fields
//! cannot drift apart.

use super::options::{IncidentStatus, IncidentType, Severity};
use super::rules::{EntitySchema, FieldRule};

pub const INCIDENT_REPORT: &str = "incidentReport";
pub const INCIDENT_LOG: &str = "incidentLog";
pub const LOGIN: &str = "login";

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX: usize = 1000;
pub const LOCATION_MAX: usize = 200;
pub const NOTES_MAX: usize = 500;

/// Rules shared by every incident variant.
pub fn incident_base() -> EntitySchema {
    EntitySchema::new("incidentBase")
        .rule(
            "title",
            FieldRule::new("Title must be between 3 and 100 characters")
                .required()
                .length(TITLE_MIN, TITLE_MAX),
        )
        .rule(
            "description",
            FieldRule::new("Description must be between 10 and 1000 characters")
                .required()
                .length(DESCRIPTION_MIN, DESCRIPTION_MAX),
        )
        .rule(
            "location",
            FieldRule::new("Location must be at most 200 characters").max_length(LOCATION_MAX),
        )
}

/// Form filed by a guard in the field.
pub fn incident_report() -> EntitySchema {
    EntitySchema::new(INCIDENT_REPORT)
        .rule(
            "type",
            FieldRule::new("Please select an incident type")
                .required()
                .one_of(IncidentType::values()),
        )
        .rule(
            "severity",
            FieldRule::new("Please select a severity level")
                .required()
                .one_of(Severity::values()),
        )
        .rule(
            "location",
            FieldRule::new("Location is required (max 200 characters)")
                .required()
                .max_length(LOCATION_MAX),
        )
        .extend(&incident_base())
}

/// Supervisor log entry tracking an incident's lifecycle.
pub fn incident_log() -> EntitySchema {
    EntitySchema::new(INCIDENT_LOG)
        .rule(
            "status",
            FieldRule::new("Please select a status")
                .required()
                .one_of(IncidentStatus::values()),
        )
        .rule(
            "severity",
            FieldRule::new("Invalid severity level").one_of(Severity::values()),
        )
        .rule(
            "notes",
            FieldRule::new("Notes must be at most 500 characters").max_length(NOTES_MAX),
        )
        .extend(&incident_base())
}

pub fn login() -> EntitySchema {
    EntitySchema::new(LOGIN)
        .rule(
            "email",
            FieldRule::new("Email is required").required().max_length(254),
        )
        .rule(
            "password",
            FieldRule::new("Password must be at least 6 characters")
                .required()
                .length(6, 128),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::rules::AggregationPolicy;
    use serde_json::{json, Value};

    fn valid_report() -> Value {
        json!({
            "title": "Broken gate",
            "description": "North gate latch is broken and will not close.",
            "type": "security",
            "severity": "high",
            "location": "North gate"
        })
    }

    fn valid_log() -> Value {
        json!({
            "title": "Broken gate",
            "description": "North gate latch is broken and will not close.",
            "status": "open"
        })
    }

    fn without(mut record: Value, field: &str) -> Value {
        record.as_object_mut().unwrap().remove(field);
        record
    }

    fn with(mut record: Value, field: &str, value: Value) -> Value {
        record[field] = value;
        record
    }

    #[test]
    fn test_valid_records_pass() {
        assert!(incident_report()
            .validate(&valid_report(), AggregationPolicy::CollectAll)
            .is_ok());
        assert!(incident_log()
            .validate(&valid_log(), AggregationPolicy::CollectAll)
            .is_ok());
    }

    #[test]
    fn test_every_required_field_reports_its_message() {
        for (schema, record) in [
            (incident_report(), valid_report()),
            (incident_log(), valid_log()),
            (
                login(),
                json!({ "email": "a@b.co", "password": "secret1" }),
            ),
        ] {
            for (field, rule) in schema.fields().filter(|(_, r)| r.required) {
                let errors = schema
                    .validate(&without(record.clone(), field), AggregationPolicy::CollectAll)
                    .unwrap_err();
                assert_eq!(errors.len(), 1, "{}.{}", schema.name, field);
                assert_eq!(errors.first().field, field);
                assert_eq!(errors.first().message, rule.message);
            }
        }
    }

    #[test]
    fn test_max_length_boundaries() {
        for (schema, record) in [
            (incident_report(), valid_report()),
            (incident_log(), valid_log()),
        ] {
            for (field, rule) in schema.fields() {
                let Some(max) = rule.max_length else { continue };
                let at_limit = with(record.clone(), field, json!("x".repeat(max)));
                let over = with(record.clone(), field, json!("x".repeat(max + 1)));
                // Enum fields never carry a length bound in these tables
                assert!(
                    schema.validate(&at_limit, AggregationPolicy::CollectAll).is_ok(),
                    "{}.{} at {}",
                    schema.name,
                    field,
                    max
                );
                assert!(
                    schema.validate(&over, AggregationPolicy::CollectAll).is_err(),
                    "{}.{} over {}",
                    schema.name,
                    field,
                    max
                );
            }
        }
    }

    #[test]
    fn test_enum_domains() {
        for (schema, record) in [
            (incident_report(), valid_report()),
            (incident_log(), valid_log()),
        ] {
            for (field, rule) in schema.fields() {
                let Some(allowed) = &rule.allowed else { continue };
                for value in allowed {
                    let record = with(record.clone(), field, json!(value));
                    assert!(schema
                        .validate(&record, AggregationPolicy::CollectAll)
                        .is_ok());
                }
                let bad = with(record.clone(), field, json!("not-a-member"));
                let errors = schema
                    .validate(&bad, AggregationPolicy::CollectAll)
                    .unwrap_err();
                assert_eq!(errors.first().field, field);
            }
        }
    }

    #[test]
    fn test_variants_share_base_rules() {
        let report = incident_report();
        let log = incident_log();
        assert_eq!(report.get("title"), log.get("title"));
        assert_eq!(report.get("description"), log.get("description"));
        assert!(report.get("location").unwrap().required);
        assert!(!log.get("location").unwrap().required);
        assert!(report.get("status").is_none());
        assert!(log.get("type").is_none());
    }

    #[test]
    fn test_schemas_are_consistent() {
        for schema in [incident_base(), incident_report(), incident_log(), login()] {
            schema.check_integrity().unwrap();
        }
    }
}
