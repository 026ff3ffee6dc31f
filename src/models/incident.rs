//! Incident models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ClientResult;
use crate::schemas::{
    validate_record, AggregationPolicy, IncidentStatus, IncidentType, Severity, DEFAULT_SCHEMAS,
    INCIDENT_LOG, INCIDENT_REPORT,
};

/// An incident as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub severity: Severity,
    pub status: IncidentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reported_by: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Optional filters for the incident list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentFilters {
    pub status: Vec<IncidentStatus>,
    pub severity: Vec<Severity>,
    pub types: Vec<IncidentType>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Request body for filing an incident report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentRequest {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
}

impl CreateIncidentRequest {
    /// Check the request against the incident report form rules.
    pub fn validate(&self, policy: AggregationPolicy) -> ClientResult<()> {
        DEFAULT_SCHEMAS.validate(INCIDENT_REPORT, &serde_json::to_value(self)?, policy)
    }
}

/// Log entry update: status changes, notes, corrections.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncidentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IncidentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UpdateIncidentRequest {
    /// Check the update, merged over the current incident, against the
    /// incident log rules. Partial updates are judged by their result.
    pub fn validate_against(&self, current: &Incident, policy: AggregationPolicy) -> ClientResult<()> {
        let mut merged = serde_json::to_value(current)?;
        if let (Some(target), serde_json::Value::Object(changes)) =
            (merged.as_object_mut(), serde_json::to_value(self)?)
        {
            target.extend(changes);
        }
        match DEFAULT_SCHEMAS.get(INCIDENT_LOG) {
            Some(schema) => validate_record(schema, &merged, policy),
            None => Ok(()),
        }
    }
}
