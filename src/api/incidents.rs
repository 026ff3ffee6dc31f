//! Incident endpoints.

use super::endpoints::{self, fill};
use super::{ApiClient, QueryParams};
use crate::errors::ClientResult;
use crate::models::{
    CreateIncidentRequest, Incident, IncidentFilters, Paginated, UpdateIncidentRequest,
};

impl IncidentFilters {
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .insert_list("status", &self.status)
            .insert_list("severity", &self.severity)
            .insert_list("types", &self.types)
            .insert_opt("dateFrom", self.date_from)
            .insert_opt("dateTo", self.date_to)
            .insert_opt("search", self.search.as_deref().map(str::trim))
            .insert_opt("page", self.page)
            .insert_opt("limit", self.limit);
        params
    }
}

/// GET /incidents - List incidents matching `filters`.
pub async fn get_incidents(
    client: &ApiClient,
    filters: &IncidentFilters,
) -> ClientResult<Paginated<Incident>> {
    client
        .get(&filters.to_query().apply(endpoints::INCIDENTS))
        .await
}

/// GET /incidents/:id - Get a single incident.
pub async fn get_incident(client: &ApiClient, id: &str) -> ClientResult<Incident> {
    client
        .get(&fill(endpoints::INCIDENT_BY_ID, &[("id", id)])?)
        .await
}

/// POST /incidents - File an incident report.
pub async fn create_incident(
    client: &ApiClient,
    request: &CreateIncidentRequest,
) -> ClientResult<Incident> {
    client.post(endpoints::INCIDENTS, request).await
}

/// PATCH /incidents/:id - Update an incident.
pub async fn update_incident(
    client: &ApiClient,
    id: &str,
    request: &UpdateIncidentRequest,
) -> ClientResult<Incident> {
    client
        .patch(&fill(endpoints::INCIDENT_BY_ID, &[("id", id)])?, request)
        .await
}

/// DELETE /incidents/:id - Delete an incident.
pub async fn delete_incident(client: &ApiClient, id: &str) -> ClientResult<()> {
    client
        .delete(&fill(endpoints::INCIDENT_BY_ID, &[("id", id)])?)
        .await
}
