//! Activity feed endpoints.

use super::endpoints::{self, fill};
use super::{ApiClient, QueryParams};
use crate::errors::ClientResult;
use crate::models::{Activity, ActivityFilters, ActivityTypeOption, CreateActivityRequest, Paginated};

impl ActivityFilters {
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .insert_opt("dateFrom", self.date_from)
            .insert_opt("dateTo", self.date_to)
            .insert_list("types", &self.types)
            .insert_opt("search", self.search.as_deref().map(str::trim))
            .insert_opt("userId", self.user_id.as_deref())
            .insert_opt("page", self.page)
            .insert_opt("limit", self.limit);
        params
    }
}

/// GET /activities - List activities matching `filters`.
pub async fn get_activities(
    client: &ApiClient,
    filters: &ActivityFilters,
) -> ClientResult<Paginated<Activity>> {
    client
        .get(&filters.to_query().apply(endpoints::ACTIVITIES))
        .await
}

/// GET /activities/:id - Get a single activity.
pub async fn get_activity(client: &ApiClient, id: &str) -> ClientResult<Activity> {
    client
        .get(&fill(endpoints::ACTIVITY_BY_ID, &[("id", id)])?)
        .await
}

/// POST /activities - Log a new activity.
pub async fn create_activity(
    client: &ApiClient,
    request: &CreateActivityRequest,
) -> ClientResult<Activity> {
    client.post(endpoints::ACTIVITIES, request).await
}

/// GET /activities/types - List selectable activity types.
pub async fn get_activity_types(client: &ApiClient) -> ClientResult<Vec<ActivityTypeOption>> {
    client.get(endpoints::ACTIVITY_TYPES).await
}
