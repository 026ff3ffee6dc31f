//! Authentication endpoints.

use super::endpoints;
use super::ApiClient;
use crate::errors::ClientResult;
use crate::models::{AuthResponse, LoginRequest, RefreshRequest, RefreshResponse};
use crate::storage::StoredUserData;

/// POST /auth/login
pub async fn login(client: &ApiClient, request: &LoginRequest) -> ClientResult<AuthResponse> {
    client.post(endpoints::AUTH_LOGIN, request).await
}

/// POST /auth/logout
pub async fn logout(client: &ApiClient) -> ClientResult<()> {
    client.post_empty(endpoints::AUTH_LOGOUT).await
}

/// POST /auth/refresh
pub async fn refresh_token(client: &ApiClient, refresh_token: &str) -> ClientResult<RefreshResponse> {
    let request = RefreshRequest {
        refresh_token: refresh_token.to_string(),
    };
    client.post(endpoints::AUTH_REFRESH, &request).await
}

/// GET /auth/me - Profile of the signed-in user.
pub async fn get_profile(client: &ApiClient) -> ClientResult<StoredUserData> {
    client.get(endpoints::AUTH_PROFILE).await
}
