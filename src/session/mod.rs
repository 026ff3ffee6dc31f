//! Session lifecycle: sign-in, restore, profile refresh and sign-out.
//!
//! Ties the auth endpoints to the auth storage group. Stored User Data is
//! created at sign-in, overwritten on profile refresh and removed on sign-out.

use chrono::{DateTime, Duration, Utc};

use crate::api::{auth, ApiClient};
use crate::errors::{ClientError, ClientResult};
use crate::models::LoginRequest;
use crate::schemas::{AggregationPolicy, DEFAULT_SCHEMAS, LOGIN};
use crate::storage::{SessionBundle, StorageHelper, StoredUserData};

/// Absolute expiry for a server-supplied lifetime in seconds. Out of range
/// lifetimes are logged and leave the session without an expiry.
fn expiry_from_now(secs: i64) -> Option<DateTime<Utc>> {
    let expires_at = Duration::try_seconds(secs).and_then(|d| Utc::now().checked_add_signed(d));
    if expires_at.is_none() {
        tracing::warn!("Ignoring out of range token lifetime: {}s", secs);
    }
    expires_at
}

/// Auth state shared between the API client and local storage.
#[derive(Clone)]
pub struct Session {
    api: ApiClient,
    storage: StorageHelper,
}

impl Session {
    pub fn new(api: ApiClient, storage: StorageHelper) -> Self {
        Self { api, storage }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn storage(&self) -> &StorageHelper {
        &self.storage
    }

    /// Validate credentials, log in, persist the auth group and install the
    /// token on the client.
    pub async fn sign_in(&self, request: &LoginRequest) -> ClientResult<StoredUserData> {
        DEFAULT_SCHEMAS.validate(
            LOGIN,
            &serde_json::to_value(request)?,
            AggregationPolicy::FailFast,
        )?;

        let response = auth::login(&self.api, request).await?;
        let bundle = SessionBundle {
            token: response.token,
            refresh_token: response.refresh_token,
            expires_at: response.expires_in.and_then(expiry_from_now),
            user: response.user,
        };

        self.storage.save_session(&bundle).await?;
        self.api.set_auth_token(Some(bundle.token)).await;

        tracing::info!(user_id = %bundle.user.id, "Signed in");
        Ok(bundle.user)
    }

    /// Reinstall a persisted session. Expired sessions and tokens without
    /// user data are cleared.
    pub async fn restore(&self) -> ClientResult<Option<StoredUserData>> {
        let Some(token) = self.storage.auth_token().await? else {
            return Ok(None);
        };

        if let Some(expires_at) = self.storage.token_expiry().await? {
            if expires_at <= Utc::now() {
                tracing::info!("Stored session expired at {}", expires_at);
                self.storage.clear_auth().await?;
                return Ok(None);
            }
        }

        let Some(user) = self.storage.load_user_data().await? else {
            tracing::info!("Stored token has no user data, clearing session");
            self.storage.clear_auth().await?;
            return Ok(None);
        };

        self.api.set_auth_token(Some(token)).await;
        Ok(Some(user))
    }

    /// Fetch the profile and overwrite the stored snapshot.
    pub async fn refresh_profile(&self) -> ClientResult<StoredUserData> {
        let user = auth::get_profile(&self.api).await?;
        self.storage.save_user_data(&user).await?;
        Ok(user)
    }

    /// Trade the stored refresh token for a new access token.
    pub async fn refresh_token(&self) -> ClientResult<()> {
        let refresh = self.storage.refresh_token().await?.ok_or_else(|| {
            ClientError::InvalidRequest("No refresh token stored".to_string())
        })?;

        let response = auth::refresh_token(&self.api, &refresh).await?;
        let user = self.storage.load_user_data().await?.ok_or_else(|| {
            ClientError::InvalidRequest("No stored user for session refresh".to_string())
        })?;

        let bundle = SessionBundle {
            token: response.token,
            refresh_token: response.refresh_token.or(Some(refresh)),
            expires_at: response.expires_in.and_then(expiry_from_now),
            user,
        };
        self.storage.save_session(&bundle).await?;
        self.api.set_auth_token(Some(bundle.token)).await;
        Ok(())
    }

    /// Sign out. The server call is best effort; local state is always
    /// cleared.
    pub async fn sign_out(&self) -> ClientResult<()> {
        if let Err(e) = auth::logout(&self.api).await {
            tracing::warn!("Logout request failed: {}", e);
        }
        self.api.set_auth_token(None).await;
        self.storage.clear_auth().await?;
        tracing::info!("Signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_from_now() {
        let expires_at = expiry_from_now(3600).unwrap();
        let remaining = expires_at - Utc::now();
        assert!(remaining > Duration::minutes(59));
        assert!(remaining <= Duration::hours(1));
    }

    #[test]
    fn test_expiry_out_of_range_is_dropped() {
        assert_eq!(expiry_from_now(i64::MAX), None);
        assert_eq!(expiry_from_now(i64::MIN), None);
    }
}
