//! Locally persisted session snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::helper::StorageHelper;
use super::keys;
use crate::errors::ClientResult;

/// Denormalized user fields kept on the device for the current session.
///
/// There is no version field: unknown fields are ignored and missing
/// optional fields read as `None`, so older snapshots keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUserData {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Everything written to the auth group at sign-in.
#[derive(Debug, Clone)]
pub struct SessionBundle {
    pub token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub user: StoredUserData,
}

impl StorageHelper {
    pub async fn save_user_data(&self, user: &StoredUserData) -> ClientResult<()> {
        let key = self.keys().key(keys::USER_DATA);
        self.set_json(&key, user).await
    }

    pub async fn load_user_data(&self) -> ClientResult<Option<StoredUserData>> {
        let key = self.keys().key(keys::USER_DATA);
        self.get_json(&key).await
    }

    pub async fn auth_token(&self) -> ClientResult<Option<String>> {
        self.get_string(&self.keys().key(keys::AUTH_TOKEN)).await
    }

    pub async fn refresh_token(&self) -> ClientResult<Option<String>> {
        self.get_string(&self.keys().key(keys::REFRESH_TOKEN)).await
    }

    /// Expiry of the stored token. An unparseable value reads as already
    /// expired.
    pub async fn token_expiry(&self) -> ClientResult<Option<DateTime<Utc>>> {
        let Some(raw) = self.get_string(&self.keys().key(keys::TOKEN_EXPIRY)).await? else {
            return Ok(None);
        };

        match DateTime::parse_from_rfc3339(&raw) {
            Ok(dt) => Ok(Some(dt.with_timezone(&Utc))),
            Err(e) => {
                tracing::warn!("Unreadable token expiry {:?}: {}", raw, e);
                Ok(Some(DateTime::<Utc>::MIN_UTC))
            }
        }
    }

    /// Persist the auth group. Missing optional parts are removed so a stale
    /// refresh token from an earlier session cannot linger.
    pub async fn save_session(&self, session: &SessionBundle) -> ClientResult<()> {
        let k = self.keys();
        self.set_string(&k.key(keys::AUTH_TOKEN), &session.token)
            .await?;

        match &session.refresh_token {
            Some(token) => self.set_string(&k.key(keys::REFRESH_TOKEN), token).await?,
            None => self.remove(&k.key(keys::REFRESH_TOKEN)).await?,
        }

        match session.expires_at {
            Some(at) => {
                self.set_string(&k.key(keys::TOKEN_EXPIRY), &at.to_rfc3339())
                    .await?
            }
            None => self.remove(&k.key(keys::TOKEN_EXPIRY)).await?,
        }

        self.save_user_data(&session.user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, StorageKeys};
    use std::sync::Arc;

    fn helper() -> StorageHelper {
        StorageHelper::new(Arc::new(MemoryStorage::new()), StorageKeys::default())
    }

    fn user() -> StoredUserData {
        StoredUserData {
            id: "u-1".to_string(),
            name: "Dana Guard".to_string(),
            email: "dana@example.com".to_string(),
            role: "guard".to_string(),
            organization_id: Some("org-9".to_string()),
            organization_name: None,
            avatar_url: None,
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_user_data_roundtrip() {
        let storage = helper();
        assert_eq!(storage.load_user_data().await.unwrap(), None);

        storage.save_user_data(&user()).await.unwrap();
        assert_eq!(storage.load_user_data().await.unwrap(), Some(user()));
    }

    #[tokio::test]
    async fn test_user_data_tolerates_schema_drift() {
        let storage = helper();
        let key = storage.keys().key(keys::USER_DATA);
        storage
            .set_string(
                &key,
                r#"{"id":"u-2","name":"Sam","email":"s@example.com","shift":"night"}"#,
            )
            .await
            .unwrap();

        let loaded = storage.load_user_data().await.unwrap().unwrap();
        assert_eq!(loaded.id, "u-2");
        assert_eq!(loaded.role, "");
        assert_eq!(loaded.organization_id, None);
    }

    #[tokio::test]
    async fn test_save_session_then_clear_auth() {
        let storage = helper();
        let expires = DateTime::parse_from_rfc3339("2030-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        storage
            .save_session(&SessionBundle {
                token: "tok".to_string(),
                refresh_token: Some("ref".to_string()),
                expires_at: Some(expires),
                user: user(),
            })
            .await
            .unwrap();

        assert_eq!(storage.auth_token().await.unwrap().as_deref(), Some("tok"));
        assert_eq!(storage.refresh_token().await.unwrap().as_deref(), Some("ref"));
        assert_eq!(storage.token_expiry().await.unwrap(), Some(expires));

        storage.clear_auth().await.unwrap();
        assert_eq!(storage.auth_token().await.unwrap(), None);
        assert_eq!(storage.load_user_data().await.unwrap(), None);
        assert_eq!(storage.token_expiry().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unreadable_expiry_reads_as_expired() {
        let storage = helper();
        let key = storage.keys().key(keys::TOKEN_EXPIRY);
        storage.set_string(&key, "next tuesday").await.unwrap();

        let expiry = storage.token_expiry().await.unwrap().unwrap();
        assert!(expiry < Utc::now());
    }
}
