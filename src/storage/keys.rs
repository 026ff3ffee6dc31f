//! Storage key constants.
//!
//! Every key lives under one namespace prefix. The groups are documentation
//! plus the membership of the batch clears; nothing else ties keys together.

pub const DEFAULT_PREFIX: &str = "@patrol:";

// Auth
pub const AUTH_TOKEN: &str = "auth_token";
pub const REFRESH_TOKEN: &str = "refresh_token";
pub const USER_DATA: &str = "user_data";
pub const TOKEN_EXPIRY: &str = "token_expiry";

// Preferences
pub const THEME: &str = "theme";
pub const LANGUAGE: &str = "language";
pub const NOTIFICATIONS_ENABLED: &str = "notifications_enabled";
pub const BIOMETRIC_ENABLED: &str = "biometric_enabled";

// Cache
pub const ACTIVITIES_CACHE: &str = "activities_cache";
pub const NFC_TAGS_CACHE: &str = "nfc_tags_cache";
pub const LAST_SYNC: &str = "last_sync";

// App state
pub const ONBOARDING_COMPLETE: &str = "onboarding_complete";
pub const LAST_ACTIVE_TAB: &str = "last_active_tab";
pub const APP_VERSION: &str = "app_version";

pub const AUTH_GROUP: [&str; 4] = [AUTH_TOKEN, REFRESH_TOKEN, USER_DATA, TOKEN_EXPIRY];
pub const PREFERENCES_GROUP: [&str; 4] =
    [THEME, LANGUAGE, NOTIFICATIONS_ENABLED, BIOMETRIC_ENABLED];
pub const CACHE_GROUP: [&str; 3] = [ACTIVITIES_CACHE, NFC_TAGS_CACHE, LAST_SYNC];
pub const APP_STATE_GROUP: [&str; 3] = [ONBOARDING_COMPLETE, LAST_ACTIVE_TAB, APP_VERSION];

/// Resolves bare key names to their namespaced form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    prefix: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl StorageKeys {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    pub fn auth(&self) -> Vec<String> {
        self.group(&AUTH_GROUP)
    }

    pub fn preferences(&self) -> Vec<String> {
        self.group(&PREFERENCES_GROUP)
    }

    pub fn cache(&self) -> Vec<String> {
        self.group(&CACHE_GROUP)
    }

    pub fn app_state(&self) -> Vec<String> {
        self.group(&APP_STATE_GROUP)
    }

    fn group(&self, names: &[&str]) -> Vec<String> {
        names.iter().map(|name| self.key(name)).collect()
    }
}
