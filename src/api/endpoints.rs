//! Backend resource paths.
//!
//! `:name` segments are placeholders filled by [`fill`].

use crate::errors::{ClientError, ClientResult};

pub const AUTH_LOGIN: &str = "/auth/login";
pub const AUTH_LOGOUT: &str = "/auth/logout";
pub const AUTH_REFRESH: &str = "/auth/refresh";
pub const AUTH_PROFILE: &str = "/auth/me";

pub const ACTIVITIES: &str = "/activities";
pub const ACTIVITY_BY_ID: &str = "/activities/:id";
pub const ACTIVITY_TYPES: &str = "/activities/types";

pub const NFC_TAGS: &str = "/nfc/tags";
pub const NFC_TAG_BY_ID: &str = "/nfc/tags/:id";
pub const NFC_TAG_SCAN: &str = "/nfc/tags/:tagId/scan";
pub const NFC_SCANS: &str = "/nfc/scans";

pub const INCIDENTS: &str = "/incidents";
pub const INCIDENT_BY_ID: &str = "/incidents/:id";

/// Substitute every `:name` segment of `template`.
///
/// Values are percent-encoded as given so an id can never add path segments.
/// A placeholder without a value, or with a blank one, is an error.
pub fn fill(template: &str, params: &[(&str, &str)]) -> ClientResult<String> {
    let segments = template
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => {
                let value = params
                    .iter()
                    .find(|(k, _)| *k == name)
                    .map(|(_, v)| *v)
                    .filter(|v| !v.trim().is_empty())
                    .ok_or_else(|| {
                        ClientError::InvalidRequest(format!(
                            "Missing path parameter '{}' for {}",
                            name, template
                        ))
                    })?;
                Ok(urlencoding::encode(value).into_owned())
            }
            None => Ok(segment.to_string()),
        })
        .collect::<ClientResult<Vec<_>>>()?;

    Ok(segments.join("/"))
}
