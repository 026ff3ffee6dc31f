//! NFC checkpoint tag endpoints.

use super::endpoints::{self, fill};
use super::{ApiClient, QueryParams};
use crate::errors::ClientResult;
use crate::models::{
    NfcScan, NfcScanFilters, NfcScanResult, NfcTag, Paginated, RegisterNfcTagRequest,
    UpdateNfcTagRequest,
};

impl NfcScanFilters {
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .insert_opt("tagId", self.tag_id.as_deref())
            .insert_opt("userId", self.user_id.as_deref())
            .insert_opt("dateFrom", self.date_from)
            .insert_opt("dateTo", self.date_to)
            .insert_opt("page", self.page)
            .insert_opt("limit", self.limit);
        params
    }
}

/// GET /nfc/tags - List registered tags.
pub async fn get_nfc_tags(client: &ApiClient) -> ClientResult<Vec<NfcTag>> {
    client.get(endpoints::NFC_TAGS).await
}

/// GET /nfc/tags/:id - Get a single tag.
pub async fn get_nfc_tag(client: &ApiClient, id: &str) -> ClientResult<NfcTag> {
    client
        .get(&fill(endpoints::NFC_TAG_BY_ID, &[("id", id)])?)
        .await
}

/// POST /nfc/tags/:tagId/scan - Record a scan of the tag with hardware id `tag_id`.
pub async fn scan_nfc_tag(client: &ApiClient, tag_id: &str) -> ClientResult<NfcScanResult> {
    client
        .post_empty(&fill(endpoints::NFC_TAG_SCAN, &[("tagId", tag_id)])?)
        .await
}

/// POST /nfc/tags - Register a new tag.
pub async fn register_nfc_tag(
    client: &ApiClient,
    request: &RegisterNfcTagRequest,
) -> ClientResult<NfcTag> {
    client.post(endpoints::NFC_TAGS, request).await
}

/// PATCH /nfc/tags/:id - Update a tag.
pub async fn update_nfc_tag(
    client: &ApiClient,
    id: &str,
    request: &UpdateNfcTagRequest,
) -> ClientResult<NfcTag> {
    client
        .patch(&fill(endpoints::NFC_TAG_BY_ID, &[("id", id)])?, request)
        .await
}

/// DELETE /nfc/tags/:id - Remove a tag.
pub async fn delete_nfc_tag(client: &ApiClient, id: &str) -> ClientResult<()> {
    client
        .delete(&fill(endpoints::NFC_TAG_BY_ID, &[("id", id)])?)
        .await
}

/// GET /nfc/scans - Scan history.
pub async fn get_scan_history(
    client: &ApiClient,
    filters: &NfcScanFilters,
) -> ClientResult<Paginated<NfcScan>> {
    client
        .get(&filters.to_query().apply(endpoints::NFC_SCANS))
        .await
}
