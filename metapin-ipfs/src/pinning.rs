//! Pinning-service mirror (nft.storage compatible).
//!
//! Uploads the raw bytes to `<endpoint>/upload` with a bearer token and
//! reads the assigned CID back from `{"ok": true, "value": {"cid": ...}}`.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use tracing::{debug, instrument};

use metapin_core::error::{MetapinError, Result};
use metapin_core::traits::PinningService;
use metapin_core::types::ContentId;

use crate::config::{ClientSettings, PinningSettings};

/// Client for the secondary pinning service.
pub struct PinningClient {
    endpoint: String,
    token: String,
    http_client: reqwest::Client,
}

impl PinningClient {
    /// Creates a client, or `None` when no token is configured.
    pub fn from_settings(settings: &PinningSettings, client: &ClientSettings) -> Result<Option<Self>> {
        let Some(token) = settings.active_token() else {
            debug!("Pinning token absent, mirroring disabled");
            return Ok(None);
        };

        let http_client = reqwest::Client::builder()
            .timeout(client.timeout())
            .build()
            .map_err(|e| MetapinError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Some(Self {
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            token: token.to_string(),
            http_client,
        }))
    }
}

#[async_trait]
impl PinningService for PinningClient {
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    async fn store_blob(&self, data: Bytes) -> Result<ContentId> {
        let response = self
            .http_client
            .post(format!("{}/upload", self.endpoint))
            .bearer_auth(&self.token)
            .header("Content-Type", "application/octet-stream")
            .body(data)
            .send()
            .await
            .map_err(|e| MetapinError::UploadTransport(format!("pinning service: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(MetapinError::UploadTransport(format!(
                "pinning service upload failed with status {status}: {text}"
            )));
        }

        let json: StoreResponse = response
            .json()
            .await
            .map_err(|e| MetapinError::UploadTransport(format!("pinning service: {e}")))?;

        if !json.ok {
            return Err(MetapinError::UploadTransport(
                "pinning service rejected the upload".into(),
            ));
        }

        debug!(cid = %json.value.cid, "Mirrored to pinning service");
        ContentId::parse(&json.value.cid)
    }
}

#[derive(Debug, Deserialize)]
struct StoreResponse {
    ok: bool,
    value: StoreValue,
}

#[derive(Debug, Deserialize)]
struct StoreValue {
    cid: String,
}
