//! Kubo RPC API client.
//!
//! Every command is a `POST <base>/api/v0/<command>` with arguments in the
//! query string. Profile headers ride on every request, which is how hosted
//! nodes take their bearer tokens or basic auth.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use metapin_core::constants::KUBO_API_PREFIX;
use metapin_core::error::{MetapinError, Result};
use metapin_core::traits::{NodeConnector, StorageNode};
use metapin_core::types::{ContentId, EntryKind, NodeProfile, PathStat, WriteOptions};

use crate::config::ClientSettings;

/// A storage node reached over the Kubo RPC API.
pub struct KuboNode {
    key: String,
    api_base: String,
    http_client: reqwest::Client,
}

impl KuboNode {
    /// Creates a client for `profile`. No request is made.
    pub fn new(profile: &NodeProfile, settings: &ClientSettings) -> Result<Self> {
        let api_base = api_base(&profile.url)?;
        let http_client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .default_headers(header_map(profile)?)
            .build()
            .map_err(|e| MetapinError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            key: profile.key.clone(),
            api_base,
            http_client,
        })
    }

    /// Base URL commands are appended to (ends in `/api/v0` unless the profile named a path).
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn endpoint(&self, command: &str) -> String {
        format!("{}/{}", self.api_base, command)
    }

    async fn send(
        &self,
        command: &str,
        target: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            MetapinError::UploadTransport(format!("{command} {target} on '{}': {e}", self.key))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<KuboError>(&text)
            .map(|e| e.message)
            .unwrap_or(text);

        if command == "files/stat" && message.contains("does not exist") {
            return Err(MetapinError::PathNotFound(target.to_string()));
        }

        Err(MetapinError::UploadTransport(format!(
            "{command} {target} on '{}' failed with status {status}: {message}",
            self.key
        )))
    }
}

#[async_trait]
impl StorageNode for KuboNode {
    #[instrument(skip(self, data, options), fields(node = %self.key, bytes = data.len()))]
    async fn write(&self, path: &str, data: Bytes, options: &WriteOptions) -> Result<()> {
        let file_name = path.rsplit('/').next().unwrap_or(path).to_string();
        let part = reqwest::multipart::Part::bytes(data.to_vec())
            .file_name(file_name)
            .mime_str("application/octet-stream")
            .map_err(|e| MetapinError::UploadTransport(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let query = [
            ("arg", path.to_string()),
            ("create", options.create.to_string()),
            ("parents", options.parents.to_string()),
            ("truncate", options.truncate.to_string()),
            ("cid-version", options.cid_version.to_string()),
            ("hash", options.hash.to_string()),
        ];

        let request = self
            .http_client
            .post(self.endpoint("files/write"))
            .query(&query)
            .multipart(form);
        self.send("files/write", path, request).await?;

        debug!(path, "Wrote file to node");
        Ok(())
    }

    #[instrument(skip(self), fields(node = %self.key))]
    async fn stat(&self, path: &str) -> Result<PathStat> {
        let request = self
            .http_client
            .post(self.endpoint("files/stat"))
            .query(&[("arg", path)]);
        let response = self.send("files/stat", path, request).await?;

        let stat: StatResponse = response.json().await.map_err(|e| {
            MetapinError::UploadTransport(format!("malformed files/stat response for {path}: {e}"))
        })?;

        debug!(path, cid = %stat.hash, "Stat path");
        Ok(PathStat {
            cid: ContentId::parse(&stat.hash)?,
            size: stat.size,
            cumulative_size: stat.cumulative_size,
            kind: if stat.kind == "directory" {
                EntryKind::Directory
            } else {
                EntryKind::File
            },
        })
    }

    #[instrument(skip(self), fields(node = %self.key))]
    async fn pin(&self, cid: &ContentId) -> Result<()> {
        let request = self
            .http_client
            .post(self.endpoint("pin/add"))
            .query(&[("arg", cid.as_str())]);
        self.send("pin/add", cid.as_str(), request).await?;

        debug!(%cid, "Pinned on node");
        Ok(())
    }
}

/// Connects profiles to [`KuboNode`]s.
#[derive(Clone, Debug, Default)]
pub struct KuboConnector {
    settings: ClientSettings,
}

impl KuboConnector {
    /// Creates a connector with the given client settings.
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }
}

impl NodeConnector for KuboConnector {
    fn connect(&self, profile: &NodeProfile) -> Result<Arc<dyn StorageNode>> {
        Ok(Arc::new(KuboNode::new(profile, &self.settings)?))
    }
}

fn api_base(url: &str) -> Result<String> {
    let mut parsed = Url::parse(url)
        .map_err(|e| MetapinError::Config(format!("invalid node URL '{url}': {e}")))?;
    if parsed.path().trim_end_matches('/').is_empty() {
        parsed.set_path(KUBO_API_PREFIX);
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

fn header_map(profile: &NodeProfile) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in &profile.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            MetapinError::Config(format!("invalid header name '{name}' for node '{}': {e}", profile.key))
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| {
            MetapinError::Config(format!("invalid value for header '{name}' on node '{}': {e}", profile.key))
        })?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct KuboError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StatResponse {
    hash: String,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    cumulative_size: u64,
    #[serde(rename = "Type", default)]
    kind: String,
}
