//! Storage-node profiles and the shapes exchanged with a node.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{CID_VERSION, HASH_ALGORITHM};
use crate::types::ContentId;

/// Connection profile of a storage node.
///
/// Profiles are loaded once at start and never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeProfile {
    /// Registry key; filled in from the key of the node file entry.
    #[serde(default, skip_serializing)]
    pub key: String,
    /// Base URL of the node's RPC endpoint (e.g. "http://127.0.0.1:5001").
    pub url: String,
    /// Headers sent with every request (bearer tokens, basic auth).
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Public gateway prefix (e.g. "https://ipfs.io/ipfs").
    #[serde(default)]
    pub gateway: String,
}

impl NodeProfile {
    /// Creates a profile without headers or gateway.
    pub fn new(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
            headers: BTreeMap::new(),
            gateway: String::new(),
        }
    }

    /// Adds a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the public gateway prefix.
    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = gateway.into();
        self
    }

    /// Public gateway URL for a CID, if a gateway is configured.
    pub fn gateway_url(&self, cid: &ContentId) -> Option<String> {
        let gateway = self.gateway.trim_end_matches('/');
        if gateway.is_empty() {
            None
        } else {
            Some(format!("{gateway}/{cid}"))
        }
    }
}

/// Options for a node-side file write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    /// Create the file if it does not exist.
    pub create: bool,
    /// Create missing parent directories.
    pub parents: bool,
    /// Truncate existing content before writing.
    pub truncate: bool,
    /// CID version of the resulting file.
    pub cid_version: u8,
    /// Hash algorithm of the resulting file.
    pub hash: &'static str,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            create: true,
            parents: true,
            truncate: true,
            cid_version: CID_VERSION,
            hash: HASH_ALGORITHM,
        }
    }
}

/// Kind of entry at a node path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
}

/// Result of a stat against a node path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathStat {
    /// CID of the entry.
    pub cid: ContentId,
    /// Size of the entry's own data.
    pub size: u64,
    /// Size including all children.
    pub cumulative_size: u64,
    /// File or directory.
    pub kind: EntryKind,
}

/// Validates that a node path is absolute and `/`-separated.
pub fn validate_node_path(path: &str) -> crate::Result<()> {
    if !path.starts_with('/') {
        return Err(crate::MetapinError::Validation(format!(
            "node path must be absolute: '{path}'"
        )));
    }
    if path.contains('\\') || path.split('/').any(|segment| segment == "..") {
        return Err(crate::MetapinError::Validation(format!(
            "node path must use '/' segments without '..': '{path}'"
        )));
    }
    Ok(())
}
