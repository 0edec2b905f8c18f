//! Common traits for metapin.
//!
//! Seams between the publishing pipeline and the outside world. The HTTP
//! clients and the in-memory node both implement them.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::types::{ContentId, NodeProfile, PathStat, WriteOptions};

// ═══════════════════════════════════════════════════════════════════════════════
// STORAGE NODE
// ═══════════════════════════════════════════════════════════════════════════════

/// A storage node's mutable file tree (MFS in Kubo terms).
///
/// Implementations map transport failures to `UploadTransport` and a missing
/// path on `stat` to `PathNotFound`.
#[async_trait]
pub trait StorageNode: Send + Sync {
    /// Writes `data` to `path`.
    async fn write(&self, path: &str, data: Bytes, options: &WriteOptions) -> Result<()>;

    /// Reads back the entry at `path`.
    async fn stat(&self, path: &str) -> Result<PathStat>;

    /// Pins `cid` so the node does not garbage-collect it.
    async fn pin(&self, cid: &ContentId) -> Result<()>;
}

/// Opens a [`StorageNode`] for a resolved profile.
///
/// Connecting must not touch the network; the first request happens on the
/// first node call.
pub trait NodeConnector: Send + Sync {
    /// Returns a node handle for `profile`.
    fn connect(&self, profile: &NodeProfile) -> Result<Arc<dyn StorageNode>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// PINNING SERVICE
// ═══════════════════════════════════════════════════════════════════════════════

/// Secondary durability mirror for uploaded bytes.
#[async_trait]
pub trait PinningService: Send + Sync {
    /// Stores `data` and returns the CID the service assigned.
    async fn store_blob(&self, data: Bytes) -> Result<ContentId>;
}
