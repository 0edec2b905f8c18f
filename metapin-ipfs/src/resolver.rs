//! The CID-resolution primitive.

use std::sync::Arc;

use tracing::{debug, instrument};

use metapin_core::error::Result;
use metapin_core::traits::NodeConnector;
use metapin_core::types::{validate_node_path, ContentId};

use crate::registry::NodeRegistry;

/// Resolves a node path to the CID currently stored there.
pub struct CidResolver {
    registry: Arc<NodeRegistry>,
    connector: Arc<dyn NodeConnector>,
}

impl CidResolver {
    /// Creates a resolver.
    pub fn new(registry: Arc<NodeRegistry>, connector: Arc<dyn NodeConnector>) -> Self {
        Self {
            registry,
            connector,
        }
    }

    /// Returns the CID at `path` on the node named `node_key`.
    ///
    /// Fails with `PathNotFound` when the node reports the path missing.
    #[instrument(skip(self))]
    pub async fn resolve_cid(&self, node_key: &str, path: &str) -> Result<ContentId> {
        let profile = self.registry.resolve(node_key)?;
        validate_node_path(path)?;

        let node = self.connector.connect(profile)?;
        let stat = node.stat(path).await?;

        debug!(path, cid = %stat.cid, "Resolved CID");
        Ok(stat.cid)
    }
}
