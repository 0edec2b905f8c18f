//! The upload primitive.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use metapin_core::error::{MetapinError, Result};
use metapin_core::traits::{NodeConnector, PinningService};
use metapin_core::types::{validate_node_path, ContentId, Payload, WriteOptions};

use crate::registry::NodeRegistry;

/// Writes content to a storage node and returns its CID.
///
/// # Flow
/// 1. Resolve the node profile (fails before any network call)
/// 2. Write the bytes with parents created and the CIDv1/SHA-256 policy
/// 3. Mirror to the pinning service when asked and enabled
/// 4. Stat the path to read back the canonical CID
/// 5. Pin that CID on the node
///
/// Uploads are idempotent: the same bytes at the same path give the same CID.
pub struct ContentUploader {
    registry: Arc<NodeRegistry>,
    connector: Arc<dyn NodeConnector>,
    pinning: Option<Arc<dyn PinningService>>,
}

impl ContentUploader {
    /// Creates an uploader without a pinning mirror.
    pub fn new(registry: Arc<NodeRegistry>, connector: Arc<dyn NodeConnector>) -> Self {
        Self {
            registry,
            connector,
            pinning: None,
        }
    }

    /// Enables mirroring to `pinning`.
    pub fn with_pinning(mut self, pinning: Arc<dyn PinningService>) -> Self {
        self.pinning = Some(pinning);
        self
    }

    /// Whether `mirror = true` uploads reach a pinning service.
    pub fn pinning_enabled(&self) -> bool {
        self.pinning.is_some()
    }

    /// The node registry uploads resolve against.
    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    /// Uploads `payload` to `path` on the node named `node_key`.
    #[instrument(skip(self, payload))]
    pub async fn upload(
        &self,
        node_key: &str,
        path: &str,
        payload: Payload,
        mirror: bool,
    ) -> Result<ContentId> {
        let profile = self.registry.resolve(node_key)?;
        validate_node_path(path)?;
        let data = payload.into_bytes()?;

        let node = self.connector.connect(profile)?;
        node.write(path, data.clone(), &WriteOptions::default()).await?;

        if mirror {
            match &self.pinning {
                Some(pinning) => {
                    let mirrored = pinning.store_blob(data.clone()).await?;
                    debug!(path, cid = %mirrored, "Mirrored upload");
                }
                None => debug!(path, "Mirroring requested but pinning is disabled"),
            }
        }

        let stat = node
            .stat(path)
            .await
            .map_err(|e| MetapinError::StatAfterWrite {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        node.pin(&stat.cid).await?;

        info!(path, cid = %stat.cid, bytes = data.len(), "Uploaded {} to IPFS", path);
        Ok(stat.cid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryConnector, MemoryNode};
    use async_trait::async_trait;
    use bytes::Bytes;
    use metapin_core::types::NodeProfile;
    use parking_lot::Mutex;
    use serde_json::json;

    #[derive(Default)]
    struct RecordingPinning {
        blobs: Mutex<Vec<Bytes>>,
        fail: bool,
    }

    #[async_trait]
    impl PinningService for RecordingPinning {
        async fn store_blob(&self, data: Bytes) -> Result<ContentId> {
            if self.fail {
                return Err(MetapinError::UploadTransport("pinning service: 503".into()));
            }
            let cid = ContentId::for_bytes(&data);
            self.blobs.lock().push(data);
            Ok(cid)
        }
    }

    fn setup() -> (Arc<MemoryNode>, Arc<MemoryConnector>, ContentUploader) {
        let node = Arc::new(MemoryNode::new());
        let connector = Arc::new(MemoryConnector::new(node.clone()));
        let registry = NodeRegistry::new([NodeProfile::new("local", "http://127.0.0.1:5001")]).unwrap();
        let uploader = ContentUploader::new(Arc::new(registry), connector.clone());
        (node, connector, uploader)
    }

    #[tokio::test]
    async fn test_upload_writes_stats_and_pins() {
        let (node, _, uploader) = setup();
        let cid = uploader
            .upload("local", "/metadog-placeholder/placeholder.png", Payload::from(vec![1, 2, 3]), false)
            .await
            .unwrap();

        assert_eq!(cid, ContentId::for_bytes(&[1, 2, 3]));
        assert_eq!(node.read("/metadog-placeholder/placeholder.png").unwrap().as_ref(), &[1, 2, 3]);
        assert_eq!(node.pinned(), vec![cid]);
        let calls = node.calls();
        assert_eq!((calls.writes, calls.stats, calls.pins), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_repeat_upload_is_deterministic() {
        let (_, _, uploader) = setup();
        let doc = json!({ "name": "MetaDog", "image": "ipfs://x" });
        let first = uploader.upload("local", "/m/1.json", Payload::document(doc.clone()), false).await.unwrap();
        let second = uploader.upload("local", "/m/1.json", Payload::document(doc), false).await.unwrap();
        assert_eq!(first, second);

        let reordered: serde_json::Value = serde_json::from_str(r#"{"image":"ipfs://x","name":"MetaDog"}"#).unwrap();
        let third = uploader.upload("local", "/m/1.json", Payload::document(reordered), false).await.unwrap();
        assert_eq!(first, third);
    }

    #[tokio::test]
    async fn test_unknown_node_makes_no_calls() {
        let (node, connector, uploader) = setup();
        let err = uploader
            .upload("mainnet", "/x.json", Payload::from(vec![1]), true)
            .await
            .unwrap_err();
        assert!(matches!(err, MetapinError::UnknownNode { .. }));
        assert_eq!(connector.connects(), 0);
        assert_eq!(node.calls().total(), 0);
    }

    #[tokio::test]
    async fn test_relative_path_rejected_before_network() {
        let (node, _, uploader) = setup();
        let err = uploader.upload("local", "x.json", Payload::from(vec![1]), false).await.unwrap_err();
        assert!(matches!(err, MetapinError::Validation(_)));
        assert_eq!(node.calls().total(), 0);
    }

    #[tokio::test]
    async fn test_mirror_without_pinning_is_noop() {
        let (node, _, uploader) = setup();
        assert!(!uploader.pinning_enabled());
        let cid = uploader.upload("local", "/a.bin", Payload::from(vec![9]), true).await.unwrap();
        assert_eq!(cid, ContentId::for_bytes(&[9]));
        let calls = node.calls();
        assert_eq!((calls.writes, calls.stats, calls.pins), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_mirror_sends_same_bytes() {
        let (_, _, uploader) = setup();
        let pinning = Arc::new(RecordingPinning::default());
        let uploader = uploader.with_pinning(pinning.clone());
        assert!(uploader.pinning_enabled());

        uploader.upload("local", "/a.bin", Payload::from(vec![4, 5]), true).await.unwrap();
        uploader.upload("local", "/b.bin", Payload::from(vec![6]), false).await.unwrap();

        let blobs = pinning.blobs.lock();
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].as_ref(), &[4, 5]);
    }

    #[tokio::test]
    async fn test_mirror_failure_is_transport_error() {
        let (node, _, uploader) = setup();
        let pinning = Arc::new(RecordingPinning { fail: true, ..Default::default() });
        let uploader = uploader.with_pinning(pinning);
        let err = uploader.upload("local", "/a.bin", Payload::from(vec![1]), true).await.unwrap_err();
        assert!(matches!(err, MetapinError::UploadTransport(_)));
        assert_eq!(node.calls().pins, 0);
    }

    #[tokio::test]
    async fn test_stat_failure_after_write_is_distinct() {
        let (node, _, uploader) = setup();
        node.fail_stats_of("/a.bin");
        let err = uploader.upload("local", "/a.bin", Payload::from(vec![1]), false).await.unwrap_err();
        match err {
            MetapinError::StatAfterWrite { path, .. } => assert_eq!(path, "/a.bin"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(node.read("/a.bin").is_some());
        assert_eq!(node.calls().pins, 0);
    }

    #[tokio::test]
    async fn test_write_failure_propagates() {
        let (node, _, uploader) = setup();
        node.fail_writes_to("/a.bin");
        let err = uploader.upload("local", "/a.bin", Payload::from(vec![1]), false).await.unwrap_err();
        assert!(matches!(err, MetapinError::UploadTransport(_)));
        assert_eq!(node.calls().stats, 0);
    }
}
