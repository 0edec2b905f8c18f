//! Pre-reveal placeholder publishing.

use std::sync::Arc;

use bytes::Bytes;
use futures::{stream, StreamExt, TryStreamExt};
use serde_json::Value;
use tracing::{info, instrument};

use metapin_core::error::{MetapinError, Result};
use metapin_core::types::{ContentId, Payload, PublishResult};
use metapin_ipfs::{CidResolver, ContentUploader};

use crate::assets::AssetStore;
use crate::progress::{ProgressCallback, PublishEvent};

/// Tuning for the placeholder workflow.
#[derive(Clone, Debug)]
pub struct PlaceholderOptions {
    /// Mirror the image and metadata uploads to the pinning service.
    pub mirror: bool,
    /// Metadata uploads in flight at once; `1` is strictly sequential.
    pub concurrency: usize,
}

impl Default for PlaceholderOptions {
    fn default() -> Self {
        Self {
            mirror: false,
            concurrency: 1,
        }
    }
}

/// Publishes the pre-reveal stage: one placeholder image plus one identical
/// metadata document per token index.
///
/// The contract resolves `baseTokenURI + index + ".json"`, so every index
/// from `1` to the number of generated images gets its own copy.
pub struct PlaceholderPublisher {
    uploader: Arc<ContentUploader>,
    resolver: Arc<CidResolver>,
    assets: AssetStore,
    options: PlaceholderOptions,
    progress: Option<ProgressCallback>,
}

impl PlaceholderPublisher {
    /// Creates a publisher with default options.
    pub fn new(uploader: Arc<ContentUploader>, resolver: Arc<CidResolver>, assets: AssetStore) -> Self {
        Self {
            uploader,
            resolver,
            assets,
            options: PlaceholderOptions::default(),
            progress: None,
        }
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: PlaceholderOptions) -> Self {
        self.options = options;
        self
    }

    /// Reports milestones to `progress`.
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    fn emit(&self, event: PublishEvent) {
        if let Some(progress) = &self.progress {
            progress(&event);
        }
    }

    /// Runs the placeholder workflow against the node named `node_key`.
    ///
    /// Any failure aborts the run with the original error; a failed metadata
    /// upload is attributed to its token index.
    #[instrument(skip(self))]
    pub async fn publish(&self, node_key: &str) -> Result<PublishResult> {
        self.uploader.registry().resolve(node_key)?;
        let layout = self.assets.layout();

        let images = self.assets.list_generated_images().await?;
        let total = images.len() as u64;
        info!(count = total, "Preparing placeholders for the pre-reveal stage");
        self.emit(PublishEvent::ImagesCounted { count: total });

        let image = self.assets.read_placeholder_image().await?;
        let image_cid = self
            .uploader
            .upload(
                node_key,
                &layout.placeholder_image_path(),
                Payload::Binary(image),
                self.options.mirror,
            )
            .await?;
        self.emit(PublishEvent::ImageUploaded {
            cid: image_cid.clone(),
        });

        let metadata = self.render_metadata(&image_cid).await?;
        self.assets.write_generated_placeholder(&metadata).await?;
        self.upload_metadata(node_key, metadata, total).await?;

        let cid = self
            .resolver
            .resolve_cid(node_key, &layout.placeholder_root())
            .await?;
        info!(%cid, "Resolved placeholder directory");
        self.emit(PublishEvent::DirectoryResolved { cid: cid.clone() });

        Ok(PublishResult::for_directory(cid))
    }

    /// Template with `image` pointing at the placeholder image, serialized once.
    async fn render_metadata(&self, image_cid: &ContentId) -> Result<Bytes> {
        let mut template = self.assets.read_placeholder_template().await?;
        let Some(fields) = template.as_object_mut() else {
            return Err(MetapinError::Asset(
                "placeholder metadata template must be a JSON object".into(),
            ));
        };
        fields.insert("image".into(), Value::String(image_cid.to_uri()));
        Payload::document(template).into_bytes()
    }

    /// Uploads the same bytes to `1.json..=total.json`, in token order.
    async fn upload_metadata(&self, node_key: &str, metadata: Bytes, total: u64) -> Result<()> {
        let layout = self.assets.layout();
        let mirror = self.options.mirror;

        let uploads = stream::iter(1..=total)
            .map(|index| {
                let metadata = metadata.clone();
                async move {
                    self.uploader
                        .upload(
                            node_key,
                            &layout.placeholder_metadata_path(index),
                            Payload::Binary(metadata),
                            mirror,
                        )
                        .await
                        .map(|cid| (index, cid))
                        .map_err(|e| MetapinError::MetadataUpload {
                            index,
                            source: Box::new(e),
                        })
                }
            })
            .buffered(self.options.concurrency.max(1));
        futures::pin_mut!(uploads);

        while let Some((index, cid)) = uploads.try_next().await? {
            self.emit(PublishEvent::MetadataUploaded { index, total, cid });
        }

        info!(count = total, "Uploaded placeholder metadata");
        Ok(())
    }
}
