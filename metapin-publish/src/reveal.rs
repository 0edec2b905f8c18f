//! Post-reveal base URI resolution.

use std::sync::Arc;

use tracing::{info, instrument};

use metapin_core::error::Result;
use metapin_core::types::{CollectionLayout, PublishResult};
use metapin_ipfs::CidResolver;

/// Resolves the revealed metadata directory for the contract's reveal call.
///
/// Nothing is uploaded here; the revealed tree is published separately with
/// the upload primitive.
pub struct RevealResolver {
    resolver: Arc<CidResolver>,
    layout: CollectionLayout,
}

impl RevealResolver {
    /// Creates a reveal resolver for `layout`'s reveal root.
    pub fn new(resolver: Arc<CidResolver>, layout: CollectionLayout) -> Self {
        Self { resolver, layout }
    }

    /// Returns the revealed directory as the new base token URI.
    #[instrument(skip(self))]
    pub async fn resolve(&self, node_key: &str) -> Result<PublishResult> {
        let cid = self
            .resolver
            .resolve_cid(node_key, &self.layout.reveal_root())
            .await?;
        info!(%cid, root = %self.layout.reveal_root(), "Resolved reveal directory");
        Ok(PublishResult::for_directory(cid))
    }
}
