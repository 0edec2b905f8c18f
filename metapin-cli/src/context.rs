//! Shared services handed to every task.

use std::sync::Arc;

use tracing::info;

use metapin_core::error::Result;
use metapin_core::traits::{NodeConnector, PinningService};
use metapin_core::types::CollectionLayout;
use metapin_ipfs::{CidResolver, ContentUploader, KuboConnector, NodeRegistry, PinningClient};
use metapin_publish::AssetStore;

use crate::config::AppConfig;
use crate::console::Console;

/// Services a task runs against.
pub struct TaskContext {
    pub uploader: Arc<ContentUploader>,
    pub resolver: Arc<CidResolver>,
    pub assets: AssetStore,
    pub console: Console,
}

impl TaskContext {
    /// Wires a context around an existing registry and connector.
    pub fn new(
        registry: Arc<NodeRegistry>,
        connector: Arc<dyn NodeConnector>,
        pinning: Option<Arc<dyn PinningService>>,
        assets: AssetStore,
        console: Console,
    ) -> Self {
        let mut uploader = ContentUploader::new(registry.clone(), connector.clone());
        if let Some(pinning) = pinning {
            uploader = uploader.with_pinning(pinning);
        }

        Self {
            uploader: Arc::new(uploader),
            resolver: Arc::new(CidResolver::new(registry, connector)),
            assets,
            console,
        }
    }

    /// Builds Kubo and pinning clients from configuration.
    ///
    /// Nothing here touches the network.
    pub fn from_config(config: &AppConfig, console: Console) -> Result<Self> {
        let registry = Arc::new(NodeRegistry::load(&config.nodes_file)?);
        let connector: Arc<dyn NodeConnector> = Arc::new(KuboConnector::new(config.client.clone()));

        let pinning = PinningClient::from_settings(&config.pinning, &config.client)?
            .map(|client| Arc::new(client) as Arc<dyn PinningService>);
        info!(
            nodes = registry.len(),
            pinning = pinning.is_some(),
            collection = %config.layout.collection,
            "Task context ready"
        );

        let assets = AssetStore::new(config.assets_root.clone(), config.layout.clone());
        Ok(Self::new(registry, connector, pinning, assets, console))
    }

    /// Layout of the collection being published.
    pub fn layout(&self) -> &CollectionLayout {
        self.assets.layout()
    }
}
