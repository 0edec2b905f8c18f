//! Local asset files.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde_json::Value;
use tokio::fs;
use tracing::{debug, instrument, warn};

use metapin_core::error::{MetapinError, Result};
use metapin_core::types::CollectionLayout;

/// Reads and writes a collection's local assets under an asset root.
#[derive(Clone, Debug)]
pub struct AssetStore {
    root: PathBuf,
    layout: CollectionLayout,
}

impl AssetStore {
    /// Creates a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, layout: CollectionLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    /// The collection layout.
    pub fn layout(&self) -> &CollectionLayout {
        &self.layout
    }

    /// The asset root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Identifiers of the generated per-token images (file stems), sorted.
    ///
    /// A missing directory means nothing has been generated yet.
    #[instrument(skip(self))]
    pub async fn list_generated_images(&self) -> Result<Vec<String>> {
        let dir = self.resolve(&self.layout.cards_dir);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(dir = %dir.display(), "Generated images directory not found");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut images = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let path = entry.path();
            let matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.layout.image_extension));
            if !matches {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                images.push(stem.to_string());
            }
        }

        images.sort();
        debug!(count = images.len(), "Listed generated images");
        Ok(images)
    }

    /// Whether any per-token image has been generated.
    pub async fn has_generated_images(&self) -> Result<bool> {
        Ok(!self.list_generated_images().await?.is_empty())
    }

    /// Reads any file, relative to the asset root unless absolute.
    pub async fn read_file(&self, path: impl AsRef<Path>) -> Result<Bytes> {
        let path = self.resolve(path.as_ref());
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(MetapinError::Asset(format!(
                "{} not found",
                path.display()
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Reads the placeholder image.
    pub async fn read_placeholder_image(&self) -> Result<Bytes> {
        self.read_file(&self.layout.placeholder_image).await
    }

    /// Reads and parses the placeholder metadata template.
    pub async fn read_placeholder_template(&self) -> Result<Value> {
        let data = self.read_file(&self.layout.placeholder_template).await?;
        Ok(serde_json::from_slice(&data)?)
    }

    /// Writes the generated placeholder document, creating parent directories.
    pub async fn write_generated_placeholder(&self, data: &[u8]) -> Result<PathBuf> {
        let path = self.resolve(&self.layout.generated_placeholder);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data).await?;
        debug!(path = %path.display(), "Wrote generated placeholder metadata");
        Ok(path)
    }
}
