//! Where a collection's assets live, locally and on the node.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Local asset locations (relative to an asset root) and remote roots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionLayout {
    /// Collection name; remote roots are `/<name>` and `/<name>-placeholder`.
    pub collection: String,
    /// Directory of generated per-token images.
    pub cards_dir: PathBuf,
    /// Extension of generated per-token images, without the dot.
    pub image_extension: String,
    /// Placeholder image.
    pub placeholder_image: PathBuf,
    /// Placeholder metadata template.
    pub placeholder_template: PathBuf,
    /// Where the generated placeholder document is written before upload.
    pub generated_placeholder: PathBuf,
}

impl Default for CollectionLayout {
    fn default() -> Self {
        Self::new(DEFAULT_COLLECTION)
    }
}

impl CollectionLayout {
    /// Default local layout for the named collection.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            cards_dir: PathBuf::from(GENERATED_CARDS_DIR),
            image_extension: IMAGE_EXTENSION.to_string(),
            placeholder_image: PathBuf::from(PLACEHOLDER_IMAGE),
            placeholder_template: PathBuf::from(PLACEHOLDER_TEMPLATE),
            generated_placeholder: PathBuf::from(GENERATED_PLACEHOLDER),
        }
    }

    /// Remote directory holding the pre-reveal image and metadata.
    pub fn placeholder_root(&self) -> String {
        format!("/{}{}", self.collection, PLACEHOLDER_ROOT_SUFFIX)
    }

    /// Remote path of the placeholder image.
    pub fn placeholder_image_path(&self) -> String {
        format!("{}/{}", self.placeholder_root(), PLACEHOLDER_IMAGE_NAME)
    }

    /// Remote path of the placeholder metadata for a 1-based token index.
    pub fn placeholder_metadata_path(&self, index: u64) -> String {
        format!("{}/{}.json", self.placeholder_root(), index)
    }

    /// Remote directory holding the revealed metadata.
    pub fn reveal_root(&self) -> String {
        format!("/{}", self.collection)
    }
}
