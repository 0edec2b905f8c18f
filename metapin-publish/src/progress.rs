//! Progress reporting for the placeholder workflow.

use metapin_core::types::ContentId;

/// Milestones of a placeholder publish.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublishEvent {
    /// Generated images were counted; this many metadata copies follow.
    ImagesCounted {
        /// Number of generated images
        count: u64,
    },
    /// The placeholder image is on the node.
    ImageUploaded {
        /// Image CID
        cid: ContentId,
    },
    /// One metadata copy is on the node.
    MetadataUploaded {
        /// 1-based token index
        index: u64,
        /// Total copies
        total: u64,
        /// Metadata CID (identical for every index)
        cid: ContentId,
    },
    /// The placeholder directory CID was resolved.
    DirectoryResolved {
        /// Directory CID
        cid: ContentId,
    },
}

/// Callback for publish progress updates.
pub type ProgressCallback = Box<dyn Fn(&PublishEvent) + Send + Sync>;
