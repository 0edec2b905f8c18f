//! Workflow results.

use serde::{Deserialize, Serialize};

use crate::types::ContentId;

/// Result of the placeholder or reveal workflow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    /// `ipfs://<dirCID>`, the prefix the contract joins with `<index>.json`.
    pub base_token_uri: String,
    /// CID of the published directory.
    pub cid: ContentId,
}

impl PublishResult {
    /// Builds the result for a directory CID.
    pub fn for_directory(cid: ContentId) -> Self {
        Self {
            base_token_uri: cid.to_uri(),
            cid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_token_uri_uses_ipfs_scheme() {
        let cid = ContentId::for_bytes(b"dir");
        let result = PublishResult::for_directory(cid.clone());
        assert_eq!(result.base_token_uri, format!("ipfs://{cid}"));
        assert_eq!(result.cid, cid);
    }
}
