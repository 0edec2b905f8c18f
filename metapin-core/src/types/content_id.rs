//! Content identifiers.

use std::fmt;
use std::str::FromStr;

use cid::multihash::Multihash;
use cid::Cid;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::{IPFS_URI_SCHEME, RAW_CODEC, SHA2_256_CODE};
use crate::error::{MetapinError, Result};

/// A CID as reported by a storage node, kept in the node's string form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId(String);

impl ContentId {
    /// Parses and validates a CID string (v0 or v1).
    pub fn parse(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref().trim();
        if value.is_empty() {
            return Err(MetapinError::InvalidCid("CID cannot be empty".into()));
        }
        Cid::try_from(value).map_err(|e| MetapinError::InvalidCid(format!("{value}: {e}")))?;
        Ok(Self(value.to_string()))
    }

    /// CIDv1 of a single-chunk file: raw codec, SHA-256, base32.
    ///
    /// Matches the CID a Kubo node assigns to small files written with
    /// `cid-version=1&hash=sha2-256`.
    pub fn for_bytes(data: &[u8]) -> Self {
        Self::from_digest(RAW_CODEC, data)
    }

    /// CIDv1 with the given codec over the SHA-256 of `data`.
    pub fn from_digest(codec: u64, data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        // A 32-byte digest always fits the 64-byte multihash.
        let hash = Multihash::<64>::wrap(SHA2_256_CODE, digest.as_slice())
            .expect("sha2-256 digest fits in a 64-byte multihash");
        Self(Cid::new_v1(codec, hash).to_string())
    }

    /// Returns the CID string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `ipfs://<cid>` URI.
    pub fn to_uri(&self) -> String {
        format!("{IPFS_URI_SCHEME}{}", self.0)
    }

    /// Consumes the identifier, returning the CID string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContentId {
    type Err = MetapinError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContentId {
    type Error = MetapinError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<ContentId> for String {
    fn from(cid: ContentId) -> Self {
        cid.0
    }
}
