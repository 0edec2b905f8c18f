//! Constants for metapin.
//!
//! The CID policy is fixed: every write is CIDv1 with a SHA-256 multihash,
//! so that a CID is a pure function of the bytes written.

// ═══════════════════════════════════════════════════════════════════════════════
// CID POLICY
// ═══════════════════════════════════════════════════════════════════════════════

/// CID version requested on every write.
pub const CID_VERSION: u8 = 1;

/// Hash algorithm name as understood by the Kubo RPC API.
pub const HASH_ALGORITHM: &str = "sha2-256";

/// Multicodec code of the SHA2-256 multihash.
pub const SHA2_256_CODE: u64 = 0x12;

/// Multicodec code for raw leaves (single-chunk files written with CIDv1).
pub const RAW_CODEC: u64 = 0x55;

/// Multicodec code for UnixFS directories.
pub const DAG_PB_CODEC: u64 = 0x70;

/// URI scheme prefix used for token metadata and base token URIs.
pub const IPFS_URI_SCHEME: &str = "ipfs://";

// ═══════════════════════════════════════════════════════════════════════════════
// ENDPOINTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Path prefix of the Kubo RPC API, appended when a node URL has no path.
pub const KUBO_API_PREFIX: &str = "/api/v0";

/// Default pinning service endpoint (nft.storage compatible).
pub const DEFAULT_PINNING_ENDPOINT: &str = "https://api.nft.storage";

/// Default transport timeout for node and pinning requests.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Default node profile file.
pub const DEFAULT_NODES_FILE: &str = "ipfs-nodes.json";

// ═══════════════════════════════════════════════════════════════════════════════
// COLLECTION LAYOUT
// ═══════════════════════════════════════════════════════════════════════════════

/// Default collection name; remote roots derive from it.
pub const DEFAULT_COLLECTION: &str = "metadog";

/// Extension of generated per-token images.
pub const IMAGE_EXTENSION: &str = "png";

/// Directory holding generated per-token images, relative to the asset root.
pub const GENERATED_CARDS_DIR: &str = "assets/generated/cards";

/// Placeholder image, relative to the asset root.
pub const PLACEHOLDER_IMAGE: &str = "assets/placeholder/placeholder.png";

/// Placeholder metadata template, relative to the asset root.
pub const PLACEHOLDER_TEMPLATE: &str = "assets/placeholder/placeholder.json";

/// Generated placeholder document written before upload, relative to the asset root.
pub const GENERATED_PLACEHOLDER: &str = "assets/generated/placeholder.json";

/// File name of the placeholder image inside the remote placeholder root.
pub const PLACEHOLDER_IMAGE_NAME: &str = "placeholder.png";

/// Suffix of the remote placeholder root (`/<collection>-placeholder`).
pub const PLACEHOLDER_ROOT_SUFFIX: &str = "-placeholder";
