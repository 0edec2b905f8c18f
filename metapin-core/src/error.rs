//! Error types for metapin.
//!
//! This module provides the error hierarchy using `thiserror`.
//! Node-lookup errors name the offending key and the configured ones.

use thiserror::Error;

/// Result type alias using `MetapinError`.
pub type Result<T> = std::result::Result<T, MetapinError>;

/// Main error type for all metapin operations.
#[derive(Debug, Error)]
pub enum MetapinError {
    // ═══════════════════════════════════════════════════════════════════════════
    // NODE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Node key absent from the registry, or the registry is empty.
    #[error("No IPFS node found or configured wrong ({key} not found in {})", render_keys(.available))]
    UnknownNode {
        /// The key that was requested.
        key: String,
        /// Keys that are configured.
        available: Vec<String>,
    },

    /// Network or endpoint failure during write, pin-add, or mirror.
    #[error("Upload transport failure: {0}")]
    UploadTransport(String),

    /// The write appeared to succeed but reading the path back failed.
    #[error("Stat after write failed for '{path}': {reason}")]
    StatAfterWrite {
        /// Path that was just written.
        path: String,
        /// What the node reported.
        reason: String,
    },

    /// The node reports that the path does not exist.
    #[error("Path not found on node: {0}")]
    PathNotFound(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // WORKFLOW ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A per-token metadata upload failed; the publish was aborted.
    #[error("Metadata upload for token {index} failed: {source}")]
    MetadataUpload {
        /// 1-based token index whose upload failed.
        index: u64,
        /// The original failure.
        #[source]
        source: Box<MetapinError>,
    },

    /// A local asset is missing or malformed.
    #[error("Asset error: {0}")]
    Asset(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // COMMAND ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// No task registered under this name.
    #[error("Unknown task '{name}' (available: {})", render_keys(.available))]
    UnknownTask {
        /// Requested task name.
        name: String,
        /// Registered task names.
        available: Vec<String>,
    },

    /// A required task parameter was not supplied.
    #[error("Task '{task}' requires parameter '{parameter}'")]
    MissingParameter {
        /// Task name.
        task: String,
        /// Missing parameter name.
        parameter: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid CID string.
    #[error("Invalid CID: {0}")]
    InvalidCid(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // STORAGE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Local file I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input validation failed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

fn render_keys(keys: &[String]) -> String {
    if keys.is_empty() {
        "<none>".to_string()
    } else {
        keys.join(", ")
    }
}

impl MetapinError {
    /// Builds an `UnknownNode` error from the configured keys.
    pub fn unknown_node<I, S>(key: &str, available: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MetapinError::UnknownNode {
            key: key.to_string(),
            available: available.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if this error came from the network or an endpoint.
    pub fn is_transport(&self) -> bool {
        matches!(
            self.root_cause(),
            MetapinError::UploadTransport(_) | MetapinError::StatAfterWrite { .. }
        )
    }

    /// Returns true if this error points at configuration or invocation, not at the node.
    pub fn is_config(&self) -> bool {
        matches!(
            self.root_cause(),
            MetapinError::UnknownNode { .. }
                | MetapinError::Config(_)
                | MetapinError::UnknownTask { .. }
                | MetapinError::MissingParameter { .. }
        )
    }

    /// Unwraps workflow wrappers down to the original failure.
    pub fn root_cause(&self) -> &MetapinError {
        match self {
            MetapinError::MetadataUpload { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Process exit status for this error (`2` for configuration, `1` otherwise).
    pub fn exit_code(&self) -> i32 {
        if self.is_config() {
            2
        } else {
            1
        }
    }
}
