//! # metapin Core
//!
//! Core types, errors, and traits for publishing collection metadata to IPFS.
//!
//! This crate provides the foundational building blocks used by all other metapin crates:
//!
//! - **Types**: Content identifiers, node profiles, payloads, and publish results
//! - **Errors**: One error enum covering node lookup, transport, and asset failures
//! - **Constants**: Fixed CID policy, URI scheme, and default collection layout
//! - **Traits**: Seams for storage nodes, pinning services, and node connectors
//!
//! ## Example
//!
//! ```rust
//! use metapin_core::{ContentId, Payload};
//!
//! let payload = Payload::document(serde_json::json!({ "name": "placeholder" }));
//! let bytes = payload.to_bytes().unwrap();
//! let cid = ContentId::for_bytes(&bytes);
//! assert!(cid.to_uri().starts_with("ipfs://"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{MetapinError, Result};
pub use traits::*;
pub use types::*;
