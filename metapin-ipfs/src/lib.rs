//! # metapin IPFS
//!
//! Storage-node plumbing for metapin:
//!
//! - **Registry**: named node profiles, validated before any network call
//! - **Kubo**: HTTP client for the Kubo RPC API (`files/write`, `files/stat`, `pin/add`)
//! - **Pinning**: optional nft.storage-compatible mirror
//! - **Uploader / Resolver**: the upload and CID-resolution primitives
//! - **Memory**: in-process node for development and testing

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod kubo;
mod memory;
mod pinning;
mod registry;
mod resolver;
mod uploader;

pub use config::{ClientSettings, PinningSettings};
pub use kubo::{KuboConnector, KuboNode};
pub use memory::{MemoryConnector, MemoryNode, NodeCalls};
pub use pinning::PinningClient;
pub use registry::NodeRegistry;
pub use resolver::CidResolver;
pub use uploader::ContentUploader;
