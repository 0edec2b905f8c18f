//! Domain types for metapin.
//!
//! - [`ContentId`]: CID string with CIDv1/SHA-256 computation
//! - [`NodeProfile`]: Connection profile of a storage node
//! - [`Payload`]: Content to upload, binary or canonical JSON
//! - [`PublishResult`]: Base token URI produced by a workflow
//! - [`CollectionLayout`]: Local asset locations and remote roots

mod content_id;
mod layout;
mod node;
mod payload;
mod publish;

pub use content_id::*;
pub use layout::*;
pub use node::*;
pub use payload::*;
pub use publish::*;
