//! # metapin Publish
//!
//! The two collection workflows built on the upload and resolve primitives:
//!
//! - **Placeholder**: upload one placeholder image, fan out one identical
//!   metadata document per token (`1.json..n.json`), return the directory
//!   CID as the pre-reveal base token URI
//! - **Reveal**: resolve the revealed metadata directory's CID as the new
//!   base token URI
//!
//! ## Example
//!
//! ```rust,ignore
//! use metapin_publish::{AssetStore, PlaceholderPublisher, PlaceholderOptions};
//!
//! let publisher = PlaceholderPublisher::new(uploader, resolver, AssetStore::new(".", layout));
//! let result = publisher.publish("local").await?;
//! println!("baseTokenURI: {}", result.base_token_uri);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod assets;
mod placeholder;
mod progress;
mod reveal;

pub use assets::AssetStore;
pub use placeholder::{PlaceholderOptions, PlaceholderPublisher};
pub use progress::{ProgressCallback, PublishEvent};
pub use reveal::RevealResolver;
