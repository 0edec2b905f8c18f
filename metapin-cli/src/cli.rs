//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use metapin_core::constants::{DEFAULT_COLLECTION, DEFAULT_NODES_FILE};

use crate::tasks::TaskArgs;

/// metapin - publish NFT collection metadata to IPFS
#[derive(Parser, Debug)]
#[command(name = "metapin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON file with the IPFS node profiles
    #[arg(long, global = true, env = "IPFS_NODES_FILE", default_value = DEFAULT_NODES_FILE)]
    pub nodes: PathBuf,

    /// Directory containing `assets/`
    #[arg(long, global = true, env = "METAPIN_ASSETS", default_value = ".")]
    pub assets: PathBuf,

    /// Collection name; remote roots are `/<name>` and `/<name>-placeholder`
    #[arg(long, global = true, env = "METAPIN_COLLECTION", default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sets up the metadata and image for the pre-reveal stage
    Placeholder {
        /// The key of the ipfs node to use
        #[arg(long)]
        ipfsnode: String,
        /// Metadata uploads in flight at once
        #[arg(long, default_value_t = 1)]
        concurrency: usize,
        /// Mirror uploads to the pinning service
        #[arg(long)]
        mirror: bool,
    },

    /// Resolves the revealed metadata directory for the reveal call
    Reveal {
        /// The key of the ipfs node to use
        #[arg(long)]
        ipfsnode: String,
    },

    /// Gets a CID on IPFS for a path
    IpfsCid {
        /// The path on the ipfs node
        #[arg(long)]
        ipfspath: String,
        /// The key of the ipfs node to use
        #[arg(long)]
        ipfsnode: String,
    },

    /// Uploads a file to IPFS
    IpfsUploadFile {
        /// The path to the file on your filesystem
        #[arg(long)]
        sourcepath: String,
        /// The path where you want to store the file on your ipfs node
        #[arg(long)]
        ipfspath: String,
        /// The key of the ipfs node to use
        #[arg(long)]
        ipfsnode: String,
        /// Mirror the upload to the pinning service
        #[arg(long)]
        mirror: bool,
    },

    /// Uploads a string to IPFS
    IpfsUploadString {
        /// The string to store
        #[arg(long)]
        data: String,
        /// The path where you want to store the string on your ipfs node
        #[arg(long)]
        ipfspath: String,
        /// The key of the ipfs node to use
        #[arg(long)]
        ipfsnode: String,
        /// Mirror the upload to the pinning service
        #[arg(long)]
        mirror: bool,
    },

    /// Checks if images have been generated
    CheckImages,
}

impl Commands {
    /// Task name and named string parameters for this command.
    pub fn into_invocation(self) -> (&'static str, TaskArgs) {
        match self {
            Commands::Placeholder {
                ipfsnode,
                concurrency,
                mirror,
            } => (
                "placeholder",
                TaskArgs::new()
                    .with("ipfsnode", ipfsnode)
                    .with("concurrency", concurrency.to_string())
                    .with("mirror", mirror.to_string()),
            ),
            Commands::Reveal { ipfsnode } => ("reveal", TaskArgs::new().with("ipfsnode", ipfsnode)),
            Commands::IpfsCid { ipfspath, ipfsnode } => (
                "ipfs-cid",
                TaskArgs::new()
                    .with("ipfspath", ipfspath)
                    .with("ipfsnode", ipfsnode),
            ),
            Commands::IpfsUploadFile {
                sourcepath,
                ipfspath,
                ipfsnode,
                mirror,
            } => (
                "ipfs-upload-file",
                TaskArgs::new()
                    .with("sourcepath", sourcepath)
                    .with("ipfspath", ipfspath)
                    .with("ipfsnode", ipfsnode)
                    .with("mirror", mirror.to_string()),
            ),
            Commands::IpfsUploadString {
                data,
                ipfspath,
                ipfsnode,
                mirror,
            } => (
                "ipfs-upload-string",
                TaskArgs::new()
                    .with("data", data)
                    .with("ipfspath", ipfspath)
                    .with("ipfsnode", ipfsnode)
                    .with("mirror", mirror.to_string()),
            ),
            Commands::CheckImages => ("check-images", TaskArgs::new()),
        }
    }
}
