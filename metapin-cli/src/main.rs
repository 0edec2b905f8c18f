//! metapin
//!
//! Publishes NFT collection metadata to IPFS.

use clap::Parser;
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use metapin_cli::{run, Cli};
use metapin_core::error::MetapinError;

#[tokio::main]
async fn main() {
    // .env first so it can feed flag fallbacks
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "metapin=debug,info"
    } else {
        "metapin=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let code = match run(cli).await {
        Ok(output) => {
            println!("{output}");
            0
        }
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            err.downcast_ref::<MetapinError>()
                .map(MetapinError::exit_code)
                .unwrap_or(1)
        }
    };

    std::process::exit(code);
}
