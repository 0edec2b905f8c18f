//! metapin CLI
//!
//! Task surface for publishing collection metadata to IPFS. Every task is a
//! handler registered by name in a [`CommandRegistry`] built once at start.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod config;
pub mod console;
pub mod context;
pub mod tasks;

use anyhow::{Context, Result};

pub use cli::{Cli, Commands};
pub use config::AppConfig;
pub use console::Console;
pub use context::TaskContext;
pub use tasks::{CommandRegistry, Task, TaskArgs};

/// Runs one CLI invocation and returns the task's result string.
pub async fn run(cli: Cli) -> Result<String> {
    let config = AppConfig::from_env(&cli)?;
    let context = TaskContext::from_config(&config, Console::new(false))
        .context("Failed to set up IPFS clients")?;
    let registry = CommandRegistry::standard();

    let (name, args) = cli.command.into_invocation();
    tracing::debug!(task = name, "Dispatching task");
    Ok(registry.run(name, &context, &args).await?)
}
