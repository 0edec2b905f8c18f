//! Named task handlers.
//!
//! The [`CommandRegistry`] maps task names to handlers. It is built once by
//! [`CommandRegistry::standard`] and dispatches by name; required parameters
//! are checked before a handler runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::{debug, instrument};

use metapin_core::error::{MetapinError, Result};
use metapin_core::types::Payload;
use metapin_publish::{PlaceholderOptions, PlaceholderPublisher, RevealResolver};

use crate::context::TaskContext;

// ═══════════════════════════════════════════════════════════════════════════════
// ARGUMENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Named string parameters for one task invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskArgs {
    values: BTreeMap<String, String>,
}

impl TaskArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// A parameter that must be present for `task`.
    pub fn require(&self, task: &str, name: &str) -> Result<&str> {
        self.get(name).ok_or_else(|| MetapinError::MissingParameter {
            task: task.to_string(),
            parameter: name.to_string(),
        })
    }

    /// Whether a boolean parameter is set to `true`.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name)
            .map(|value| value.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY
// ═══════════════════════════════════════════════════════════════════════════════

/// A named unit of work.
#[async_trait]
pub trait Task: Send + Sync {
    /// Name the task is invoked by.
    fn name(&self) -> &'static str;

    /// One-line description.
    fn about(&self) -> &'static str;

    /// Parameters that must be supplied.
    fn required(&self) -> &'static [&'static str] {
        &[]
    }

    /// Runs the task and returns its result string.
    async fn run(&self, ctx: &TaskContext, args: &TaskArgs) -> Result<String>;
}

/// Task name to handler table.
#[derive(Default)]
pub struct CommandRegistry {
    tasks: BTreeMap<&'static str, Box<dyn Task>>,
}

impl CommandRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry with every built-in task.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.insert(Box::new(PlaceholderTask));
        registry.insert(Box::new(RevealTask));
        registry.insert(Box::new(IpfsCidTask));
        registry.insert(Box::new(UploadFileTask));
        registry.insert(Box::new(UploadStringTask));
        registry.insert(Box::new(CheckImagesTask));
        registry
    }

    fn insert(&mut self, task: Box<dyn Task>) {
        self.tasks.insert(task.name(), task);
    }

    /// Registers a task. Names must be unique.
    pub fn register(&mut self, task: Box<dyn Task>) -> Result<()> {
        if self.tasks.contains_key(task.name()) {
            return Err(MetapinError::Config(format!(
                "Task '{}' is already registered",
                task.name()
            )));
        }
        self.insert(task);
        Ok(())
    }

    /// Registered task names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.tasks.keys().map(|name| name.to_string()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Task> {
        self.tasks.get(name).map(|task| task.as_ref())
    }

    /// Dispatches `name` with `args`.
    #[instrument(skip(self, ctx, args))]
    pub async fn run(&self, name: &str, ctx: &TaskContext, args: &TaskArgs) -> Result<String> {
        let task = self.get(name).ok_or_else(|| MetapinError::UnknownTask {
            name: name.to_string(),
            available: self.names(),
        })?;

        for parameter in task.required() {
            args.require(name, parameter)?;
        }

        debug!(task = name, "Running task");
        task.run(ctx, args).await
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TASKS
// ═══════════════════════════════════════════════════════════════════════════════

/// Publishes the pre-reveal image and metadata.
pub struct PlaceholderTask;

#[async_trait]
impl Task for PlaceholderTask {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn about(&self) -> &'static str {
        "Sets up the metadata and image for the pre-reveal stage"
    }

    fn required(&self) -> &'static [&'static str] {
        &["ipfsnode"]
    }

    async fn run(&self, ctx: &TaskContext, args: &TaskArgs) -> Result<String> {
        let node = args.require(self.name(), "ipfsnode")?;
        let concurrency = match args.get("concurrency") {
            None => 1,
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| MetapinError::Config(format!("Invalid concurrency {raw:?}")))?,
        };

        let publisher = PlaceholderPublisher::new(
            ctx.uploader.clone(),
            ctx.resolver.clone(),
            ctx.assets.clone(),
        )
        .with_options(PlaceholderOptions {
            mirror: args.flag("mirror"),
            concurrency,
        })
        .with_progress(ctx.console.placeholder_progress());

        let result = publisher.publish(node).await?;
        Ok(result.base_token_uri)
    }
}

/// Resolves the base token URI for the reveal call.
pub struct RevealTask;

#[async_trait]
impl Task for RevealTask {
    fn name(&self) -> &'static str {
        "reveal"
    }

    fn about(&self) -> &'static str {
        "Resolves the revealed metadata directory for the reveal call"
    }

    fn required(&self) -> &'static [&'static str] {
        &["ipfsnode"]
    }

    async fn run(&self, ctx: &TaskContext, args: &TaskArgs) -> Result<String> {
        let node = args.require(self.name(), "ipfsnode")?;
        let result = RevealResolver::new(ctx.resolver.clone(), ctx.layout().clone())
            .resolve(node)
            .await?;

        ctx.console.line(format!("baseTokenURI: {}", result.base_token_uri));
        Ok(result.base_token_uri)
    }
}

/// Prints the CID at a node path.
pub struct IpfsCidTask;

#[async_trait]
impl Task for IpfsCidTask {
    fn name(&self) -> &'static str {
        "ipfs-cid"
    }

    fn about(&self) -> &'static str {
        "Gets a CID on IPFS for a path"
    }

    fn required(&self) -> &'static [&'static str] {
        &["ipfspath", "ipfsnode"]
    }

    async fn run(&self, ctx: &TaskContext, args: &TaskArgs) -> Result<String> {
        let path = args.require(self.name(), "ipfspath")?;
        let node = args.require(self.name(), "ipfsnode")?;
        let cid = ctx.resolver.resolve_cid(node, path).await?;
        Ok(cid.to_string())
    }
}

/// Uploads a local file.
pub struct UploadFileTask;

#[async_trait]
impl Task for UploadFileTask {
    fn name(&self) -> &'static str {
        "ipfs-upload-file"
    }

    fn about(&self) -> &'static str {
        "Uploads a file to IPFS"
    }

    fn required(&self) -> &'static [&'static str] {
        &["sourcepath", "ipfspath", "ipfsnode"]
    }

    async fn run(&self, ctx: &TaskContext, args: &TaskArgs) -> Result<String> {
        let source = args.require(self.name(), "sourcepath")?;
        let path = args.require(self.name(), "ipfspath")?;
        let node = args.require(self.name(), "ipfsnode")?;

        // Fail on the node key before touching the filesystem.
        let profile = ctx.uploader.registry().resolve(node)?;
        let data = ctx.assets.read_file(source).await?;

        let cid = ctx
            .uploader
            .upload(node, path, Payload::from(data), args.flag("mirror"))
            .await?;
        ctx.console.uploaded(path, &cid, profile.gateway_url(&cid));
        Ok(cid.to_string())
    }
}

/// Uploads a literal string.
pub struct UploadStringTask;

#[async_trait]
impl Task for UploadStringTask {
    fn name(&self) -> &'static str {
        "ipfs-upload-string"
    }

    fn about(&self) -> &'static str {
        "Uploads a string to IPFS"
    }

    fn required(&self) -> &'static [&'static str] {
        &["data", "ipfspath", "ipfsnode"]
    }

    async fn run(&self, ctx: &TaskContext, args: &TaskArgs) -> Result<String> {
        let data = args.require(self.name(), "data")?;
        let path = args.require(self.name(), "ipfspath")?;
        let node = args.require(self.name(), "ipfsnode")?;

        let payload = Payload::from(data.as_bytes().to_vec());
        let cid = ctx
            .uploader
            .upload(node, path, payload, args.flag("mirror"))
            .await?;

        let gateway = ctx.uploader.registry().resolve(node)?.gateway_url(&cid);
        ctx.console.uploaded(path, &cid, gateway);
        Ok(cid.to_string())
    }
}

/// Reports whether generated images exist.
pub struct CheckImagesTask;

#[async_trait]
impl Task for CheckImagesTask {
    fn name(&self) -> &'static str {
        "check-images"
    }

    fn about(&self) -> &'static str {
        "Checks if images have been generated"
    }

    async fn run(&self, ctx: &TaskContext, _args: &TaskArgs) -> Result<String> {
        Ok(ctx.assets.has_generated_images().await?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Task for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn about(&self) -> &'static str {
            "Echoes its input"
        }

        fn required(&self) -> &'static [&'static str] {
            &["text"]
        }

        async fn run(&self, _ctx: &TaskContext, args: &TaskArgs) -> Result<String> {
            Ok(args.require(self.name(), "text")?.to_string())
        }
    }

    #[test]
    fn test_standard_tasks() {
        let registry = CommandRegistry::standard();
        assert_eq!(
            registry.names(),
            vec![
                "check-images",
                "ipfs-cid",
                "ipfs-upload-file",
                "ipfs-upload-string",
                "placeholder",
                "reveal",
            ]
        );
        assert_eq!(
            registry.get("ipfs-upload-file").unwrap().required(),
            &["sourcepath", "ipfspath", "ipfsnode"]
        );
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(Echo)).unwrap();
        let err = registry.register(Box::new(Echo)).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_task_args() {
        let args = TaskArgs::new().with("mirror", "true").with("ipfsnode", "local");
        assert!(args.flag("mirror"));
        assert!(!args.flag("missing"));
        assert_eq!(args.require("reveal", "ipfsnode").unwrap(), "local");
        assert!(matches!(
            args.require("reveal", "ipfspath"),
            Err(MetapinError::MissingParameter { task, parameter })
                if task == "reveal" && parameter == "ipfspath"
        ));
    }
}
