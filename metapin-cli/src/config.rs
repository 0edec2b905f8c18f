//! Runtime configuration assembled from flags and the environment.

use std::path::PathBuf;

use metapin_core::error::{MetapinError, Result};
use metapin_core::types::CollectionLayout;
use metapin_ipfs::{ClientSettings, PinningSettings};

use crate::cli::Cli;

/// Everything a task context needs, resolved once at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Node profile file
    pub nodes_file: PathBuf,
    /// Directory holding `assets/`
    pub assets_root: PathBuf,
    /// Collection layout
    pub layout: CollectionLayout,
    /// HTTP client settings
    pub client: ClientSettings,
    /// Pinning service settings
    pub pinning: PinningSettings,
}

impl AppConfig {
    /// Builds configuration from parsed flags and the process environment.
    ///
    /// `.env` is loaded by the binary before flags are parsed.
    pub fn from_env(cli: &Cli) -> Result<Self> {
        Self::from_lookup(cli, |name| std::env::var(name).ok())
    }

    /// Builds configuration using `lookup` for environment variables.
    pub fn from_lookup(cli: &Cli, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut pinning = PinningSettings::default();
        pinning.token = lookup("NFT_STORAGE_TOKEN");
        if let Some(endpoint) = lookup("NFT_STORAGE_ENDPOINT").filter(|e| !e.trim().is_empty()) {
            pinning = pinning.with_endpoint(endpoint.trim().trim_end_matches('/'));
        }

        let mut client = ClientSettings::default();
        if let Some(raw) = lookup("IPFS_TIMEOUT_SECONDS") {
            client.timeout_seconds = raw
                .trim()
                .parse()
                .ok()
                .filter(|secs: &u64| *secs > 0)
                .ok_or_else(|| {
                    MetapinError::Config(format!(
                        "IPFS_TIMEOUT_SECONDS must be a positive number of seconds, got {raw:?}"
                    ))
                })?;
        }

        if cli.collection.trim().is_empty() || cli.collection.contains('/') {
            return Err(MetapinError::Config(format!(
                "Invalid collection name {:?}",
                cli.collection
            )));
        }

        Ok(Self {
            nodes_file: cli.nodes.clone(),
            assets_root: cli.assets.clone(),
            layout: CollectionLayout::new(cli.collection.trim()),
            client,
            pinning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    fn cli(extra: &[&str]) -> Cli {
        let mut args = vec!["metapin"];
        args.extend_from_slice(extra);
        args.push("check-images");
        Cli::try_parse_from(args).unwrap()
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(&cli(&[]), lookup(&[])).unwrap();
        assert_eq!(config.layout.reveal_root(), "/metadog");
        assert_eq!(config.client.timeout_seconds, 30);
        assert!(!config.pinning.is_enabled());
    }

    #[test]
    fn test_pinning_from_env() {
        let config = AppConfig::from_lookup(
            &cli(&[]),
            lookup(&[
                ("NFT_STORAGE_TOKEN", "secret"),
                ("NFT_STORAGE_ENDPOINT", "http://localhost:8080/"),
            ]),
        )
        .unwrap();
        assert!(config.pinning.is_enabled());
        assert_eq!(config.pinning.endpoint, "http://localhost:8080");
    }

    #[test]
    fn test_collection_flag() {
        let config = AppConfig::from_lookup(&cli(&["--collection", "catz"]), lookup(&[])).unwrap();
        assert_eq!(config.layout.placeholder_root(), "/catz-placeholder");
    }

    #[test]
    fn test_invalid_timeout_is_config_error() {
        for raw in ["soon", "0", "-4"] {
            let err = AppConfig::from_lookup(&cli(&[]), lookup(&[("IPFS_TIMEOUT_SECONDS", raw)]))
                .unwrap_err();
            assert!(err.is_config());
            assert_eq!(err.exit_code(), 2);
        }
    }

    #[test]
    fn test_invalid_collection() {
        let err = AppConfig::from_lookup(&cli(&["--collection", "a/b"]), lookup(&[])).unwrap_err();
        assert!(err.is_config());
    }
}
