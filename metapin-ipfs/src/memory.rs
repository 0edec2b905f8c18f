//! In-memory storage node.
//!
//! Behaves like a Kubo node's mutable file tree for small files: a file's
//! CID is the CIDv1 raw/SHA-256 of its bytes, and a directory's CID is
//! derived from its sorted children, so identical trees give identical
//! CIDs. Used for development and testing.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use tracing::{debug, instrument};

use metapin_core::constants::{CID_VERSION, DAG_PB_CODEC, HASH_ALGORITHM};
use metapin_core::error::{MetapinError, Result};
use metapin_core::traits::{NodeConnector, StorageNode};
use metapin_core::types::{ContentId, EntryKind, NodeProfile, PathStat, WriteOptions};

/// Snapshot of how many calls a [`MemoryNode`] has served.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeCalls {
    /// `write` calls, including failed ones
    pub writes: u64,
    /// `stat` calls, including failed ones
    pub stats: u64,
    /// `pin` calls, including failed ones
    pub pins: u64,
}

impl NodeCalls {
    /// Total number of calls.
    pub fn total(&self) -> u64 {
        self.writes + self.stats + self.pins
    }
}

/// In-memory storage node.
#[derive(Debug, Default)]
pub struct MemoryNode {
    /// Absolute path → file contents
    files: RwLock<BTreeMap<String, Bytes>>,
    /// Pinned CIDs, in pin order
    pins: RwLock<Vec<ContentId>>,
    /// Paths of every attempted write, in order
    write_log: RwLock<Vec<String>>,
    /// Paths whose writes fail
    failing_writes: RwLock<HashSet<String>>,
    /// Paths whose stats fail with a transport error
    failing_stats: RwLock<HashSet<String>>,
    writes: AtomicU64,
    stats: AtomicU64,
    pin_calls: AtomicU64,
}

impl MemoryNode {
    /// Creates an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every write to `path` fail with a transport error.
    pub fn fail_writes_to(&self, path: impl Into<String>) {
        self.failing_writes.write().insert(path.into());
    }

    /// Makes every stat of `path` fail with a transport error.
    pub fn fail_stats_of(&self, path: impl Into<String>) {
        self.failing_stats.write().insert(path.into());
    }

    /// Returns the call counters.
    pub fn calls(&self) -> NodeCalls {
        NodeCalls {
            writes: self.writes.load(Ordering::SeqCst),
            stats: self.stats.load(Ordering::SeqCst),
            pins: self.pin_calls.load(Ordering::SeqCst),
        }
    }

    /// Contents of the file at `path`.
    pub fn read(&self, path: &str) -> Option<Bytes> {
        self.files.read().get(path).cloned()
    }

    /// All file paths, sorted.
    pub fn file_paths(&self) -> Vec<String> {
        self.files.read().keys().cloned().collect()
    }

    /// Paths of every attempted write, in order.
    pub fn write_log(&self) -> Vec<String> {
        self.write_log.read().clone()
    }

    /// Pinned CIDs, in pin order.
    pub fn pinned(&self) -> Vec<ContentId> {
        self.pins.read().clone()
    }

    fn is_directory(files: &BTreeMap<String, Bytes>, path: &str) -> bool {
        if path == "/" {
            return true;
        }
        let prefix = format!("{}/", path.trim_end_matches('/'));
        files.keys().any(|file| file.starts_with(&prefix))
    }

    fn directory_cid(files: &BTreeMap<String, Bytes>, path: &str) -> ContentId {
        let prefix = if path == "/" {
            "/".to_string()
        } else {
            format!("{}/", path.trim_end_matches('/'))
        };

        // child name → is directory
        let mut children: BTreeMap<&str, bool> = BTreeMap::new();
        for file in files.keys().filter(|file| file.starts_with(&prefix)) {
            let rest = &file[prefix.len()..];
            match rest.split_once('/') {
                Some((dir, _)) => {
                    children.insert(dir, true);
                }
                None => {
                    children.entry(rest).or_insert(false);
                }
            }
        }

        let mut listing = Vec::new();
        for (name, is_dir) in children {
            let child_path = format!("{prefix}{name}");
            let cid = if is_dir {
                Self::directory_cid(files, &child_path)
            } else {
                ContentId::for_bytes(&files[&child_path])
            };
            listing.extend_from_slice(name.as_bytes());
            listing.push(0);
            listing.extend_from_slice(cid.as_str().as_bytes());
            listing.push(b'\n');
        }

        ContentId::from_digest(DAG_PB_CODEC, &listing)
    }

    fn parent_of(path: &str) -> &str {
        match path.rfind('/') {
            Some(0) | None => "/",
            Some(idx) => &path[..idx],
        }
    }
}

#[async_trait]
impl StorageNode for MemoryNode {
    #[instrument(skip(self, data, options), fields(bytes = data.len()))]
    async fn write(&self, path: &str, data: Bytes, options: &WriteOptions) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.write_log.write().push(path.to_string());

        if self.failing_writes.read().contains(path) {
            return Err(MetapinError::UploadTransport(format!(
                "files/write {path}: connection reset"
            )));
        }
        if options.cid_version != CID_VERSION || options.hash != HASH_ALGORITHM {
            return Err(MetapinError::Validation(format!(
                "memory node only supports CIDv{CID_VERSION} with {HASH_ALGORITHM}"
            )));
        }

        let mut files = self.files.write();
        if Self::is_directory(&files, path) {
            return Err(MetapinError::UploadTransport(format!(
                "files/write {path}: path is a directory"
            )));
        }
        if !options.parents && !Self::is_directory(&files, Self::parent_of(path)) {
            return Err(MetapinError::UploadTransport(format!(
                "files/write {path}: file does not exist"
            )));
        }
        if !options.create && !files.contains_key(path) {
            return Err(MetapinError::UploadTransport(format!(
                "files/write {path}: file does not exist"
            )));
        }

        let content = match files.get(path) {
            Some(existing) if !options.truncate && existing.len() > data.len() => {
                let mut merged = data.to_vec();
                merged.extend_from_slice(&existing[data.len()..]);
                Bytes::from(merged)
            }
            _ => data,
        };

        debug!(path, "Stored file in memory node");
        files.insert(path.to_string(), content);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn stat(&self, path: &str) -> Result<PathStat> {
        self.stats.fetch_add(1, Ordering::SeqCst);

        if self.failing_stats.read().contains(path) {
            return Err(MetapinError::UploadTransport(format!(
                "files/stat {path}: connection reset"
            )));
        }

        let files = self.files.read();
        if let Some(data) = files.get(path) {
            let size = data.len() as u64;
            return Ok(PathStat {
                cid: ContentId::for_bytes(data),
                size,
                cumulative_size: size,
                kind: EntryKind::File,
            });
        }

        if Self::is_directory(&files, path) {
            let prefix = format!("{}/", path.trim_end_matches('/'));
            let cumulative_size = files
                .iter()
                .filter(|(file, _)| path == "/" || file.starts_with(&prefix))
                .map(|(_, data)| data.len() as u64)
                .sum();
            return Ok(PathStat {
                cid: Self::directory_cid(&files, path),
                size: 0,
                cumulative_size,
                kind: EntryKind::Directory,
            });
        }

        Err(MetapinError::PathNotFound(path.to_string()))
    }

    #[instrument(skip(self))]
    async fn pin(&self, cid: &ContentId) -> Result<()> {
        self.pin_calls.fetch_add(1, Ordering::SeqCst);
        let mut pins = self.pins.write();
        if !pins.contains(cid) {
            pins.push(cid.clone());
        }
        Ok(())
    }
}

/// Connects every profile to the same [`MemoryNode`].
#[derive(Debug)]
pub struct MemoryConnector {
    node: Arc<MemoryNode>,
    connects: AtomicU64,
}

impl MemoryConnector {
    /// Creates a connector serving `node`.
    pub fn new(node: Arc<MemoryNode>) -> Self {
        Self {
            node,
            connects: AtomicU64::new(0),
        }
    }

    /// Number of `connect` calls served.
    pub fn connects(&self) -> u64 {
        self.connects.load(Ordering::SeqCst)
    }
}

impl NodeConnector for MemoryConnector {
    fn connect(&self, _profile: &NodeProfile) -> Result<Arc<dyn StorageNode>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(self.node.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(s: &str) -> Bytes {
        Bytes::from(s.to_string())
    }

    #[tokio::test]
    async fn test_file_cid_is_raw_v1() {
        let node = MemoryNode::new();
        node.write("/a/b.json", bytes("{}"), &WriteOptions::default()).await.unwrap();
        let stat = node.stat("/a/b.json").await.unwrap();
        assert_eq!(stat.cid, ContentId::for_bytes(b"{}"));
        assert_eq!(stat.kind, EntryKind::File);
        assert_eq!(stat.size, 2);
    }

    #[tokio::test]
    async fn test_directory_cid_depends_on_children() {
        let node = MemoryNode::new();
        node.write("/d/1.json", bytes("x"), &WriteOptions::default()).await.unwrap();
        let first = node.stat("/d").await.unwrap();
        assert_eq!(first.kind, EntryKind::Directory);

        node.write("/d/1.json", bytes("x"), &WriteOptions::default()).await.unwrap();
        assert_eq!(node.stat("/d").await.unwrap().cid, first.cid);

        node.write("/d/2.json", bytes("x"), &WriteOptions::default()).await.unwrap();
        assert_ne!(node.stat("/d").await.unwrap().cid, first.cid);
    }

    #[tokio::test]
    async fn test_missing_path() {
        let node = MemoryNode::new();
        assert!(matches!(
            node.stat("/metadog").await,
            Err(MetapinError::PathNotFound(p)) if p == "/metadog"
        ));
    }

    #[tokio::test]
    async fn test_parents_required_without_flag() {
        let node = MemoryNode::new();
        let options = WriteOptions {
            parents: false,
            ..WriteOptions::default()
        };
        assert!(node.write("/missing/x", bytes("x"), &options).await.is_err());
        assert!(node.write("/x", bytes("x"), &options).await.is_ok());
    }

    #[tokio::test]
    async fn test_truncate_off_keeps_tail() {
        let node = MemoryNode::new();
        node.write("/f", bytes("abcdef"), &WriteOptions::default()).await.unwrap();
        let options = WriteOptions {
            truncate: false,
            ..WriteOptions::default()
        };
        node.write("/f", bytes("XY"), &options).await.unwrap();
        assert_eq!(node.read("/f").unwrap(), bytes("XYcdef"));

        node.write("/f", bytes("XY"), &WriteOptions::default()).await.unwrap();
        assert_eq!(node.read("/f").unwrap(), bytes("XY"));
    }

    #[tokio::test]
    async fn test_injected_failures_are_counted() {
        let node = MemoryNode::new();
        node.fail_writes_to("/bad");
        assert!(matches!(
            node.write("/bad", bytes("x"), &WriteOptions::default()).await,
            Err(MetapinError::UploadTransport(_))
        ));
        assert_eq!(node.calls().writes, 1);
        assert_eq!(node.write_log(), vec!["/bad"]);
        assert!(node.read("/bad").is_none());
    }

    #[test]
    fn test_connector_counts_connects() {
        let connector = MemoryConnector::new(Arc::new(MemoryNode::new()));
        connector.connect(&NodeProfile::new("local", "memory://")).unwrap();
        assert_eq!(connector.connects(), 1);
    }
}
