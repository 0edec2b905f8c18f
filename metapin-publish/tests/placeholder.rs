//! Placeholder workflow against an in-memory node.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::json;
use tempfile::TempDir;

use metapin_core::error::MetapinError;
use metapin_core::types::{canonical_json, CollectionLayout, ContentId, NodeProfile};
use metapin_ipfs::{CidResolver, ContentUploader, MemoryConnector, MemoryNode, NodeRegistry};
use metapin_publish::{AssetStore, PlaceholderOptions, PlaceholderPublisher, PublishEvent};

const IMAGE: &[u8] = b"\x89PNG\r\n\x1a\nplaceholder";

struct Harness {
    assets: TempDir,
    node: Arc<MemoryNode>,
    connector: Arc<MemoryConnector>,
    uploader: Arc<ContentUploader>,
    resolver: Arc<CidResolver>,
}

impl Harness {
    fn new(generated: usize) -> Self {
        let assets = tempfile::tempdir().unwrap();
        write_assets(assets.path(), generated);

        let node = Arc::new(MemoryNode::new());
        let connector = Arc::new(MemoryConnector::new(node.clone()));
        let registry = Arc::new(
            NodeRegistry::new([NodeProfile::new("local", "http://127.0.0.1:5001")]).unwrap(),
        );
        let uploader = Arc::new(ContentUploader::new(registry.clone(), connector.clone()));
        let resolver = Arc::new(CidResolver::new(registry, connector.clone()));

        Self {
            assets,
            node,
            connector,
            uploader,
            resolver,
        }
    }

    fn publisher(&self) -> PlaceholderPublisher {
        PlaceholderPublisher::new(
            self.uploader.clone(),
            self.resolver.clone(),
            AssetStore::new(self.assets.path(), CollectionLayout::default()),
        )
    }

    fn expected_metadata(&self) -> Vec<u8> {
        let image_cid = ContentId::for_bytes(IMAGE);
        canonical_json(&json!({
            "name": "MetaDog",
            "description": "Unrevealed",
            "image": image_cid.to_uri(),
        }))
        .unwrap()
    }
}

fn write_assets(root: &Path, generated: usize) {
    let placeholder = root.join("assets/placeholder");
    std::fs::create_dir_all(&placeholder).unwrap();
    std::fs::write(placeholder.join("placeholder.png"), IMAGE).unwrap();
    std::fs::write(
        placeholder.join("placeholder.json"),
        r#"{ "name": "MetaDog", "image": "", "description": "Unrevealed" }"#,
    )
    .unwrap();

    if generated > 0 {
        let cards = root.join("assets/generated/cards");
        std::fs::create_dir_all(&cards).unwrap();
        for index in 1..=generated {
            std::fs::write(cards.join(format!("{index}.png")), format!("card {index}")).unwrap();
        }
        std::fs::write(cards.join(".DS_Store"), b"junk").unwrap();
    }
}

#[tokio::test]
async fn test_fans_out_one_identical_document_per_image() {
    let harness = Harness::new(3);
    let result = harness.publisher().publish("local").await.unwrap();

    assert_eq!(
        harness.node.file_paths(),
        vec![
            "/metadog-placeholder/1.json",
            "/metadog-placeholder/2.json",
            "/metadog-placeholder/3.json",
            "/metadog-placeholder/placeholder.png",
        ]
    );

    let expected = harness.expected_metadata();
    for index in 1..=3 {
        let stored = harness
            .node
            .read(&format!("/metadog-placeholder/{index}.json"))
            .unwrap();
        assert_eq!(stored.as_ref(), expected.as_slice());
    }

    let written = std::fs::read(harness.assets.path().join("assets/generated/placeholder.json")).unwrap();
    assert_eq!(written, expected);

    let dir_cid = harness.resolver.resolve_cid("local", "/metadog-placeholder").await.unwrap();
    assert_eq!(result.cid, dir_cid);
    assert_eq!(result.base_token_uri, format!("ipfs://{dir_cid}"));
}

#[tokio::test]
async fn test_every_upload_is_pinned() {
    let harness = Harness::new(2);
    harness.publisher().publish("local").await.unwrap();

    let pinned = harness.node.pinned();
    assert!(pinned.contains(&ContentId::for_bytes(IMAGE)));
    assert!(pinned.contains(&ContentId::for_bytes(&harness.expected_metadata())));
    // image + two identical metadata copies
    assert_eq!(harness.node.calls().pins, 3);
}

#[tokio::test]
async fn test_republish_gives_same_directory_cid() {
    let harness = Harness::new(4);
    let first = harness.publisher().publish("local").await.unwrap();
    let second = harness.publisher().publish("local").await.unwrap();
    assert_eq!(first, second);

    let fresh = Harness::new(4);
    let third = fresh.publisher().publish("local").await.unwrap();
    assert_eq!(first.cid, third.cid);
}

#[tokio::test]
async fn test_no_generated_images_still_uploads_placeholder_image() {
    let harness = Harness::new(0);
    let result = harness.publisher().publish("local").await.unwrap();

    assert_eq!(harness.node.file_paths(), vec!["/metadog-placeholder/placeholder.png"]);
    assert!(harness
        .assets
        .path()
        .join("assets/generated/placeholder.json")
        .exists());
    assert_eq!(
        result.cid,
        harness.resolver.resolve_cid("local", "/metadog-placeholder").await.unwrap()
    );
}

#[tokio::test]
async fn test_failure_aborts_at_failing_index() {
    let harness = Harness::new(5);
    harness.node.fail_writes_to("/metadog-placeholder/3.json");

    let err = harness.publisher().publish("local").await.unwrap_err();
    match &err {
        MetapinError::MetadataUpload { index, source } => {
            assert_eq!(*index, 3);
            assert!(matches!(**source, MetapinError::UploadTransport(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let log = harness.node.write_log();
    assert_eq!(log.last().unwrap(), "/metadog-placeholder/3.json");
    assert!(!log.contains(&"/metadog-placeholder/4.json".to_string()));
    // image, 1.json and 2.json were stat'd; the directory never was
    assert_eq!(harness.node.calls().stats, 3);
}

#[tokio::test]
async fn test_unknown_node_touches_nothing() {
    let harness = Harness::new(3);
    let err = harness.publisher().publish("mainnet").await.unwrap_err();

    assert!(matches!(err, MetapinError::UnknownNode { .. }));
    assert_eq!(harness.connector.connects(), 0);
    assert_eq!(harness.node.calls().total(), 0);
    assert!(!harness
        .assets
        .path()
        .join("assets/generated/placeholder.json")
        .exists());
}

#[tokio::test]
async fn test_concurrent_fan_out_matches_sequential() {
    let sequential = Harness::new(12);
    let expected = sequential.publisher().publish("local").await.unwrap();

    let concurrent = Harness::new(12);
    let result = concurrent
        .publisher()
        .with_options(PlaceholderOptions {
            concurrency: 4,
            ..Default::default()
        })
        .publish("local")
        .await
        .unwrap();

    assert_eq!(result, expected);
    assert_eq!(concurrent.node.file_paths().len(), 13);
}

#[tokio::test]
async fn test_concurrent_failure_names_the_index() {
    let harness = Harness::new(8);
    harness.node.fail_writes_to("/metadog-placeholder/5.json");

    let err = harness
        .publisher()
        .with_options(PlaceholderOptions {
            concurrency: 3,
            ..Default::default()
        })
        .publish("local")
        .await
        .unwrap_err();
    assert!(matches!(err, MetapinError::MetadataUpload { index: 5, .. }));
}

#[tokio::test]
async fn test_template_must_be_an_object() {
    let harness = Harness::new(1);
    std::fs::write(
        harness.assets.path().join("assets/placeholder/placeholder.json"),
        "[1, 2, 3]",
    )
    .unwrap();

    let err = harness.publisher().publish("local").await.unwrap_err();
    assert!(matches!(err, MetapinError::Asset(_)));
}

#[tokio::test]
async fn test_progress_events_in_order() {
    let harness = Harness::new(2);
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();

    let result = harness
        .publisher()
        .with_progress(Box::new(move |event: &PublishEvent| sink.lock().push(event.clone())))
        .publish("local")
        .await
        .unwrap();

    let metadata_cid = ContentId::for_bytes(&harness.expected_metadata());
    assert_eq!(
        *events.lock(),
        vec![
            PublishEvent::ImagesCounted { count: 2 },
            PublishEvent::ImageUploaded {
                cid: ContentId::for_bytes(IMAGE)
            },
            PublishEvent::MetadataUploaded {
                index: 1,
                total: 2,
                cid: metadata_cid.clone()
            },
            PublishEvent::MetadataUploaded {
                index: 2,
                total: 2,
                cid: metadata_cid
            },
            PublishEvent::DirectoryResolved { cid: result.cid },
        ]
    );
}
