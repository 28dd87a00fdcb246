use almanac_error::{AlmanacErrorKind, StorageErrorKind};
use almanac_storage::ReportStorage;
use tempfile::TempDir;

#[tokio::test]
async fn test_new_creates_nested_root() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("a").join("b");

    let storage = ReportStorage::new(&root).await.unwrap();
    assert!(root.is_dir());
    assert_eq!(storage.root(), root.as_path());

    // Opening again is fine.
    ReportStorage::new(&root).await.unwrap();
}

#[tokio::test]
async fn test_write_step_is_verbatim() {
    let temp_dir = TempDir::new().unwrap();
    let storage = ReportStorage::new(temp_dir.path()).await.unwrap();

    let content = "## Market Structure\n\nTwo-sided, fragmented.\n";
    let path = storage
        .write_step("market_structure.md", content)
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    assert_eq!(storage.read("market_structure.md").await.unwrap(), content);
    assert!(!temp_dir.path().join("market_structure.tmp").exists());
}

#[tokio::test]
async fn test_rewrite_replaces_content() {
    let temp_dir = TempDir::new().unwrap();
    let storage = ReportStorage::new(temp_dir.path()).await.unwrap();

    storage.write_step("next_steps.md", "first").await.unwrap();
    storage.write_step("next_steps.md", "second").await.unwrap();

    assert_eq!(storage.read("next_steps.md").await.unwrap(), "second");
}

#[tokio::test]
async fn test_write_error_uses_error_suffix() {
    let temp_dir = TempDir::new().unwrap();
    let storage = ReportStorage::new(temp_dir.path()).await.unwrap();

    let path = storage
        .write_error("worker_journey", "Rate limited: 429")
        .await
        .unwrap();

    assert_eq!(path, temp_dir.path().join("worker_journey.error.md"));
    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.starts_with("# Error in worker_journey"));
    assert!(content.contains("Rate limited: 429"));
}

#[tokio::test]
async fn test_write_document() {
    let temp_dir = TempDir::new().unwrap();
    let storage = ReportStorage::new(temp_dir.path()).await.unwrap();

    storage
        .write_document("final_multi_step_analysis.md", "# Report\n")
        .await
        .unwrap();

    assert!(temp_dir.path().join("final_multi_step_analysis.md").exists());
}

#[tokio::test]
async fn test_rejects_path_like_names() {
    let temp_dir = TempDir::new().unwrap();
    let storage = ReportStorage::new(temp_dir.path()).await.unwrap();

    for name in ["", "..", "../escape.md", "nested/file.md"] {
        let err = storage.write_step(name, "x").await.unwrap_err();
        match err.kind() {
            AlmanacErrorKind::Storage(e) => {
                assert!(matches!(e.kind, StorageErrorKind::InvalidPath(_)))
            }
            other => panic!("unexpected error kind: {other}"),
        }
    }
}

#[tokio::test]
async fn test_read_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let storage = ReportStorage::new(temp_dir.path()).await.unwrap();

    assert!(storage.read("missing.md").await.is_err());
}
