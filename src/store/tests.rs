#[cfg(test)]
mod tests {
    use crate::image_pipeline::{PipelineError, RawFormat};
    use crate::store::{AssetStore, Namespace, is_valid_name, sanitize_filename};
    use tempfile::TempDir;

    async fn store() -> (TempDir, AssetStore) {
        let dir = TempDir::new().unwrap();
        let store = AssetStore::new(dir.path());
        store.init().await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_init_creates_both_namespaces() {
        let (dir, _store) = store().await;
        assert!(dir.path().join("uploads").is_dir());
        assert!(dir.path().join("processed").is_dir());
    }

    #[tokio::test]
    async fn test_save_original_keeps_bytes_and_name() {
        let (_dir, store) = store().await;
        let data = b"not really a raw file".to_vec();

        let asset = store.save_original(&data, "IMG_0001.CR2").await.unwrap();

        assert!(asset.id.ends_with("_IMG_0001.CR2"));
        assert_eq!(asset.original_filename, "IMG_0001.CR2");
        assert_eq!(asset.format, RawFormat::Cr2);
        assert_eq!(store.read(Namespace::Originals, &asset.id).await.unwrap(), data);
        assert_eq!(std::fs::read(&asset.path).unwrap(), data);
    }

    #[tokio::test]
    async fn test_same_filename_uploaded_twice_gets_distinct_ids() {
        let (_dir, store) = store().await;

        let first = store.save_original(b"one", "a.nef").await.unwrap();
        let second = store.save_original(b"two", "a.nef").await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.read(Namespace::Originals, &first.id).await.unwrap(), b"one");
        assert_eq!(store.read(Namespace::Originals, &second.id).await.unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_save_original_rejects_unsupported_extension() {
        let (dir, store) = store().await;

        let err = store.save_original(b"jpeg", "holiday.jpg").await.unwrap_err();

        assert!(matches!(err, PipelineError::UnsupportedFormat(_)));
        let stored = std::fs::read_dir(dir.path().join("uploads")).unwrap().count();
        assert_eq!(stored, 0);
    }

    #[tokio::test]
    async fn test_save_original_strips_client_directories() {
        let (dir, store) = store().await;

        let asset = store.save_original(b"x", "../../etc/evil.dng").await.unwrap();

        assert_eq!(asset.original_filename, "evil.dng");
        assert!(asset.path.starts_with(dir.path().join("uploads")));
    }

    #[tokio::test]
    async fn test_save_derived_is_last_writer_wins() {
        let (_dir, store) = store().await;

        store.save_derived(b"first", "p.jpg").await.unwrap();
        let artifact = store.save_derived(b"second", "p.jpg").await.unwrap();

        assert_eq!(artifact.name, "p.jpg");
        assert_eq!(store.read(Namespace::Derived, "p.jpg").await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_namespaces_are_disjoint() {
        let (_dir, store) = store().await;
        store.save_derived(b"x", "shared.jpg").await.unwrap();

        let err = store.read(Namespace::Originals, "shared.jpg").await.unwrap_err();
        assert!(matches!(err, PipelineError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let (_dir, store) = store().await;
        let err = store.read(Namespace::Derived, "missing.jpg").await.unwrap_err();
        assert!(matches!(err, PipelineError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_traversal_names_are_absent_on_read() {
        let (dir, store) = store().await;
        std::fs::write(dir.path().join("secret.txt"), b"secret").unwrap();

        for name in ["../secret.txt", "..", ".", "", "a/b", "a\\b"] {
            let err = store.read(Namespace::Derived, name).await.unwrap_err();
            assert!(matches!(err, PipelineError::NotFound(_)), "name {:?}", name);
            assert!(!store.exists(Namespace::Derived, name).await);
        }
    }

    #[tokio::test]
    async fn test_traversal_names_are_rejected_on_write() {
        let (dir, store) = store().await;

        let err = store.save_derived(b"x", "../escape.jpg").await.unwrap_err();

        assert!(matches!(err, PipelineError::StorageError(_)));
        assert!(!dir.path().join("escape.jpg").exists());
    }

    #[tokio::test]
    async fn test_resolve_and_exists() {
        let (_dir, store) = store().await;
        let artifact = store.save_derived(b"x", "a.jpg").await.unwrap();

        assert_eq!(store.resolve(Namespace::Derived, "a.jpg").await.unwrap(), artifact.path);
        assert!(store.exists(Namespace::Derived, "a.jpg").await);
        assert!(!store.exists(Namespace::Derived, "b.jpg").await);
    }

    #[tokio::test]
    async fn test_clear_all_empties_and_recreates() {
        let (dir, store) = store().await;
        let asset = store.save_original(b"raw", "a.arw").await.unwrap();
        store.save_derived(b"jpg", "a.jpg").await.unwrap();

        store.clear_all().await.unwrap();

        assert!(!store.exists(Namespace::Originals, &asset.id).await);
        assert!(!store.exists(Namespace::Derived, "a.jpg").await);
        assert_eq!(std::fs::read_dir(dir.path().join("uploads")).unwrap().count(), 0);
        assert_eq!(std::fs::read_dir(dir.path().join("processed")).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_clear_all_is_idempotent_and_tolerates_missing_dirs() {
        let (dir, store) = store().await;
        std::fs::remove_dir_all(dir.path().join("processed")).unwrap();

        store.clear_all().await.unwrap();
        store.clear_all().await.unwrap();

        assert!(dir.path().join("uploads").is_dir());
        assert!(dir.path().join("processed").is_dir());
    }

    #[tokio::test]
    async fn test_write_recreates_vanished_namespace() {
        let (dir, store) = store().await;
        std::fs::remove_dir_all(dir.path().join("processed")).unwrap();

        store.save_derived(b"x", "late.jpg").await.unwrap();

        assert!(dir.path().join("processed").join("late.jpg").is_file());
    }

    #[test]
    fn test_name_rules() {
        assert!(is_valid_name("abc_DSC0001.NEF"));
        assert!(is_valid_name("a..b.jpg"));
        assert!(!is_valid_name(".."));
        assert!(!is_valid_name("dir/file"));
        assert!(!is_valid_name("nul\0byte"));

        assert_eq!(sanitize_filename("C:\\photos\\DSC_1.NEF"), "DSC_1.NEF");
        assert_eq!(sanitize_filename("/tmp/x.dng"), "x.dng");
        assert_eq!(sanitize_filename(".."), "");
    }
}
