use std::fs;

use blogfilter_engine::{atomic_write, ensure_storage_dir, FileStorage, StorageBackend};
use tempfile::TempDir;

#[test]
fn creates_missing_storage_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("state");
    assert!(!new_dir.exists());
    ensure_storage_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing_content() {
    let temp = TempDir::new().unwrap();

    let first = atomic_write(temp.path(), "page.html", "hello").unwrap();
    assert_eq!(fs::read_to_string(&first).unwrap(), "hello");

    let second = atomic_write(temp.path(), "page.html", "world").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "world");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let result = atomic_write(&file_path, "page.html", "data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("page.html").exists());
}

#[test]
fn file_storage_round_trip_and_remove() {
    let temp = TempDir::new().unwrap();
    let storage = FileStorage::new(temp.path().to_path_buf());

    assert!(storage.get("blog_articles.v2").is_none());

    storage.set("blog_articles.v2", r#"{"written_at_ms":0}"#).unwrap();
    assert_eq!(
        storage.get("blog_articles.v2").as_deref(),
        Some(r#"{"written_at_ms":0}"#)
    );

    // Last write wins.
    storage.set("blog_articles.v2", "second").unwrap();
    assert_eq!(storage.get("blog_articles.v2").as_deref(), Some("second"));

    storage.remove("blog_articles.v2").unwrap();
    assert!(storage.get("blog_articles.v2").is_none());
    // Removing an absent key is fine.
    storage.remove("blog_articles.v2").unwrap();
}
