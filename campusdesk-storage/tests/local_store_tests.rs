use campusdesk_storage::{LocalStore, MemoryStore, SqliteStore, StorageError};
use tempfile::TempDir;

fn exercise(store: &dyn LocalStore) {
    assert_eq!(store.get("missing").unwrap(), None);

    store.set("a", "1").unwrap();
    assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));

    store.set("a", "2").unwrap();
    assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
}

// ── MemoryStore ───────────────────────────────────────────────────

#[test]
fn memory_store_get_set_overwrite() {
    let store = MemoryStore::new();
    exercise(&store);
    assert_eq!(store.len(), 1);
}

#[test]
fn memory_store_quota_rejects_oversized_write() {
    let store = MemoryStore::with_quota(16);
    store.set("k", "small").unwrap();

    let err = store.set("big", &"x".repeat(64)).unwrap_err();
    assert!(matches!(err, StorageError::QuotaExceeded(_)));
    assert_eq!(store.get("big").unwrap(), None);
    assert_eq!(store.get("k").unwrap().as_deref(), Some("small"));
}

#[test]
fn memory_store_quota_counts_replacement_not_sum() {
    let store = MemoryStore::with_quota(10);
    store.set("k", "12345678").unwrap();
    // Replacing the same key must not count the old value.
    store.set("k", "87654321").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("87654321"));
}

// ── SqliteStore ───────────────────────────────────────────────────

#[test]
fn sqlite_store_in_memory() {
    let store = SqliteStore::open_in_memory().unwrap();
    exercise(&store);
    assert_eq!(store.keys().unwrap(), vec!["a".to_string()]);
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("campusdesk.db");

    {
        let store = SqliteStore::open(&path).unwrap();
        store.set("campusdesk.students", "[]").unwrap();
        store.set("campusdesk.exams", "[1]").unwrap();
    }

    let reopened = SqliteStore::open(&path).unwrap();
    assert_eq!(
        reopened.get("campusdesk.exams").unwrap().as_deref(),
        Some("[1]")
    );
    assert_eq!(
        reopened.keys().unwrap(),
        vec!["campusdesk.exams".to_string(), "campusdesk.students".to_string()]
    );
}
