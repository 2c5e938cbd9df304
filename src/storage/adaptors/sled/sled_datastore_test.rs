use bytes::Bytes;
use tempfile::TempDir;
use tracing_test::traced_test;

use super::*;
use crate::Batch;
use crate::Datastore;
use crate::Key;
use crate::StorageConfig;

fn storage_config(dir: &TempDir) -> StorageConfig {
    StorageConfig {
        db_path: dir.path().join("peerstore"),
        ..StorageConfig::default()
    }
}

#[test]
#[traced_test]
fn test_sled_put_get_delete() {
    let dir = tempfile::tempdir().unwrap();
    let store = SledDatastore::open(&storage_config(&dir)).unwrap();
    let key = Key::new("/peers/eth2/AA/status");

    assert!(store.get(&key).unwrap().is_none());
    store.put(&key, Bytes::from_static(b"hello")).unwrap();
    assert_eq!(store.get(&key).unwrap(), Some(Bytes::from_static(b"hello")));
    assert_eq!(store.len(), 1);

    store.delete(&key).unwrap();
    assert!(store.get(&key).unwrap().is_none());
    assert!(store.is_empty());
}

#[test]
#[traced_test]
fn test_sled_batch_commit() {
    let dir = tempfile::tempdir().unwrap();
    let store = SledDatastore::open(&storage_config(&dir)).unwrap();
    store.put(&Key::new("/old"), Bytes::from_static(b"x")).unwrap();

    let mut batch = store.batch().unwrap();
    batch.put(Key::new("/a"), Bytes::from_static(b"1")).unwrap();
    batch.put(Key::new("/b"), Bytes::from_static(b"2")).unwrap();
    batch.delete(Key::new("/old")).unwrap();
    assert!(store.get(&Key::new("/a")).unwrap().is_none());

    batch.commit().unwrap();
    assert_eq!(store.get(&Key::new("/a")).unwrap(), Some(Bytes::from_static(b"1")));
    assert_eq!(store.get(&Key::new("/b")).unwrap(), Some(Bytes::from_static(b"2")));
    assert!(store.get(&Key::new("/old")).unwrap().is_none());
}

#[test]
#[traced_test]
fn test_sled_data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = storage_config(&dir);
    {
        let store = SledDatastore::open(&config).unwrap();
        store.put(&Key::new("/k"), Bytes::from_static(b"v")).unwrap();
        store.flush().unwrap();
    }
    let store = SledDatastore::open(&config).unwrap();
    assert_eq!(store.get(&Key::new("/k")).unwrap(), Some(Bytes::from_static(b"v")));
}
