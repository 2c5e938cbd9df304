use bytes::Bytes;
use parking_lot::Mutex;

use crate::BatchItem;
use crate::Key;
use crate::Observer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Put(Key, Bytes),
    Delete(Key),
    Batch(Vec<BatchItem>, Vec<Key>),
}

/// Keeps every notification in arrival order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    name: String,
    events: Mutex<Vec<Recorded>>,
}

impl RecordingObserver {
    pub fn new(name: &str) -> Self {
        RecordingObserver {
            name: name.to_string(),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<Recorded> {
        self.events.lock().clone()
    }

    pub fn put_keys(&self) -> Vec<Key> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                Recorded::Put(key, _) => Some(key.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Observer for RecordingObserver {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn on_put(
        &self,
        key: &Key,
        value: &Bytes,
    ) {
        self.events.lock().push(Recorded::Put(key.clone(), value.clone()));
    }

    fn on_delete(
        &self,
        key: &Key,
    ) {
        self.events.lock().push(Recorded::Delete(key.clone()));
    }

    fn on_batch(
        &self,
        puts: &[BatchItem],
        deletes: &[Key],
    ) {
        self.events
            .lock()
            .push(Recorded::Batch(puts.to_vec(), deletes.to_vec()));
    }
}

/// Panics on every notification.
#[derive(Debug, Default)]
pub struct PanickingObserver;

impl Observer for PanickingObserver {
    fn name(&self) -> String {
        "panicking".to_string()
    }

    fn on_put(
        &self,
        _key: &Key,
        _value: &Bytes,
    ) {
        panic!("observer exploded on put");
    }

    fn on_delete(
        &self,
        _key: &Key,
    ) {
        panic!("observer exploded on delete");
    }

    fn on_batch(
        &self,
        _puts: &[BatchItem],
        _deletes: &[Key],
    ) {
        panic!("observer exploded on batch");
    }
}
