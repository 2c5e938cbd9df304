use std::sync::Arc;

use peerbook::MetaData;
use peerbook::Observer;
use peerbook::PeerId;

use crate::commons::config_at;
use crate::commons::open;
use crate::commons::status_at;
use crate::commons::SeqRecord;

#[test]
fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_at(dir.path());
    let id = PeerId::from(vec![1, 2, 3, 4, 5]);

    {
        let ps = open(&config);
        ps.register_status(&id, status_at(1)).unwrap();
        assert!(ps.register_metadata(&id, MetaData::new(7, vec![0u8; 8])).unwrap());
        assert!(ps.update_enr_maybe(&id, &SeqRecord(2)).unwrap());
        ps.close().unwrap();
    }

    let ps = open(&config);
    assert_eq!(ps.status(&id).unwrap(), status_at(1));
    assert_eq!(ps.metadata(&id).unwrap().seq_number, 7);
    assert_eq!(ps.claimed_seq(&id).unwrap(), 7);
    assert_eq!(ps.latest_enr(&id).unwrap(), SeqRecord(2));

    assert!(!ps.register_metadata(&id, MetaData::new(7, vec![1u8; 8])).unwrap());
    assert!(!ps.update_enr_maybe(&id, &SeqRecord(2)).unwrap());
    assert!(ps.update_enr_maybe(&id, &SeqRecord(3)).unwrap());
    ps.close().unwrap();
}

#[test]
fn test_aggregate_view_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_at(dir.path());
    let id = PeerId::from(vec![9, 9, 9]);

    {
        let ps = open(&config);
        ps.register_seq_claim(&id, 12).unwrap();
        ps.register_meta_fetch(&id);
        ps.close().unwrap();
    }

    let ps = open(&config);
    let view = ps.all_data(&id).unwrap();
    assert_eq!(view.claimed_seq, Some(12));
    assert_eq!(view.metadata, None);
    assert_eq!(view.status, None);
    // fetch counters live in memory only
    assert_eq!(ps.meta_fetch_count(&id), 0);
    assert!(view.to_string().contains("\"claimed_seq\": 12"));
}

#[test]
fn test_csv_audit_trail_spans_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_at(dir.path());
    let audit = dir.path().join("audit.csv");
    config.observers.csv_path = Some(audit.clone());
    let id = PeerId::from(vec![4, 2]);

    for slot in 1..=2 {
        let ps = open(&config);
        ps.register_status(&id, status_at(slot)).unwrap();
        let observers: Vec<Arc<dyn Observer>> = ps.list_observers();
        assert_eq!(observers.len(), 1);
        assert_eq!(observers[0].name(), "csv");
        ps.close().unwrap();
    }

    let rows = std::fs::read_to_string(&audit).unwrap();
    // each instance writes the registration and re-persists it on close
    assert_eq!(rows.lines().count(), 4);
    assert!(rows.lines().all(|row| row.starts_with("put,")));
}
