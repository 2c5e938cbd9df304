use super::*;

fn create_test_registry() -> Registry {
    let registry = Registry::new_custom(Some("test".to_string()), None).unwrap();
    register_custom_metrics(&registry);
    registry
}

#[test]
fn test_custom_registry() {
    let registry = create_test_registry();

    OBSERVER_NOTIFICATIONS.with_label_values(&["put"]).inc();
    let metrics = &registry.gather();
    assert!(!metrics.is_empty());

    let metric_names: Vec<_> = metrics.iter().map(|m| m.get_name()).collect();
    assert!(
        metric_names.contains(&"test_peerbook_observer_notifications"),
        "Missing test_peerbook_observer_notifications"
    );
}

#[test]
fn test_double_registration_is_ignored() {
    let registry = create_test_registry();
    register_custom_metrics(&registry);

    STORE_WRITE_FAILURES.with_label_values(&["del"]).inc();
    let names: Vec<_> = registry
        .gather()
        .iter()
        .map(|m| m.get_name().to_string())
        .filter(|n| n == "test_peerbook_store_write_failures")
        .collect();
    assert_eq!(names.len(), 1);
}

#[test]
fn test_cache_lookup_labels() {
    let before_hit = CACHE_LOOKUPS.with_label_values(&["metrics_test", "hit"]).get();
    let before_miss = CACHE_LOOKUPS.with_label_values(&["metrics_test", "miss"]).get();

    record_cache_lookup("metrics_test", true);
    record_cache_lookup("metrics_test", true);
    record_cache_lookup("metrics_test", false);

    assert_eq!(
        CACHE_LOOKUPS.with_label_values(&["metrics_test", "hit"]).get(),
        before_hit + 2
    );
    assert_eq!(
        CACHE_LOOKUPS.with_label_values(&["metrics_test", "miss"]).get(),
        before_miss + 1
    );
}

#[test]
fn test_gather_metrics_includes_registered_collectors() {
    register_custom_metrics(&REGISTRY);
    OBSERVER_PANICS.with_label_values(&["metrics_test"]).inc();

    let body = gather_metrics();
    assert!(body.contains("peerbook_observer_panics"));
}
