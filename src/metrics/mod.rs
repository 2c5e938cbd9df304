use autometrics::prometheus_exporter;
use autometrics::prometheus_exporter::PrometheusResponse;
use lazy_static::lazy_static;
use prometheus::Encoder;
use prometheus::IntCounterVec;
use prometheus::Opts;
use prometheus::Registry;
use tracing::warn;

#[cfg(test)]
mod metrics_test;

lazy_static! {
    pub static ref CACHE_LOOKUPS: IntCounterVec = IntCounterVec::new(
        Opts::new("peerbook_cache_lookups", "Cache lookups by book and outcome (hit/miss)"),
        &["book", "outcome"]
    )
    .expect("metric can not be created");

    pub static ref OBSERVER_NOTIFICATIONS: IntCounterVec = IntCounterVec::new(
        Opts::new("peerbook_observer_notifications", "Notifications broadcast to observers"),
        &["op"]
    )
    .expect("metric can not be created");

    pub static ref OBSERVER_PANICS: IntCounterVec = IntCounterVec::new(
        Opts::new("peerbook_observer_panics", "Observer callbacks that panicked"),
        &["observer"]
    )
    .expect("metric can not be created");

    pub static ref STORE_WRITE_FAILURES: IntCounterVec = IntCounterVec::new(
        Opts::new("peerbook_store_write_failures", "Failed writes on the mirrored store"),
        &["op"]
    )
    .expect("metric can not be created");

    pub static ref REGISTRY: Registry = Registry::new();
}

/// Registers the peer book collectors on `registry`.
///
/// Registering twice on the same registry is reported and ignored.
pub fn register_custom_metrics(registry: &Registry) {
    let collectors = [
        CACHE_LOOKUPS.clone(),
        OBSERVER_NOTIFICATIONS.clone(),
        OBSERVER_PANICS.clone(),
        STORE_WRITE_FAILURES.clone(),
    ];
    for collector in collectors {
        if let Err(e) = registry.register(Box::new(collector)) {
            warn!("collector registration skipped: {}", e);
        }
    }
}

pub(crate) fn record_cache_lookup(
    book: &str,
    hit: bool,
) {
    let outcome = if hit { "hit" } else { "miss" };
    CACHE_LOOKUPS.with_label_values(&[book, outcome]).inc();
}

/// Text exposition of the crate registry followed by the autometrics series.
pub fn gather_metrics() -> String {
    let encoder = prometheus::TextEncoder::new();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        warn!("could not encode custom metrics: {}", e);
    };
    let mut res = match String::from_utf8(buffer) {
        Ok(v) => v,
        Err(e) => {
            warn!("custom metrics could not be from_utf8'd: {}", e);
            String::default()
        }
    };

    res.push_str(&get_metrics_body());
    res
}

/// Export metrics for Prometheus to scrape
pub fn get_metrics_body() -> String {
    let autometrics_response = prometheus_exporter::encode_http_response();
    autometrics_response.into_body()
}

/// Export metrics for Prometheus to scrape
pub fn get_metrics() -> PrometheusResponse {
    prometheus_exporter::encode_http_response()
}
