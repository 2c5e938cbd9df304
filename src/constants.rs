// -
// Key layout

/// Key prefix every peer facet lives under unless configured otherwise
pub const DEFAULT_NAMESPACE: &str = "/peers/eth2";

// -
// Observers

/// Name reported by the log observer
pub(crate) const LOG_OBSERVER_NAME: &str = "log";

/// Name reported by the CSV observer attached from configuration
pub(crate) const CSV_OBSERVER_NAME: &str = "csv";

/// Fallback text when a peer view cannot be rendered
pub(crate) const VIEW_FORMAT_FAILED: &str = "failed to format peer data";
