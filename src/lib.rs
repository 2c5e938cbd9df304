mod books;
mod config;
mod constants;
mod errors;
mod metrics;
mod mirror;
mod peerstore;
mod storage;
mod types;
pub mod utils;

pub use books::*;
pub use self::config::*;
pub use constants::*;
pub use errors::*;
pub use metrics::*;
pub use mirror::*;
pub use peerstore::*;
pub use storage::*;
pub use types::*;
pub use utils::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
//-----------------------------------------------------------
// Autometrics
/// autometrics: https://docs.autometrics.dev/rust/adding-alerts-and-slos
use autometrics::objectives::Objective;
use autometrics::objectives::ObjectiveLatency;
use autometrics::objectives::ObjectivePercentile;
const API_SLO: Objective = Objective::new("api")
    .success_rate(ObjectivePercentile::P99_9)
    .latency(ObjectiveLatency::Ms10, ObjectivePercentile::P99);
