//! Per-peer books: in-memory views over the persisted peer facets.
//!
//! Every book writes through the datastore it is given (normally the mirrored
//! store, so observers see each persisted facet) and lazily loads missing
//! entries on read.

mod enr_book;
mod metadata_book;
mod status_book;

pub use enr_book::*;
pub use metadata_book::*;
pub use status_book::*;


use crate::Result;

/// Books holding state that may be newer in memory than in the store.
///
/// Books that write through on every update keep the no-op default.
pub trait Flusher: Send + Sync {
    fn name(&self) -> &'static str;

    /// Re-persists everything held in memory. Best effort: every entry is
    /// attempted and all failures are reported together.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
