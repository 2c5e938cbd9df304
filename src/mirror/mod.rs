//! Write mirroring.
//!
//! [`MirroredStore`] decorates any [`Datastore`](crate::Datastore): the real
//! write happens first and only writes that landed are broadcast to the
//! observers held by the [`ObserverRegistry`].

mod mirrored_store;
mod observer;
mod observers;
mod registry;

pub use mirrored_store::*;
pub use observer::*;
pub use observers::*;
pub use registry::*;
