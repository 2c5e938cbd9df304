mod adaptors;
mod datastore;

pub use adaptors::*;
pub use datastore::*;
