mod mem_datastore;

pub use mem_datastore::*;
