mod sled_datastore;

pub use sled_datastore::*;

#[cfg(test)]
mod sled_datastore_test;

use crate::Error;
use crate::StorageConfig;

/// Opens the sled database backing the peer books.
pub fn init_sled_peer_db(config: &StorageConfig) -> Result<sled::Db, Error> {
    tracing::debug!("init_sled_peer_db from path: {:?}", &config.db_path);

    sled::Config::default()
        .path(&config.db_path)
        .cache_capacity(config.cache_capacity_bytes)
        .flush_every_ms(config.flush_every_ms)
        .use_compression(config.use_compression)
        .compression_factor(1)
        .open()
        .map_err(|e| {
            tracing::warn!(
                "Try to open DB at this location: {:?} and failed: {:?}",
                config.db_path,
                e
            );
            e.into()
        })
}
