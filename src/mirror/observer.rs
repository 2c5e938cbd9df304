use std::fmt;

use bytes::Bytes;
#[cfg(test)]
use mockall::automock;

use crate::Key;
use crate::Result;

/// Kind of write an observer is told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Put,
    Delete,
}

impl Operation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Operation::Put => "put",
            Operation::Delete => "del",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One put of a committed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub key: Key,
    pub value: Bytes,
}

/// Side-effect-only subscriber to every durable write of a mirrored store.
///
/// Callbacks run synchronously on the writing thread: they should return
/// quickly and report their own failures out of band. A panicking observer is
/// contained by the registry and does not affect the write or other observers.
#[cfg_attr(test, automock)]
pub trait Observer: Send + Sync + 'static {
    fn name(&self) -> String;

    fn on_put(
        &self,
        key: &Key,
        value: &Bytes,
    );

    fn on_delete(
        &self,
        key: &Key,
    );

    /// Called once per committed batch with everything it wrote.
    fn on_batch(
        &self,
        puts: &[BatchItem],
        deletes: &[Key],
    );

    /// Pushes buffered output to its sink. Observers without a buffer keep the
    /// no-op default.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
