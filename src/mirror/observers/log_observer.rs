use bytes::Bytes;
use tracing::Level;

use crate::BatchItem;
use crate::Key;
use crate::Observer;
use crate::Operation;
use crate::LOG_OBSERVER_NAME;

macro_rules! event_at {
    ($level:expr, $($arg:tt)+) => {
        if $level == Level::TRACE {
            tracing::trace!($($arg)+)
        } else if $level == Level::DEBUG {
            tracing::debug!($($arg)+)
        } else if $level == Level::INFO {
            tracing::info!($($arg)+)
        } else if $level == Level::WARN {
            tracing::warn!($($arg)+)
        } else {
            tracing::error!($($arg)+)
        }
    };
}

/// Emits one structured event per written key.
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    level: Level,
}

impl Default for LogObserver {
    fn default() -> Self {
        LogObserver { level: Level::INFO }
    }
}

impl LogObserver {
    pub fn new(level: Level) -> Self {
        LogObserver { level }
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

impl Observer for LogObserver {
    fn name(&self) -> String {
        LOG_OBSERVER_NAME.to_string()
    }

    fn on_put(
        &self,
        key: &Key,
        value: &Bytes,
    ) {
        event_at!(
            self.level,
            op = Operation::Put.as_str(),
            key = key.as_str(),
            value = %hex::encode(value),
            "put"
        );
    }

    fn on_delete(
        &self,
        key: &Key,
    ) {
        event_at!(
            self.level,
            op = Operation::Delete.as_str(),
            key = key.as_str(),
            "delete"
        );
    }

    fn on_batch(
        &self,
        puts: &[BatchItem],
        deletes: &[Key],
    ) {
        for item in puts {
            self.on_put(&item.key, &item.value);
        }
        for key in deletes {
            self.on_delete(key);
        }
    }
}
