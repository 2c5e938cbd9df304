//! Peer book error hierarchy
//!
//! Errors are split by the layer that produced them: the underlying key-value
//! store, the per-peer books (lookups and decoding), observers, configuration
//! and the external peer registry.

use config::ConfigError;

use crate::Facet;
use crate::PeerId;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failures reported by the wrapped key-value store
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Missing or undecodable per-peer facet data
    #[error(transparent)]
    Book(#[from] BookError),

    /// Observer failures surfaced by flush/close
    #[error(transparent)]
    Observer(#[from] ObserverError),

    /// Configuration loading and validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// External peer registry lookups
    #[error("peer registry error: {0}")]
    Registry(String),

    /// A facet read of the aggregate peer view failed
    #[error("couldn't get {facet} for peer {peer}: {source}")]
    View {
        facet: &'static str,
        peer: PeerId,
        source: Box<Error>,
    },

    /// A cached facet could not be written back during a flush
    #[error("failed to persist {facet} of peer {peer}: {source}")]
    Persist {
        facet: Facet,
        peer: PeerId,
        source: Box<Error>,
    },

    /// Best-effort operations report every failure they ran into
    #[error("failed while {context}; err(s): {}", display_errors(.errors))]
    Aggregate {
        context: &'static str,
        errors: Vec<Error>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Disk I/O failures
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// Embedded database errors
    #[error("Embedded database error: {0}")]
    DbError(String),

    /// Batch could not be committed atomically
    #[error("Batch commit failed: {0}")]
    BatchCommit(String),

    /// Store refused the operation (closed, read-only, ...)
    #[error("Datastore unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum BookError {
    /// Nothing cached and nothing persisted. A normal outcome for fresh peers.
    #[error("no {facet} found for peer {peer}")]
    NotFound { peer: PeerId, facet: Facet },

    /// Persisted bytes exist but are corrupt
    #[error("failed to parse {facet} for peer {peer} from datastore: {source}")]
    Decode {
        peer: PeerId,
        facet: Facet,
        #[source]
        source: DecodeError,
    },
}

/// Record codec failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid byte length: expected {expected} bytes, received {actual} bytes")]
    InvalidLength { expected: usize, actual: usize },

    #[error("input too short: need at least {minimum} bytes, received {actual} bytes")]
    TooShort { minimum: usize, actual: usize },

    #[error("stored record is not valid utf-8")]
    InvalidUtf8,

    #[error("record could not be parsed: {0}")]
    Parse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// A single notification could not be recorded
    #[error("observer {name} failed to write {context}: {source}")]
    Write {
        name: String,
        context: String,
        #[source]
        source: csv::Error,
    },

    /// Buffered notifications could not be pushed to the sink
    #[error("observer {name} failed to flush: {source}")]
    Flush {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// True when a facet simply has no data for the peer.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Book(BookError::NotFound { .. }))
    }

    /// True when persisted data exists but could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Book(BookError::Decode { .. }))
    }

    pub(crate) fn view(
        facet: &'static str,
        peer: &PeerId,
        source: Error,
    ) -> Self {
        Error::View {
            facet,
            peer: peer.clone(),
            source: Box::new(source),
        }
    }

    pub(crate) fn persist(
        facet: Facet,
        peer: &PeerId,
        source: Error,
    ) -> Self {
        Error::Persist {
            facet,
            peer: peer.clone(),
            source: Box::new(source),
        }
    }

    /// Splits an aggregate back into its failures so nested best-effort
    /// passes report one flat list.
    pub fn into_errors(self) -> Vec<Error> {
        match self {
            Error::Aggregate { errors, .. } => errors,
            other => vec![other],
        }
    }

    /// Folds collected failures into one error, `Ok` when there were none.
    pub(crate) fn aggregate(
        context: &'static str,
        errors: Vec<Error>,
    ) -> Result<()> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Aggregate { context, errors })
        }
    }
}

impl BookError {
    pub(crate) fn not_found(
        peer: &PeerId,
        facet: Facet,
    ) -> Self {
        BookError::NotFound {
            peer: peer.clone(),
            facet,
        }
    }

    pub(crate) fn decode(
        peer: &PeerId,
        facet: Facet,
        source: DecodeError,
    ) -> Self {
        BookError::Decode {
            peer: peer.clone(),
            facet,
            source,
        }
    }
}

fn display_errors(errors: &[Error]) -> String {
    let parts: Vec<String> = errors.iter().map(|e| format!("{:?}", e.to_string())).collect();
    format!("[{}]", parts.join(" "))
}

/// Turns the NotFound outcome of a facet read into `Ok(None)`.
pub trait ResultExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> ResultExt<T> for Result<T> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

// ============== Conversion Implementations ============== //
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Storage(StorageError::IoError(e))
    }
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::DbError(err.to_string())
    }
}

impl From<sled::Error> for Error {
    fn from(err: sled::Error) -> Self {
        StorageError::from(err).into()
    }
}
