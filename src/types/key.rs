//! Hierarchical datastore keys and the per-peer key layout.
//!
//! Persisted layout: `<namespace>/<BASE32(peer id)>/<facet suffix>`, e.g.
//! `/peers/eth2/AEBAGBA/metadata_claim`. The layout is shared with data written
//! by earlier deployments and must not change.

use std::fmt;

use crate::PeerId;

/// Slash separated key, always absolute and never ending with `/`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    /// Builds a cleaned key: leading `/` added, empty and `.` segments dropped,
    /// `..` pops the previous segment.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Key(clean(raw.as_ref()))
    }

    pub fn child(
        &self,
        name: impl AsRef<str>,
    ) -> Key {
        Key::new(format!("{}/{}", self.0, name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

fn clean(raw: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

impl fmt::Display for Key {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Key {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Key({})", self.0)
    }
}

impl From<&str> for Key {
    fn from(raw: &str) -> Self {
        Key::new(raw)
    }
}

/// Per-peer data kinds, each persisted under its own key suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Status,
    Metadata,
    MetadataClaim,
    Enr,
}

impl Facet {
    pub const ALL: [Facet; 4] = [
        Facet::Status,
        Facet::Metadata,
        Facet::MetadataClaim,
        Facet::Enr,
    ];

    pub const fn suffix(&self) -> &'static str {
        match self {
            Facet::Status => "status",
            Facet::Metadata => "metadata",
            Facet::MetadataClaim => "metadata_claim",
            Facet::Enr => "enr",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            Facet::Status => "status",
            Facet::Metadata => "metadata",
            Facet::MetadataClaim => "claimed seq nr",
            Facet::Enr => "enr",
        };
        f.write_str(name)
    }
}

/// Derives the keys of every peer facet under one namespace.
///
/// Each book receives its own `PeerKeys`, so independent instances (tests,
/// multiple networks) never share a key space by accident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerKeys {
    namespace: Key,
}

impl PeerKeys {
    pub fn new(namespace: impl AsRef<str>) -> Self {
        PeerKeys {
            namespace: Key::new(namespace),
        }
    }

    pub fn namespace(&self) -> &Key {
        &self.namespace
    }

    pub fn peer_root(
        &self,
        id: &PeerId,
    ) -> Key {
        self.namespace.child(id.to_base32())
    }

    pub fn facet(
        &self,
        id: &PeerId,
        facet: Facet,
    ) -> Key {
        self.peer_root(id).child(facet.suffix())
    }
}

impl Default for PeerKeys {
    fn default() -> Self {
        PeerKeys::new(crate::DEFAULT_NAMESPACE)
    }
}
