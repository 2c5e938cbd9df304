use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;

use crate::utils::serde_helpers::as_display_opt;
use crate::utils::serde_helpers::as_hex_opt;
use crate::utils::serde_helpers::as_nanos;
use crate::ForkInfo;
use crate::MetaData;
use crate::NodeRecord;
use crate::PeerId;
use crate::Status;
use crate::VIEW_FORMAT_FAILED;

/// Everything known about one peer at the time it was assembled.
///
/// Facets the peer never reported are `None`.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "")]
pub struct PeerView<R: NodeRecord> {
    pub peer_id: PeerId,
    #[serde(serialize_with = "as_hex_opt")]
    pub pubkey: Option<Bytes>,
    #[serde(serialize_with = "as_hex_opt")]
    pub node_id: Option<Bytes>,
    pub addrs: Vec<String>,
    pub protocols: Vec<String>,
    #[serde(serialize_with = "as_nanos")]
    pub latency: Duration,
    pub user_agent: Option<String>,
    pub protocol_version: Option<String>,
    pub fork_info: Option<ForkInfo>,
    #[serde(serialize_with = "as_hex_opt")]
    pub attnets: Option<Bytes>,
    pub metadata: Option<MetaData>,
    pub claimed_seq: Option<u64>,
    pub status: Option<Status>,
    #[serde(serialize_with = "as_display_opt")]
    pub enr: Option<R>,
}

impl<R: NodeRecord> fmt::Display for PeerView<R> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match serde_json::to_string_pretty(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => f.write_str(VIEW_FORMAT_FAILED),
        }
    }
}
