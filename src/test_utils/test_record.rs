use std::fmt;

use bytes::Bytes;

use crate::DecodeError;
use crate::ForkInfo;
use crate::NodeRecord;

/// Discovery record with the text form `enr:<seq>:<network>`.
///
/// Records on the `eth2` network advertise fork data and attestation subnets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRecord {
    pub seq: u64,
    pub network: String,
}

impl TestRecord {
    pub fn new(seq: u64) -> Self {
        TestRecord {
            seq,
            network: "eth2".to_string(),
        }
    }

    pub fn on(
        seq: u64,
        network: &str,
    ) -> Self {
        TestRecord {
            seq,
            network: network.to_string(),
        }
    }
}

impl fmt::Display for TestRecord {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "enr:{}:{}", self.seq, self.network)
    }
}

impl NodeRecord for TestRecord {
    fn parse(text: &str) -> Result<Self, DecodeError> {
        let mut parts = text.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("enr"), Some(seq), Some(network)) => Ok(TestRecord {
                seq: seq
                    .parse()
                    .map_err(|e| DecodeError::Parse(format!("bad seq: {}", e)))?,
                network: network.to_string(),
            }),
            _ => Err(DecodeError::Parse(format!("not a test record: {}", text))),
        }
    }

    fn seq(&self) -> u64 {
        self.seq
    }

    fn fork_info(&self) -> Option<ForkInfo> {
        (self.network == "eth2").then_some(ForkInfo {
            fork_digest: [0xb5, 0x30, 0x3f, 0x2a],
            next_fork_version: [0x04, 0x00, 0x00, 0x00],
            next_fork_epoch: u64::MAX,
        })
    }

    fn attnets(&self) -> Option<Bytes> {
        (self.network == "eth2").then(|| Bytes::from_static(&[0xff, 0, 0, 0, 0, 0, 0, 0x01]))
    }
}
