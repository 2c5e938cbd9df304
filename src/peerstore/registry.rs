use std::time::Duration;

use bytes::Bytes;
#[cfg(test)]
use mockall::automock;

use crate::PeerId;
use crate::Result;

/// Address book, protocol list and latency tracking of the host network
/// stack. Only read by the aggregate peer view.
#[cfg_attr(test, automock)]
pub trait PeerRegistry: Send + Sync + 'static {
    /// Known addresses, in their text form.
    fn addrs(
        &self,
        id: &PeerId,
    ) -> Vec<String>;

    fn protocols(
        &self,
        id: &PeerId,
    ) -> Result<Vec<String>>;

    /// Moving average of observed round trips, zero when never measured.
    fn latency(
        &self,
        id: &PeerId,
    ) -> Duration;

    /// Raw public key bytes, when the identity embeds a supported key.
    fn public_key(
        &self,
        id: &PeerId,
    ) -> Option<Bytes>;

    /// Discovery node ID derived from the public key, when the key supports it.
    fn node_id(
        &self,
        id: &PeerId,
    ) -> Option<Bytes>;

    fn user_agent(
        &self,
        id: &PeerId,
    ) -> Result<Option<String>>;

    fn protocol_version(
        &self,
        id: &PeerId,
    ) -> Result<Option<String>>;
}
