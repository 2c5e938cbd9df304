mod key;
mod peer_id;
mod records;

pub use key::*;
pub use peer_id::*;
pub use records::*;
