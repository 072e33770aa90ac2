//! Peer networking: wire protocol, transport seam and snapshot sync

pub mod protocol;
pub mod sync;
pub mod transport;

pub use protocol::{Inbound, Outbound, PeerId};
pub use sync::{NetworkSync, SyncError};
pub use transport::{ChannelTransport, MemoryTransport, Transport, TransportError};
