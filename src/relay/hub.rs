//! Relay hub - fans messages out between connected peers
//!
//! The hub never looks inside a snapshot. It only assigns ids and routes
//! `connect`/`join`/`params`/`leave` between connections.

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::net::protocol::{Inbound, Outbound, PeerId};

/// Registry of connected peers and their inbound channels
#[derive(Default)]
pub struct RelayHub {
    peers: DashMap<PeerId, mpsc::UnboundedSender<Inbound>>,
}

impl RelayHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection. It receives `connect`; everyone else gets `join`.
    pub fn connect(&self) -> (PeerId, mpsc::UnboundedReceiver<Inbound>) {
        let id = PeerId::generate();
        let (tx, rx) = mpsc::unbounded_channel();

        let _ = tx.send(Inbound::Connect);
        self.broadcast_except(&id, Inbound::Join);
        self.peers.insert(id.clone(), tx);

        info!(peer_id = %id, peers = self.peers.len(), "Peer connected");
        (id, rx)
    }

    /// Forward a peer's publish to every other peer
    pub fn publish(&self, from: &PeerId, msg: Outbound) {
        match msg {
            Outbound::Params(params) => {
                self.broadcast_except(
                    from,
                    Inbound::Params {
                        id: from.clone(),
                        params,
                    },
                );
            }
        }
    }

    /// Unregister a connection and tell everyone else it left
    pub fn disconnect(&self, id: &PeerId) {
        if self.peers.remove(id).is_some() {
            self.broadcast_except(id, Inbound::Leave(id.clone()));
            info!(peer_id = %id, peers = self.peers.len(), "Peer disconnected");
        }
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    fn broadcast_except(&self, from: &PeerId, msg: Inbound) {
        for entry in self.peers.iter() {
            if entry.key() == from {
                continue;
            }
            if entry.value().send(msg.clone()).is_err() {
                debug!(peer_id = %entry.key(), "Dropping message for closed peer");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::snapshot::VehicleParams;

    #[test]
    fn connect_announces_to_others_only() {
        let hub = RelayHub::new();
        let (_, mut first) = hub.connect();
        assert_eq!(first.try_recv().unwrap(), Inbound::Connect);

        let (_, mut second) = hub.connect();
        assert_eq!(second.try_recv().unwrap(), Inbound::Connect);
        assert!(second.try_recv().is_err());
        assert_eq!(first.try_recv().unwrap(), Inbound::Join);
        assert_eq!(hub.peer_count(), 2);
    }

    #[test]
    fn params_are_tagged_with_sender_and_not_echoed() {
        let hub = RelayHub::new();
        let (a, mut a_rx) = hub.connect();
        let (_, mut b_rx) = hub.connect();
        let _ = a_rx.try_recv();
        let _ = a_rx.try_recv();
        let _ = b_rx.try_recv();

        let params = VehicleParams {
            x: Some(3.0),
            ..Default::default()
        };
        hub.publish(&a, Outbound::Params(params.clone()));

        assert_eq!(
            b_rx.try_recv().unwrap(),
            Inbound::Params {
                id: a.clone(),
                params
            }
        );
        assert!(a_rx.try_recv().is_err());
    }

    #[test]
    fn disconnect_broadcasts_leave_once() {
        let hub = RelayHub::new();
        let (a, _a_rx) = hub.connect();
        let (_, mut b_rx) = hub.connect();
        let _ = b_rx.try_recv();

        hub.disconnect(&a);
        hub.disconnect(&a);

        assert_eq!(b_rx.try_recv().unwrap(), Inbound::Leave(a));
        assert!(b_rx.try_recv().is_err());
        assert_eq!(hub.peer_count(), 1);
    }
}
