//! Outbound transport seam between a peer session and the relay

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::protocol::Outbound;

/// Transport errors
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("transport channel closed")]
    Closed,
}

/// Fire-and-forget publisher for outbound messages
pub trait Transport {
    fn send(&mut self, msg: Outbound) -> Result<(), TransportError>;
}

/// Publishes into an in-process channel (bots attached to the relay)
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl ChannelTransport {
    pub fn new(tx: mpsc::UnboundedSender<Outbound>) -> Self {
        Self { tx }
    }
}

impl Transport for ChannelTransport {
    fn send(&mut self, msg: Outbound) -> Result<(), TransportError> {
        self.tx.send(msg).map_err(|_| TransportError::Closed)
    }
}

/// Keeps every published message in memory. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    sent: Arc<Mutex<Vec<Outbound>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Outbound> {
        self.sent.lock().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    /// Remove and return everything published so far
    pub fn take(&self) -> Vec<Outbound> {
        std::mem::take(&mut *self.sent.lock())
    }
}

impl Transport for MemoryTransport {
    fn send(&mut self, msg: Outbound) -> Result<(), TransportError> {
        self.sent.lock().push(msg);
        Ok(())
    }
}
