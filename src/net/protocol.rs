//! Relay protocol message definitions
//! These are the wire types exchanged between a peer and the pub/sub relay

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::snapshot::VehicleParams;

/// Relay-assigned identity of a connected peer
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(String);

impl PeerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Messages delivered to a peer by the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Inbound {
    /// This peer's connection is up
    Connect,
    /// Another peer connected
    Join,
    /// Another peer published its vehicle snapshot
    Params { id: PeerId, params: VehicleParams },
    /// Another peer disconnected
    Leave(PeerId),
}

/// Messages a peer publishes through the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Outbound {
    /// Snapshot of the publishing peer's local vehicle
    Params(VehicleParams),
}

impl Inbound {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl Outbound {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
