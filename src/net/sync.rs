//! Network sync: publishes the local snapshot and merges remote ones

use tracing::{debug, info, warn};

use crate::game::snapshot::VehicleParams;
use crate::game::state::SimulationState;
use crate::game::vehicle::Vehicle;

use super::protocol::{Outbound, PeerId};
use super::transport::Transport;

/// Sync errors. None of them are fatal to the session.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("leave for unknown vehicle {0}")]
    UnknownVehicle(PeerId),
}

/// Replicates the local vehicle and applies remote snapshots to the vehicle table
#[derive(Debug)]
pub struct NetworkSync<T> {
    transport: T,
    disconnected: bool,
    published: u64,
}

impl<T: Transport> NetworkSync<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            disconnected: false,
            published: 0,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }

    /// Snapshots published so far
    pub fn published(&self) -> u64 {
        self.published
    }

    /// Publish a full snapshot of the local vehicle.
    /// Send failures are logged and dropped; returns whether it went out.
    pub fn publish(&mut self, local: &Vehicle) -> bool {
        if self.disconnected {
            return false;
        }

        let msg = Outbound::Params(VehicleParams::from_vehicle(local));
        match self.transport.send(msg) {
            Ok(()) => {
                self.published += 1;
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to publish local snapshot");
                false
            }
        }
    }

    /// Merge a remote snapshot, creating the vehicle on first sight.
    /// Returns true if the vehicle was created.
    pub fn merge(
        &mut self,
        state: &mut SimulationState,
        id: &PeerId,
        params: &VehicleParams,
    ) -> bool {
        if self.disconnected {
            debug!(peer_id = %id, "Ignoring snapshot after disconnect");
            return false;
        }

        let (vehicle, created) = state.remote_entry(id);
        params.merge_into(vehicle);

        if created {
            info!(peer_id = %id, name = vehicle.display_name(), "Remote vehicle joined");
        }
        created
    }

    /// Remove a vehicle whose peer left
    pub fn handle_leave(
        &mut self,
        state: &mut SimulationState,
        id: &PeerId,
    ) -> Result<Vehicle, SyncError> {
        let vehicle = state
            .remove_remote(id)
            .ok_or_else(|| SyncError::UnknownVehicle(id.clone()))?;
        info!(peer_id = %id, "Remote vehicle left");
        Ok(vehicle)
    }

    /// Tear down every remote vehicle and stop publishing for good
    pub fn disconnect(&mut self, state: &mut SimulationState) -> usize {
        self.disconnected = true;
        let removed = state.clear_remotes();
        info!(removed, "Disconnected from relay");
        removed
    }
}
