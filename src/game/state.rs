//! Simulation state: the vehicle table and projectile list owned by the loop

use std::collections::BTreeMap;

use rand::Rng;
use tracing::debug;

use crate::net::protocol::PeerId;

use super::combat::{CombatSystem, Projectile, Recovery, WeaponStats};
use super::physics::{Arena, PhysicsSystem, VehicleStats};
use super::vehicle::Vehicle;

/// Tuning shared by every vehicle in the arena
#[derive(Debug, Clone, Copy, Default)]
pub struct Tuning {
    pub vehicle: VehicleStats,
    pub weapon: WeaponStats,
    pub arena: Arena,
}

/// Result of one fixed physics step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// The local vehicle cleared a hit or shot flag
    pub recovery: Recovery,
    /// Projectiles spawned this step
    pub spawned: usize,
}

/// One scoreboard line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub points: u32,
}

/// Every vehicle and projectile this peer simulates.
///
/// Remote vehicles are kept ordered by id so that every step visits them, and
/// draws from the random source, in the same order.
#[derive(Debug, Clone)]
pub struct SimulationState {
    local: Vehicle,
    remotes: BTreeMap<PeerId, Vehicle>,
    projectiles: Vec<Projectile>,
    tuning: Tuning,
}

impl SimulationState {
    pub fn new(local: Vehicle) -> Self {
        Self::with_tuning(local, Tuning::default())
    }

    pub fn with_tuning(local: Vehicle, tuning: Tuning) -> Self {
        Self {
            local,
            remotes: BTreeMap::new(),
            projectiles: Vec::new(),
            tuning,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn local(&self) -> &Vehicle {
        &self.local
    }

    pub fn local_mut(&mut self) -> &mut Vehicle {
        &mut self.local
    }

    pub fn remote(&self, id: &PeerId) -> Option<&Vehicle> {
        self.remotes.get(id)
    }

    pub fn remotes(&self) -> impl Iterator<Item = (&PeerId, &Vehicle)> {
        self.remotes.iter()
    }

    pub fn remote_count(&self) -> usize {
        self.remotes.len()
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Look up a remote vehicle, registering a fresh one if unknown.
    /// The flag is true when the vehicle was just created.
    pub fn remote_entry(&mut self, id: &PeerId) -> (&mut Vehicle, bool) {
        let created = !self.remotes.contains_key(id);
        let vehicle = self.remotes.entry(id.clone()).or_default();
        (vehicle, created)
    }

    pub fn remove_remote(&mut self, id: &PeerId) -> Option<Vehicle> {
        self.remotes.remove(id)
    }

    /// Drop every remote vehicle, returning how many there were
    pub fn clear_remotes(&mut self) -> usize {
        let count = self.remotes.len();
        self.remotes.clear();
        count
    }

    /// Run one fixed step: local recovery, then motion and firing for every
    /// vehicle, then projectile motion and expiry.
    pub fn step<R: Rng>(&mut self, now_ms: f64, rng: &mut R) -> StepOutcome {
        let Tuning {
            vehicle: vehicle_stats,
            weapon: weapon_stats,
            arena,
        } = self.tuning;
        let recovery = CombatSystem::recover_local(&mut self.local, rng, &arena, &vehicle_stats);
        if recovery.any() {
            debug!(?recovery, "Local vehicle recovered");
        }

        PhysicsSystem::advance(&mut self.local, &vehicle_stats);
        let burst = CombatSystem::try_fire(&mut self.local, true, now_ms, rng, &weapon_stats);
        let mut spawned = burst.len();
        self.projectiles.extend(burst);

        for (id, vehicle) in self.remotes.iter_mut() {
            PhysicsSystem::advance(vehicle, &vehicle_stats);
            let burst = CombatSystem::try_fire(vehicle, false, now_ms, rng, &weapon_stats);
            if !burst.is_empty() {
                debug!(peer_id = %id, projectiles = burst.len(), "Remote vehicle fired");
            }
            spawned += burst.len();
            self.projectiles.extend(burst);
        }

        CombatSystem::update_projectiles(&mut self.projectiles, now_ms, &weapon_stats);

        StepOutcome { recovery, spawned }
    }

    /// Wrap the local vehicle around the arena edges
    pub fn wrap_local(&mut self) -> bool {
        PhysicsSystem::wrap_position(&mut self.local, &self.tuning.arena)
    }

    /// Test the local vehicle against every remote vehicle
    pub fn check_local_collisions(&mut self) -> bool {
        CombatSystem::check_vehicle_collision(
            &mut self.local,
            self.remotes.values(),
            &self.tuning.vehicle,
        )
    }

    /// Mark remote vehicles hit by a projectile as shot down, crediting the
    /// local vehicle for its own projectiles. Returns the ids shot down.
    pub fn check_projectile_hits(&mut self) -> Vec<PeerId> {
        let mut shot_down = Vec::new();

        for (id, vehicle) in self.remotes.iter_mut() {
            if vehicle.is_shot {
                continue;
            }
            let hit = CombatSystem::first_projectile_hit(
                vehicle,
                &self.projectiles,
                &self.tuning.vehicle,
                &self.tuning.weapon,
            );
            if let Some(projectile) = hit {
                vehicle.is_shot = true;
                if projectile.local {
                    self.local.points += 1;
                }
                debug!(peer_id = %id, by_local = projectile.local, "Vehicle shot down");
                shot_down.push(id.clone());
            }
        }

        shot_down
    }

    /// Every vehicle's score, highest first
    pub fn scoreboard(&self) -> Vec<ScoreEntry> {
        let mut entries: Vec<ScoreEntry> = std::iter::once(&self.local)
            .chain(self.remotes.values())
            .map(|v| ScoreEntry {
                name: v.display_name().to_string(),
                points: v.points,
            })
            .collect();
        entries.sort_by(|a, b| b.points.cmp(&a.points));
        entries
    }
}
