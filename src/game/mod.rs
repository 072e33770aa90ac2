//! Game simulation modules

pub mod combat;
pub mod physics;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod vehicle;

pub use combat::{CombatSystem, Projectile, WeaponStats};
pub use physics::{Arena, PhysicsSystem, VehicleStats};
pub use session::{Session, SessionConfig};
pub use snapshot::VehicleParams;
pub use state::{ScoreEntry, SimulationState, Tuning};
pub use vehicle::{ControlFlag, Vehicle};
