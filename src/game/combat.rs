//! Combat system - projectile bursts, hit detection, hit/shot recovery

use rand::Rng;

use super::physics::{Arena, Circle, PhysicsSystem, VehicleStats};
use super::vehicle::Vehicle;

/// Weapon constants shared by every vehicle
#[derive(Debug, Clone, Copy)]
pub struct WeaponStats {
    /// Minimum time between bursts (ms)
    pub cooldown_ms: f64,
    /// Smallest burst
    pub burst_min: u32,
    /// Burst size varies over `burst_min..burst_min + burst_range`
    pub burst_range: u32,
    /// Total width of the angular spread cone (radians)
    pub spread: f64,
    /// Upper bound of a projectile's muzzle speed
    pub muzzle_speed: f64,
    /// Activation times are staggered over this window (ms)
    pub stagger_ms: f64,
    /// Time a projectile stays alive after activation (ms)
    pub lifetime_ms: f64,
    pub projectile_radius: f64,
}

impl WeaponStats {
    pub const STANDARD: Self = Self {
        cooldown_ms: 1000.0,
        burst_min: 10,
        burst_range: 20,
        spread: 1.0,
        muzzle_speed: 1.25,
        stagger_ms: 500.0,
        lifetime_ms: 300.0,
        projectile_radius: 2.0,
    };
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// A ballistic projectile from a burst
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub x: f64,
    pub y: f64,
    /// Heading of the firing vehicle at spawn
    pub angle: f64,
    pub x_velocity: f64,
    pub y_velocity: f64,
    /// Fired by this process's local vehicle
    pub local: bool,
    /// Scheduled activation time; expiry is measured from here
    pub shoot_at: f64,
}

impl Projectile {
    /// Linear motion, no drag
    pub fn update(&mut self) {
        self.x += self.x_velocity;
        self.y -= self.y_velocity;
    }

    pub fn is_expired(&self, now_ms: f64, stats: &WeaponStats) -> bool {
        now_ms > self.shoot_at + stats.lifetime_ms
    }

    pub fn hitbox(&self, stats: &WeaponStats) -> Circle {
        Circle {
            x: self.x,
            y: self.y,
            r: stats.projectile_radius,
        }
    }
}

/// What the local vehicle recovered from at the start of a step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Recovery {
    pub bounced: bool,
    pub respawned: bool,
}

impl Recovery {
    pub fn any(&self) -> bool {
        self.bounced || self.respawned
    }
}

/// Combat system for firing, hit tests and recovery
pub struct CombatSystem;

impl CombatSystem {
    /// Shooting, not disabled by a hit, and off cooldown
    pub fn can_fire(vehicle: &Vehicle, now_ms: f64, stats: &WeaponStats) -> bool {
        if !vehicle.is_shooting || vehicle.is_shot || vehicle.is_hit {
            return false;
        }
        match vehicle.last_shoot_at {
            None => true,
            Some(last) => last < now_ms - stats.cooldown_ms,
        }
    }

    /// Fire a burst if allowed. Records the shot time on the vehicle.
    pub fn try_fire<R: Rng>(
        vehicle: &mut Vehicle,
        local: bool,
        now_ms: f64,
        rng: &mut R,
        stats: &WeaponStats,
    ) -> Vec<Projectile> {
        if !Self::can_fire(vehicle, now_ms, stats) {
            return Vec::new();
        }
        vehicle.last_shoot_at = Some(now_ms);
        Self::spawn_burst(vehicle, local, now_ms, rng, stats)
    }

    /// Spawn a burst from the vehicle's current position, heading and velocity
    pub fn spawn_burst<R: Rng>(
        vehicle: &Vehicle,
        local: bool,
        now_ms: f64,
        rng: &mut R,
        stats: &WeaponStats,
    ) -> Vec<Projectile> {
        let count = stats.burst_min + rng.gen_range(0..stats.burst_range.max(1));
        let half_spread = stats.spread / 2.0;

        (0..count)
            .map(|_| {
                let x_heading = vehicle.angle + rng.gen_range(-half_spread..=half_spread);
                let x_speed = rng.gen_range(0.0..=stats.muzzle_speed);
                let y_heading = vehicle.angle + rng.gen_range(-half_spread..=half_spread);
                let y_speed = rng.gen_range(0.0..=stats.muzzle_speed);

                Projectile {
                    x: vehicle.x,
                    y: vehicle.y,
                    angle: vehicle.angle,
                    x_velocity: vehicle.x_velocity + x_heading.sin() * x_speed,
                    y_velocity: vehicle.y_velocity + y_heading.cos() * y_speed,
                    local,
                    shoot_at: now_ms + rng.gen_range(0.0..=stats.stagger_ms),
                }
            })
            .collect()
    }

    /// Integrate every projectile and drop the expired ones
    pub fn update_projectiles(
        projectiles: &mut Vec<Projectile>,
        now_ms: f64,
        stats: &WeaponStats,
    ) {
        for projectile in projectiles.iter_mut() {
            projectile.update();
        }
        projectiles.retain(|p| !p.is_expired(now_ms, stats));
    }

    /// Vehicle-vehicle test for the local vehicle only.
    /// Vehicles that are already shot down are passed through.
    pub fn check_vehicle_collision<'a>(
        local: &mut Vehicle,
        others: impl IntoIterator<Item = &'a Vehicle>,
        stats: &VehicleStats,
    ) -> bool {
        let own = PhysicsSystem::hitbox(local, stats);
        let mut hit = false;
        for other in others {
            if other.is_shot {
                continue;
            }
            if PhysicsSystem::circles_hit(PhysicsSystem::hitbox(other, stats), own) {
                local.is_hit = true;
                hit = true;
            }
        }
        hit
    }

    /// First live projectile overlapping the vehicle, if any
    pub fn first_projectile_hit<'a>(
        vehicle: &Vehicle,
        projectiles: &'a [Projectile],
        vehicle_stats: &VehicleStats,
        weapon_stats: &WeaponStats,
    ) -> Option<&'a Projectile> {
        let target = PhysicsSystem::hitbox(vehicle, vehicle_stats);
        projectiles
            .iter()
            .find(|p| PhysicsSystem::circles_hit(target, p.hitbox(weapon_stats)))
    }

    /// Clear the local vehicle's hit/shot flags and apply their effects
    pub fn recover_local<R: Rng>(
        vehicle: &mut Vehicle,
        rng: &mut R,
        arena: &Arena,
        stats: &VehicleStats,
    ) -> Recovery {
        let mut recovery = Recovery::default();

        if vehicle.is_hit {
            vehicle.is_hit = false;
            let cap = stats.max_velocity;
            vehicle.x_velocity = (vehicle.x_velocity * -2.0).clamp(-cap, cap);
            vehicle.y_velocity = (vehicle.y_velocity * -2.0).clamp(-cap, cap);
            recovery.bounced = true;
        }

        if vehicle.is_shot {
            vehicle.is_shot = false;
            vehicle.x = rng.gen_range(0.0..arena.width);
            vehicle.y = rng.gen_range(0.0..arena.height);
            vehicle.x_velocity = 0.0;
            vehicle.y_velocity = 0.0;
            recovery.respawned = true;
        }

        recovery
    }
}
