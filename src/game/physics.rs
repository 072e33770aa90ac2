//! Vehicle physics, the circle hit test and the toroidal arena wrap

use super::vehicle::Vehicle;

/// Vehicle handling constants, in units per fixed tick
#[derive(Debug, Clone, Copy)]
pub struct VehicleStats {
    pub max_power: f64,
    pub max_reverse: f64,
    /// Power gained per tick at full throttle
    pub power_factor: f64,
    pub reverse_factor: f64,
    pub drag: f64,
    pub angular_drag: f64,
    pub turn_speed: f64,
    /// Per-axis cap applied when bouncing off another vehicle
    pub max_velocity: f64,
    pub hitbox_radius: f64,
    /// Minimum power before steering input is accepted
    pub turn_threshold: f64,
}

impl VehicleStats {
    pub const STANDARD: Self = Self {
        max_power: 0.075,
        max_reverse: 0.0375,
        power_factor: 0.001,
        reverse_factor: 0.0005,
        drag: 0.95,
        angular_drag: 0.95,
        turn_speed: 0.002,
        max_velocity: 1.42,
        hitbox_radius: 7.5,
        turn_threshold: 0.0025,
    };
}

impl Default for VehicleStats {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Fixed-size toroidal play area
#[derive(Debug, Clone, Copy)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
    /// How far past an edge a vehicle may drift before it wraps
    pub margin: f64,
}

impl Arena {
    pub const STANDARD: Self = Self {
        width: 1500.0,
        height: 1500.0,
        margin: 7.5,
    };

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

/// Physics system for advancing vehicles one fixed tick at a time
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Advance a vehicle by exactly one tick from its own control flags.
    ///
    /// Reads nothing but the vehicle itself, so every peer derives the same
    /// motion for a remote vehicle from the same snapshot.
    pub fn advance(vehicle: &mut Vehicle, stats: &VehicleStats) {
        if vehicle.is_throttling.is_on() {
            vehicle.power += stats.power_factor * vehicle.is_throttling.magnitude();
        } else {
            vehicle.power -= stats.power_factor;
        }
        if vehicle.is_reversing.is_on() {
            vehicle.reverse += stats.reverse_factor;
        } else {
            vehicle.reverse -= stats.reverse_factor;
        }

        vehicle.power = vehicle.power.clamp(0.0, stats.max_power);
        vehicle.reverse = vehicle.reverse.clamp(0.0, stats.max_reverse);

        // Steering flips while reversing; a tie counts as reversing
        let direction = if vehicle.power > vehicle.reverse { 1.0 } else { -1.0 };

        if vehicle.is_turning_left.is_on() {
            vehicle.angular_velocity -=
                direction * stats.turn_speed * vehicle.is_turning_left.magnitude();
        }
        if vehicle.is_turning_right.is_on() {
            vehicle.angular_velocity +=
                direction * stats.turn_speed * vehicle.is_turning_right.magnitude();
        }

        let thrust = vehicle.power - vehicle.reverse;
        vehicle.x_velocity += vehicle.angle.sin() * thrust;
        vehicle.y_velocity += vehicle.angle.cos() * thrust;

        // Screen coordinates: positive y velocity moves up
        vehicle.x += vehicle.x_velocity;
        vehicle.y -= vehicle.y_velocity;
        vehicle.x_velocity *= stats.drag;
        vehicle.y_velocity *= stats.drag;
        vehicle.angle += vehicle.angular_velocity;
        vehicle.angular_velocity *= stats.angular_drag;
    }

    /// Steering is ignored below a minimum amount of throttle
    pub fn can_turn(vehicle: &Vehicle, stats: &VehicleStats) -> bool {
        vehicle.power > stats.turn_threshold || vehicle.reverse > 0.0
    }

    /// Strict overlap test between two circles
    pub fn circles_hit(a: Circle, b: Circle) -> bool {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        (dx * dx + dy * dy).sqrt() < a.r + b.r
    }

    pub fn hitbox(vehicle: &Vehicle, stats: &VehicleStats) -> Circle {
        Circle {
            x: vehicle.x,
            y: vehicle.y,
            r: stats.hitbox_radius,
        }
    }

    /// Wrap a vehicle that left the arena to the opposite edge.
    /// Returns true if it moved.
    pub fn wrap_position(vehicle: &mut Vehicle, arena: &Arena) -> bool {
        let mut wrapped = false;
        let span_x = arena.width + 2.0 * arena.margin;
        let span_y = arena.height + 2.0 * arena.margin;

        if vehicle.x > arena.width + arena.margin {
            vehicle.x -= span_x;
            wrapped = true;
        } else if vehicle.x < -arena.margin {
            vehicle.x += span_x;
            wrapped = true;
        }

        if vehicle.y > arena.height + arena.margin {
            vehicle.y -= span_y;
            wrapped = true;
        } else if vehicle.y < -arena.margin {
            vehicle.y += span_y;
            wrapped = true;
        }

        wrapped
    }
}
