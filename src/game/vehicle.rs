//! Vehicle state shared by the local and remote simulation paths

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A control input that is either off or a magnitude in (0, 1].
///
/// On the wire an inactive control is `false` and an active one is its magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlFlag(f64);

impl ControlFlag {
    pub const OFF: Self = Self(0.0);
    pub const FULL: Self = Self(1.0);

    /// Anything non-positive or non-finite is treated as off
    pub fn new(magnitude: f64) -> Self {
        if magnitude.is_finite() && magnitude > 0.0 {
            Self(magnitude.min(1.0))
        } else {
            Self::OFF
        }
    }

    /// Quantizes a raw axis reading to one decimal place
    pub fn from_axis(value: f64) -> Self {
        Self::new((value * 10.0).round() / 10.0)
    }

    pub fn magnitude(self) -> f64 {
        self.0
    }

    pub fn is_on(self) -> bool {
        self.0 > 0.0
    }
}

impl From<bool> for ControlFlag {
    fn from(on: bool) -> Self {
        if on {
            Self::FULL
        } else {
            Self::OFF
        }
    }
}

impl Serialize for ControlFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_on() {
            serializer.serialize_f64(self.0)
        } else {
            serializer.serialize_bool(false)
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Switch(bool),
    Magnitude(f64),
}

impl<'de> Deserialize<'de> for ControlFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawFlag::deserialize(deserializer)? {
            RawFlag::Switch(on) => on.into(),
            RawFlag::Magnitude(m) => Self::new(m),
        })
    }
}

/// A simulated vehicle.
///
/// Exactly one vehicle per process is local; the rest are re-simulated from the
/// control flags of their last snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vehicle {
    pub x: f64,
    pub y: f64,
    pub x_velocity: f64,
    pub y_velocity: f64,
    pub power: f64,
    pub reverse: f64,
    /// Heading in radians, left unbounded
    pub angle: f64,
    pub angular_velocity: f64,

    pub is_throttling: ControlFlag,
    pub is_reversing: ControlFlag,
    pub is_turning_left: ControlFlag,
    pub is_turning_right: ControlFlag,
    pub is_shooting: bool,

    // Only ever cleared by the peer driving this vehicle
    pub is_hit: bool,
    pub is_shot: bool,

    /// Not replicated; each peer tracks the cooldown on its own clock
    pub last_shoot_at: Option<f64>,
    pub name: Option<String>,
    pub points: u32,
}

impl Vehicle {
    /// Parked at `(x, y)` facing up
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    /// Blank names show as "anonymous" too
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or("anonymous")
    }
}
