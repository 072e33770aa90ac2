//! Vehicle snapshots for network replication

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use super::vehicle::{ControlFlag, Vehicle};

/// The replicable field set of a vehicle.
///
/// Every field is optional: an inbound snapshot only overwrites what it carries,
/// and a field that is missing or of the wrong type is left out of the merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VehicleParams {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub x_velocity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub y_velocity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub power: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub reverse: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub angular_velocity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub is_throttling: Option<ControlFlag>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub is_reversing: Option<ControlFlag>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_switch")]
    pub is_shooting: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub is_turning_left: Option<ControlFlag>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub is_turning_right: Option<ControlFlag>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub is_hit: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub is_shot: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub points: Option<u32>,
}

/// Decode a field, treating a type mismatch as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Like `lenient`, but also accepts a magnitude for a boolean switch
fn lenient_switch<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let flag: Option<ControlFlag> = lenient(deserializer)?;
    Ok(flag.map(ControlFlag::is_on))
}

impl VehicleParams {
    /// Full snapshot of a vehicle
    pub fn from_vehicle(vehicle: &Vehicle) -> Self {
        Self {
            x: Some(vehicle.x),
            y: Some(vehicle.y),
            x_velocity: Some(vehicle.x_velocity),
            y_velocity: Some(vehicle.y_velocity),
            power: Some(vehicle.power),
            reverse: Some(vehicle.reverse),
            angle: Some(vehicle.angle),
            angular_velocity: Some(vehicle.angular_velocity),
            is_throttling: Some(vehicle.is_throttling),
            is_reversing: Some(vehicle.is_reversing),
            is_shooting: Some(vehicle.is_shooting),
            is_turning_left: Some(vehicle.is_turning_left),
            is_turning_right: Some(vehicle.is_turning_right),
            is_hit: Some(vehicle.is_hit),
            is_shot: Some(vehicle.is_shot),
            name: vehicle.name.clone(),
            points: Some(vehicle.points),
        }
    }

    /// Overwrite the fields this snapshot carries, leaving the rest untouched
    pub fn merge_into(&self, vehicle: &mut Vehicle) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }

        set(&mut vehicle.x, &self.x);
        set(&mut vehicle.y, &self.y);
        set(&mut vehicle.x_velocity, &self.x_velocity);
        set(&mut vehicle.y_velocity, &self.y_velocity);
        set(&mut vehicle.power, &self.power);
        set(&mut vehicle.reverse, &self.reverse);
        set(&mut vehicle.angle, &self.angle);
        set(&mut vehicle.angular_velocity, &self.angular_velocity);
        set(&mut vehicle.is_throttling, &self.is_throttling);
        set(&mut vehicle.is_reversing, &self.is_reversing);
        set(&mut vehicle.is_shooting, &self.is_shooting);
        set(&mut vehicle.is_turning_left, &self.is_turning_left);
        set(&mut vehicle.is_turning_right, &self.is_turning_right);
        set(&mut vehicle.is_hit, &self.is_hit);
        set(&mut vehicle.is_shot, &self.is_shot);
        if self.name.is_some() {
            vehicle.name = self.name.clone();
        }
        set(&mut vehicle.points, &self.points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driven_vehicle() -> Vehicle {
        Vehicle {
            x: 812.25,
            y: -3.5,
            x_velocity: 0.731,
            y_velocity: -1.1,
            power: 0.042,
            reverse: 0.0015,
            angle: 7.3,
            angular_velocity: -0.0031,
            is_throttling: ControlFlag::new(0.7),
            is_reversing: ControlFlag::OFF,
            is_turning_left: ControlFlag::FULL,
            is_turning_right: ControlFlag::OFF,
            is_shooting: true,
            is_hit: true,
            is_shot: false,
            last_shoot_at: Some(1234.0),
            name: Some("kit".into()),
            points: 9,
        }
    }

    #[test]
    fn merge_into_fresh_vehicle_reproduces_replicated_fields() {
        let source = driven_vehicle();
        let mut fresh = Vehicle::default();
        VehicleParams::from_vehicle(&source).merge_into(&mut fresh);

        assert_eq!(
            fresh,
            Vehicle {
                last_shoot_at: None,
                ..source
            }
        );
    }

    #[test]
    fn json_round_trip_is_exact() {
        let source = driven_vehicle();
        let text = serde_json::to_string(&VehicleParams::from_vehicle(&source)).unwrap();
        let decoded: VehicleParams = serde_json::from_str(&text).unwrap();

        let mut fresh = Vehicle::default();
        decoded.merge_into(&mut fresh);
        assert_eq!(fresh.x.to_bits(), source.x.to_bits());
        assert_eq!(fresh.angular_velocity.to_bits(), source.angular_velocity.to_bits());
        assert_eq!(fresh.is_throttling, source.is_throttling);
        assert_eq!(fresh.points, 9);
    }

    #[test]
    fn partial_snapshot_leaves_other_fields() {
        let mut vehicle = driven_vehicle();
        let params: VehicleParams =
            serde_json::from_str(r#"{"isTurningLeft":false,"points":10}"#).unwrap();
        params.merge_into(&mut vehicle);

        assert_eq!(vehicle.is_turning_left, ControlFlag::OFF);
        assert_eq!(vehicle.points, 10);
        assert_eq!(vehicle.x, 812.25);
        assert_eq!(vehicle.name.as_deref(), Some("kit"));
    }

    #[test]
    fn malformed_fields_are_skipped() {
        let params: VehicleParams = serde_json::from_str(
            r#"{"x":"far","y":4.0,"points":-2,"name":null,"isShooting":1,"el":{}}"#,
        )
        .unwrap();

        assert_eq!(params.x, None);
        assert_eq!(params.y, Some(4.0));
        assert_eq!(params.points, None);
        assert_eq!(params.name, None);
        assert_eq!(params.is_shooting, Some(true));
    }

    #[test]
    fn unnamed_vehicle_omits_name() {
        let text = serde_json::to_string(&VehicleParams::from_vehicle(&Vehicle::default())).unwrap();
        assert!(!text.contains("name"));
        assert!(text.contains(r#""isThrottling":false"#));
    }
}
