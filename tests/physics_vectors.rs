use rand::Rng;
use vehicle_arena::game::{
    ControlFlag, PhysicsSystem, SimulationState, Vehicle, VehicleParams, VehicleStats,
};
use vehicle_arena::net::PeerId;
use vehicle_arena::util::rng::seeded;

const STATS: VehicleStats = VehicleStats::STANDARD;

fn assert_near(actual: f64, expected: f64, epsilon: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= epsilon,
        "actual={actual} expected={expected} diff={diff} epsilon={epsilon}"
    );
}

#[test]
fn golden_vector_full_power_one_tick() {
    let mut v = Vehicle {
        power: 0.075,
        is_throttling: ControlFlag::FULL,
        ..Vehicle::at(750.0, 750.0)
    };

    PhysicsSystem::advance(&mut v, &STATS);

    assert_eq!(v.power, 0.075);
    assert_near(v.y_velocity, 0.075 * 0.95, 1e-12);
    assert_near(v.y, 750.0 - 0.075, 1e-12);
    assert_near(v.x_velocity, 0.0, 1e-12);
    assert_eq!(v.x, 750.0);
}

#[test]
fn golden_vector_reverse_one_tick() {
    let mut v = Vehicle {
        reverse: 0.0375,
        is_reversing: ControlFlag::FULL,
        ..Vehicle::at(750.0, 750.0)
    };

    PhysicsSystem::advance(&mut v, &STATS);

    assert_eq!(v.reverse, 0.0375);
    assert_near(v.y_velocity, -0.0375 * 0.95, 1e-12);
    assert_near(v.y, 750.0 + 0.0375, 1e-12);
}

#[test]
fn throttle_levels_stay_clamped_under_any_inputs() {
    let mut rng = seeded(99);
    let mut v = Vehicle::at(0.0, 0.0);

    for _ in 0..20_000 {
        if rng.gen_bool(0.05) {
            v.is_throttling = ControlFlag::new(rng.gen_range(-0.5..1.5));
            v.is_reversing = ControlFlag::from(rng.gen_bool(0.3));
            v.is_turning_left = ControlFlag::new(rng.gen_range(0.0..1.0));
        }
        PhysicsSystem::advance(&mut v, &STATS);
        assert!((0.0..=STATS.max_power).contains(&v.power), "power {}", v.power);
        assert!((0.0..=STATS.max_reverse).contains(&v.reverse), "reverse {}", v.reverse);
    }
}

#[test]
fn coasting_vehicle_slows_but_never_stops() {
    let mut v = Vehicle {
        power: 0.075,
        x_velocity: 1.0,
        ..Vehicle::at(0.0, 0.0)
    };

    // power bleeds off first, still pushing the vehicle along
    for _ in 0..80 {
        PhysicsSystem::advance(&mut v, &STATS);
        assert!(v.power >= 0.0);
    }
    assert_eq!(v.power, 0.0);

    let mut last_speed = f64::INFINITY;
    for _ in 0..300 {
        PhysicsSystem::advance(&mut v, &STATS);
        let speed = v.x_velocity.hypot(v.y_velocity);
        assert!(speed < last_speed);
        last_speed = speed;
    }
    assert!(last_speed > 0.0);
}

#[test]
fn velocity_settles_near_equilibrium() {
    let mut v = Vehicle {
        is_throttling: ControlFlag::FULL,
        ..Vehicle::at(0.0, 0.0)
    };
    for _ in 0..2_000 {
        PhysicsSystem::advance(&mut v, &STATS);
    }
    // thrust 0.075 against drag 0.95
    assert_near(v.y_velocity, 0.075 * 0.95 / 0.05, 1e-9);
    assert_near(v.y_velocity, STATS.max_velocity, 0.01);
}

fn replay_script(ticks: u32) -> SimulationState {
    let mut state = SimulationState::new(Vehicle::at(750.0, 750.0));
    let mut rng = seeded(2024);
    let remote = PeerId::new("remote");

    let script: [(u32, VehicleParams); 3] = [
        (
            0,
            VehicleParams {
                x: Some(100.0),
                y: Some(900.0),
                is_throttling: Some(ControlFlag::FULL),
                is_shooting: Some(true),
                ..Default::default()
            },
        ),
        (
            5,
            VehicleParams {
                is_turning_right: Some(ControlFlag::new(0.6)),
                ..Default::default()
            },
        ),
        (
            90,
            VehicleParams {
                is_throttling: Some(ControlFlag::OFF),
                is_reversing: Some(ControlFlag::FULL),
                ..Default::default()
            },
        ),
    ];

    for tick in 0..ticks {
        for (at, params) in &script {
            if *at == tick {
                let (vehicle, _) = state.remote_entry(&remote);
                params.merge_into(vehicle);
            }
        }
        let now = f64::from(tick) * 1000.0 / 120.0;
        state.step(now, &mut rng);
        state.check_projectile_hits();
    }
    state
}

fn assert_same_vehicle(a: &Vehicle, b: &Vehicle) {
    assert_eq!(a.x.to_bits(), b.x.to_bits());
    assert_eq!(a.y.to_bits(), b.y.to_bits());
    assert_eq!(a.angle.to_bits(), b.angle.to_bits());
    assert_eq!(a, b);
}

#[test]
fn identical_snapshot_sequences_give_identical_trajectories() {
    let id = PeerId::new("remote");

    // the opening burst is still in flight
    let (a, b) = (replay_script(10), replay_script(10));
    assert!(!a.projectiles().is_empty());
    assert_eq!(a.projectiles(), b.projectiles());
    assert_same_vehicle(a.remote(&id).unwrap(), b.remote(&id).unwrap());

    let (a, b) = (replay_script(400), replay_script(400));
    let (ra, rb) = (a.remote(&id).unwrap(), b.remote(&id).unwrap());
    assert_same_vehicle(ra, rb);
    assert!(ra.is_shot);
    assert_eq!(a.projectiles(), b.projectiles());
}
