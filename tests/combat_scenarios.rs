use rand::Rng;
use vehicle_arena::game::physics::Circle;
use vehicle_arena::game::{
    CombatSystem, PhysicsSystem, Projectile, SimulationState, Vehicle, WeaponStats,
};
use vehicle_arena::net::PeerId;
use vehicle_arena::util::rng::seeded;

const WEAPON: WeaponStats = WeaponStats::STANDARD;

fn projectile_at(shoot_at: f64) -> Projectile {
    Projectile {
        x: 0.0,
        y: 0.0,
        angle: 0.0,
        x_velocity: 0.1,
        y_velocity: 0.1,
        local: true,
        shoot_at,
    }
}

#[test]
fn circle_test_is_symmetric() {
    let mut rng = seeded(17);
    for _ in 0..10_000 {
        let a = Circle {
            x: rng.gen_range(0.0..40.0),
            y: rng.gen_range(0.0..40.0),
            r: rng.gen_range(0.0..10.0),
        };
        let b = Circle {
            x: rng.gen_range(0.0..40.0),
            y: rng.gen_range(0.0..40.0),
            r: rng.gen_range(0.0..10.0),
        };
        assert_eq!(PhysicsSystem::circles_hit(a, b), PhysicsSystem::circles_hit(b, a));
    }
}

#[test]
fn projectile_lives_exactly_300ms_past_activation() {
    let t = 5_000.0;
    let mut projectiles = vec![projectile_at(t)];

    CombatSystem::update_projectiles(&mut projectiles, t + 299.0, &WEAPON);
    assert_eq!(projectiles.len(), 1);

    CombatSystem::update_projectiles(&mut projectiles, t + 300.0, &WEAPON);
    assert_eq!(projectiles.len(), 1);

    CombatSystem::update_projectiles(&mut projectiles, t + 301.0, &WEAPON);
    assert!(projectiles.is_empty());
}

#[test]
fn projectile_moves_before_activation() {
    let mut projectiles = vec![projectile_at(10_000.0)];
    CombatSystem::update_projectiles(&mut projectiles, 0.0, &WEAPON);
    assert_eq!((projectiles[0].x, projectiles[0].y), (0.1, -0.1));
}

#[test]
fn cooldown_allows_one_burst_per_second() {
    let mut rng = seeded(4);
    let mut v = Vehicle {
        is_shooting: true,
        ..Vehicle::at(0.0, 0.0)
    };
    let t0 = 20_000.0;

    let first = CombatSystem::try_fire(&mut v, true, t0, &mut rng, &WEAPON);
    let early = CombatSystem::try_fire(&mut v, true, t0 + 999.0, &mut rng, &WEAPON);
    assert!(!first.is_empty());
    assert!(early.is_empty());
    assert_eq!(v.last_shoot_at, Some(t0));

    let second = CombatSystem::try_fire(&mut v, true, t0 + 1_001.0, &mut rng, &WEAPON);
    assert!(!second.is_empty());
    assert_eq!(v.last_shoot_at, Some(t0 + 1_001.0));
}

#[test]
fn shot_down_vehicle_is_immune_to_overlapping_projectiles() {
    let target = PeerId::new("target");
    let mut state = SimulationState::new(Vehicle {
        is_shooting: true,
        ..Vehicle::at(300.0, 300.0)
    });
    *state.remote_entry(&target).0 = Vehicle::at(300.0, 300.0);

    // the local vehicle fires a whole burst straight into the remote one
    let outcome = state.step(0.0, &mut seeded(8));
    assert!(outcome.spawned >= 10);

    assert_eq!(state.check_projectile_hits(), vec![target.clone()]);
    assert_eq!(state.local().points, 1);
    assert!(state.remote(&target).unwrap().is_shot);

    assert!(state.check_projectile_hits().is_empty());
    assert_eq!(state.local().points, 1);
}

#[test]
fn remote_projectiles_shoot_down_without_scoring() {
    let (shooter, target) = (PeerId::new("a"), PeerId::new("b"));
    let mut state = SimulationState::new(Vehicle::at(1_000.0, 1_000.0));
    *state.remote_entry(&shooter).0 = Vehicle {
        is_shooting: true,
        ..Vehicle::at(200.0, 200.0)
    };
    *state.remote_entry(&target).0 = Vehicle::at(203.0, 200.0);

    state.step(0.0, &mut seeded(9));
    let shot_down = state.check_projectile_hits();

    assert!(shot_down.contains(&target));
    assert_eq!(state.local().points, 0);
    assert!(state.projectiles().iter().all(|p| !p.local));
}

#[test]
fn remote_shooter_is_downed_by_its_own_burst() {
    let shooter = PeerId::new("a");
    let mut state = SimulationState::new(Vehicle::at(1_000.0, 1_000.0));
    *state.remote_entry(&shooter).0 = Vehicle {
        is_shooting: true,
        ..Vehicle::at(200.0, 200.0)
    };

    state.step(0.0, &mut seeded(9));
    assert_eq!(state.check_projectile_hits(), vec![shooter.clone()]);
    assert!(state.remote(&shooter).unwrap().is_shot);

    // stays down, and so cannot fire again, until its owner says otherwise
    let outcome = state.step(1_500.0, &mut seeded(9));
    assert_eq!(outcome.spawned, 0);
    assert!(state.remote(&shooter).unwrap().is_shot);
    assert!(state.projectiles().is_empty());
}

#[test]
fn local_vehicle_is_never_marked_shot_by_projectiles() {
    let mut state = SimulationState::new(Vehicle::at(500.0, 500.0));
    *state.remote_entry(&PeerId::new("r")).0 = Vehicle {
        is_shooting: true,
        ..Vehicle::at(500.0, 500.0)
    };

    state.step(0.0, &mut seeded(10));
    state.check_projectile_hits();
    assert!(!state.local().is_shot);
}

#[test]
fn bump_sets_hit_and_next_step_bounces() {
    let mut state = SimulationState::new(Vehicle {
        x_velocity: 0.5,
        y_velocity: -1.0,
        ..Vehicle::at(100.0, 100.0)
    });
    *state.remote_entry(&PeerId::new("r")).0 = Vehicle::at(110.0, 100.0);

    assert!(state.check_local_collisions());
    assert!(state.local().is_hit);

    let outcome = state.step(0.0, &mut seeded(1));
    assert!(outcome.recovery.bounced);
    assert!(!state.local().is_hit);
    // bounced to (-1.0, 1.42) before this step's drag
    assert!((state.local().x_velocity - (-1.0 * 0.95)).abs() < 1e-12);
    assert!((state.local().y_velocity - 1.42 * 0.95).abs() < 1e-12);
}

#[test]
fn wrecks_do_not_bump() {
    let mut state = SimulationState::new(Vehicle::at(100.0, 100.0));
    *state.remote_entry(&PeerId::new("r")).0 = Vehicle {
        is_shot: true,
        ..Vehicle::at(100.0, 100.0)
    };
    assert!(!state.check_local_collisions());
    assert!(!state.local().is_hit);
}
