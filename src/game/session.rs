//! Peer session: logic tick, fixed-step physics tick and inbound dispatch.
//!
//! A session owns the whole simulation state. Timers and inbound messages are
//! handled one at a time from a single task, so nothing here needs a lock.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::input::{Controls, InputSource};
use crate::net::protocol::Inbound;
use crate::net::sync::NetworkSync;
use crate::net::transport::Transport;
use crate::util::rng::SimRng;
use crate::util::time::{period_for, Clock, FixedStep, LOGIC_TPS, PHYSICS_TPS};

use super::physics::PhysicsSystem;
use super::state::{SimulationState, Tuning};
use super::vehicle::{ControlFlag, Vehicle};

/// Per-session settings
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Period of the input and change-detection tick
    pub logic_period: Duration,
    /// Period of the accumulator timer (the physics step itself is fixed)
    pub physics_period: Duration,
    /// Controls are ignored until the local vehicle has a name
    pub name: Option<String>,
    pub tuning: Tuning,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            logic_period: period_for(LOGIC_TPS),
            physics_period: period_for(PHYSICS_TPS),
            name: None,
            tuning: Tuning::default(),
        }
    }
}

/// One participant's view of the arena
pub struct Session<T, I, C> {
    state: SimulationState,
    sync: NetworkSync<T>,
    input: I,
    clock: C,
    rng: SimRng,
    accumulator: FixedStep,
    logic_period: Duration,
    physics_period: Duration,
}

/// Store `value` in `slot`, reporting whether it differed
fn update<V: PartialEq>(slot: &mut V, value: V) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

impl<T: Transport, I: InputSource, C: Clock> Session<T, I, C> {
    /// The local vehicle starts parked in the middle of the arena
    pub fn new(config: &SessionConfig, transport: T, input: I, clock: C, rng: SimRng) -> Self {
        let (x, y) = config.tuning.arena.center();
        let local = Vehicle {
            name: config.name.clone(),
            ..Vehicle::at(x, y)
        };

        Self {
            state: SimulationState::with_tuning(local, config.tuning),
            sync: NetworkSync::new(transport),
            input,
            clock,
            rng,
            accumulator: FixedStep::default(),
            logic_period: config.logic_period,
            physics_period: config.physics_period,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn sync(&self) -> &NetworkSync<T> {
        &self.sync
    }

    /// Name the local vehicle, enabling its controls, and announce it
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.state.local_mut().name = Some(name.into());
        self.publish();
    }

    /// Publish the local vehicle's snapshot now
    pub fn publish(&mut self) -> bool {
        self.sync.publish(self.state.local())
    }

    /// Sample input, detect observable changes and local hits, and publish
    /// if anything changed. Returns whether a snapshot went out.
    pub fn logic_tick(&mut self) -> bool {
        let stats = self.state.tuning().vehicle;
        let controls = if self.state.local().name.is_some() {
            self.input.controls()
        } else {
            Controls::IDLE
        };

        let can_turn = PhysicsSystem::can_turn(self.state.local(), &stats);
        let steer = |axis: f64| {
            if can_turn {
                ControlFlag::from_axis(axis)
            } else {
                ControlFlag::OFF
            }
        };

        let local = self.state.local_mut();
        let mut changed = false;
        changed |= update(&mut local.is_shooting, ControlFlag::from_axis(controls.shoot).is_on());
        changed |= update(&mut local.is_throttling, ControlFlag::from_axis(controls.up));
        changed |= update(&mut local.is_reversing, ControlFlag::from_axis(controls.down));
        changed |= update(&mut local.is_turning_left, steer(controls.left));
        changed |= update(&mut local.is_turning_right, steer(controls.right));

        changed |= self.state.wrap_local();
        changed |= self.state.check_local_collisions();
        changed |= !self.state.check_projectile_hits().is_empty();

        changed && self.publish()
    }

    /// Run however many fixed physics steps are due. Returns the step count.
    pub fn physics_tick(&mut self) -> u32 {
        let now = self.clock.now_ms();
        let steps = self.accumulator.advance(now);

        for _ in 0..steps {
            let outcome = self.state.step(now, &mut self.rng);
            if outcome.recovery.any() {
                self.publish();
            }
        }

        steps
    }

    /// Apply one message from the relay
    pub fn handle(&mut self, msg: Inbound) {
        match msg {
            Inbound::Connect | Inbound::Join => {
                self.publish();
            }
            Inbound::Params { id, params } => {
                self.sync.merge(&mut self.state, &id, &params);
            }
            Inbound::Leave(id) => {
                if let Err(e) = self.sync.handle_leave(&mut self.state, &id) {
                    warn!(error = %e, "Ignoring leave");
                }
            }
        }
    }

    /// Drop all remote vehicles and stop publishing for the rest of the session
    pub fn disconnect(&mut self) {
        self.sync.disconnect(&mut self.state);
    }

    /// Drive the session from its two timers and the inbound channel until
    /// the relay closes the channel. Returns the session for inspection.
    pub async fn run(mut self, mut inbound: mpsc::UnboundedReceiver<Inbound>) -> Self {
        let mut logic = interval(self.logic_period);
        logic.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // Missed firings are made up by the accumulator, not by the timer
        let mut physics = interval(self.physics_period);
        physics.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(name = self.state.local().display_name(), "Session started");

        loop {
            tokio::select! {
                _ = logic.tick() => {
                    self.logic_tick();
                }
                _ = physics.tick() => {
                    self.physics_tick();
                }
                msg = inbound.recv() => match msg {
                    Some(msg) => self.handle(msg),
                    None => {
                        debug!("Inbound channel closed");
                        self.disconnect();
                        break;
                    }
                },
            }
        }

        info!(
            name = self.state.local().display_name(),
            points = self.state.local().points,
            published = self.sync.published(),
            "Session ended"
        );
        self
    }
}
