//! Input sources: the normalized control vector sampled every logic tick

use std::sync::Arc;

use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::util::rng::SimRng;

/// Normalized controls, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub up: f64,
    pub left: f64,
    pub right: f64,
    pub down: f64,
    pub shoot: f64,
}

impl Controls {
    pub const IDLE: Self = Self {
        up: 0.0,
        left: 0.0,
        right: 0.0,
        down: 0.0,
        shoot: 0.0,
    };
}

/// Anything that can be polled for the current controls
pub trait InputSource {
    fn controls(&mut self) -> Controls;
}

/// Holds whatever controls were last set. Clones share the latch.
#[derive(Debug, Clone, Default)]
pub struct LatchedInput {
    current: Arc<Mutex<Controls>>,
}

impl LatchedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, controls: Controls) {
        *self.current.lock() = controls;
    }
}

impl InputSource for LatchedInput {
    fn controls(&mut self) -> Controls {
        *self.current.lock()
    }
}

/// Bot driver: holds a random control choice for a random number of ticks
#[derive(Debug, Clone)]
pub struct WanderInput {
    rng: SimRng,
    current: Controls,
    ticks_left: u32,
}

impl WanderInput {
    /// Shortest and longest time a choice is held, in logic ticks
    const HOLD_TICKS: std::ops::Range<u32> = 30..240;

    pub fn new(rng: SimRng) -> Self {
        Self {
            rng,
            current: Controls::IDLE,
            ticks_left: 0,
        }
    }

    fn pick(&mut self) -> Controls {
        let steer = self.rng.gen_range(-1.0..1.0_f64);
        Controls {
            up: if self.rng.gen_bool(0.8) { self.rng.gen_range(0.5..=1.0) } else { 0.0 },
            down: if self.rng.gen_bool(0.1) { 1.0 } else { 0.0 },
            left: (-steer).max(0.0),
            right: steer.max(0.0),
            shoot: if self.rng.gen_bool(0.3) { 1.0 } else { 0.0 },
        }
    }
}

impl InputSource for WanderInput {
    fn controls(&mut self) -> Controls {
        if self.ticks_left == 0 {
            self.current = self.pick();
            self.ticks_left = self.rng.gen_range(Self::HOLD_TICKS);
        }
        self.ticks_left -= 1;
        self.current
    }
}
