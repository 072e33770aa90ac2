//! Time utilities for the simulation: clocks, tick rates and the fixed-step accumulator

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// Physics always advances in steps of exactly 1/120 s
pub const PHYSICS_TPS: u32 = 120;
/// Default rate of the input/change-detection tick
pub const LOGIC_TPS: u32 = 120;
pub const FIXED_STEP_SECS: f64 = 1.0 / PHYSICS_TPS as f64;

/// Fastest timer rate that still has a non-zero period
pub const MAX_TIMER_HZ: u32 = 1_000_000;

/// Period of a timer firing `hz` times per second, clamped to `1..=MAX_TIMER_HZ`
pub fn period_for(hz: u32) -> Duration {
    Duration::from_micros(1_000_000 / u64::from(hz.clamp(1, MAX_TIMER_HZ)))
}

/// Monotonic millisecond time source for the simulation.
///
/// Timestamps like `last_shoot_at` and projectile `shoot_at` are expressed on this
/// clock, so every peer only ever compares them against its own clock.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by tokio's `Instant` (follows paused time in tests)
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<f64>>,
}

impl ManualClock {
    pub fn starting_at(ms: f64) -> Self {
        Self {
            now: Arc::new(Mutex::new(ms)),
        }
    }

    pub fn set(&self, ms: f64) {
        *self.now.lock() = ms;
    }

    pub fn advance(&self, ms: f64) {
        *self.now.lock() += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        *self.now.lock()
    }
}

/// Converts irregular timer firings into a whole number of fixed-size steps.
#[derive(Debug, Clone)]
pub struct FixedStep {
    step_secs: f64,
    acc: f64,
    last_ms: Option<f64>,
}

impl FixedStep {
    pub fn new(step_secs: f64) -> Self {
        Self {
            step_secs,
            acc: 0.0,
            last_ms: None,
        }
    }

    /// Feed the current time and get back how many steps are due.
    /// The first call only records the reference time.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        if let Some(last) = self.last_ms {
            self.acc += (now_ms - last) / 1000.0;
        }
        self.last_ms = Some(now_ms);

        let mut steps = 0;
        while self.acc > self.step_secs {
            self.acc -= self.step_secs;
            steps += 1;
        }
        steps
    }

    /// Unconsumed time in seconds
    pub fn pending(&self) -> f64 {
        self.acc
    }
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(FIXED_STEP_SECS)
    }
}

/// Process start time for uptime tracking
static SERVER_START: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();

/// Initialize server start time (call once at startup)
pub fn init_server_time() {
    SERVER_START.get_or_init(std::time::Instant::now);
}

/// Get server uptime in seconds
pub fn uptime_secs() -> u64 {
    SERVER_START
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}
