//! Shared utilities

pub mod rate_limit;
pub mod rng;
pub mod time;
