//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::game::session::SessionConfig;
use crate::util::rate_limit::RELAY_MSG_RATE;
use crate::util::time::{period_for, LOGIC_TPS, MAX_TIMER_HZ, PHYSICS_TPS};

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Relay binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit JSON log lines instead of the human-readable format
    pub log_json: bool,

    /// Rate of the input/change-detection tick
    pub logic_hz: u32,
    /// Rate of the physics accumulator timer
    pub physics_timer_hz: u32,

    /// In-process bot peers to attach to the relay
    pub bot_count: usize,
    /// Base seed for bot random sources; entropy when unset
    pub sim_seed: Option<u64>,

    /// Max inbound messages per second per relay connection
    pub relay_msg_rate: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // PORT wins over SERVER_ADDR when a platform assigns one
        let server_addr = match lookup("PORT") {
            Some(port) => format!("0.0.0.0:{}", port),
            None => lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
        };

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,

            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_json: lookup("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),

            logic_hz: parse_rate(&lookup, "LOGIC_HZ", LOGIC_TPS)?,
            physics_timer_hz: parse_rate(&lookup, "PHYSICS_TIMER_HZ", PHYSICS_TPS)?,

            bot_count: parse_or(&lookup, "BOT_COUNT", 0)?,
            sim_seed: lookup("SIM_SEED")
                .map(|v| v.parse().map_err(|_| ConfigError::Invalid("SIM_SEED")))
                .transpose()?,

            relay_msg_rate: parse_or(&lookup, "RELAY_MSG_RATE", RELAY_MSG_RATE)?,
        })
    }

    /// Session settings for peers hosted by this process
    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            logic_period: period_for(self.logic_hz),
            physics_period: period_for(self.physics_timer_hz),
            ..SessionConfig::default()
        }
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

/// A timer rate in Hz. Must leave a non-zero period at microsecond resolution.
fn parse_rate(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u32,
) -> Result<u32, ConfigError> {
    let hz = parse_or(lookup, key, default)?;
    if (1..=MAX_TIMER_HZ).contains(&hz) {
        Ok(hz)
    } else {
        Err(ConfigError::Invalid(key))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid server address format")]
    InvalidAddress,
}
