//! Pub/sub relay connecting peers: hub, WebSocket adapter and bot peers

pub mod bot;
pub mod hub;
pub mod ws;

pub use bot::spawn_bot;
pub use hub::RelayHub;
