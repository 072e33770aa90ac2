//! Vehicle Arena - peer-replicated vehicle combat simulation
//!
//! Every peer simulates every vehicle. Only the local vehicle is driven by
//! live input; remote vehicles are re-simulated from the control flags in
//! their last snapshot, and snapshots are only published when something
//! observable changes.

pub mod app;
pub mod config;
pub mod game;
pub mod http;
pub mod input;
pub mod net;
pub mod relay;
pub mod util;
