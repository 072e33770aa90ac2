//! In-process bot peers attached straight to the relay hub

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::game::session::{Session, SessionConfig};
use crate::input::WanderInput;
use crate::net::protocol::Outbound;
use crate::net::transport::ChannelTransport;
use crate::util::rng::{from_entropy, seeded, SimRng};
use crate::util::time::MonotonicClock;

use super::hub::RelayHub;

fn rng_for(seed: Option<u64>, salt: u64) -> SimRng {
    match seed {
        Some(seed) => seeded(seed.wrapping_add(salt)),
        None => from_entropy(),
    }
}

/// Spawn a wandering bot session connected to the hub
pub fn spawn_bot(
    hub: Arc<RelayHub>,
    index: usize,
    seed: Option<u64>,
    mut config: SessionConfig,
) -> JoinHandle<()> {
    let (id, inbound_rx) = hub.connect();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Outbound>();

    let forward_hub = hub.clone();
    let forward_id = id.clone();
    tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            forward_hub.publish(&forward_id, msg);
        }
        forward_hub.disconnect(&forward_id);
    });

    let name = format!("bot-{}", index + 1);
    config.name = Some(name.clone());
    // Separate streams so input choices don't shift the simulation's draws
    let salt = index as u64 * 2;
    let session = Session::new(
        &config,
        ChannelTransport::new(out_tx),
        WanderInput::new(rng_for(seed, salt)),
        MonotonicClock::new(),
        rng_for(seed, salt + 1),
    );

    info!(peer_id = %id, name = %name, "Spawning bot");
    tokio::spawn(async move {
        session.run(inbound_rx).await;
    })
}
