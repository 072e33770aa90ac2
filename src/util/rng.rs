//! Seedable random source shared by burst spawning, spread and respawn placement

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Random source used by the simulation
pub type SimRng = ChaCha8Rng;

/// Reproducible stream for replays and tests
pub fn seeded(seed: u64) -> SimRng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub fn from_entropy() -> SimRng {
    ChaCha8Rng::from_entropy()
}
