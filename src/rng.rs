//! Random piece ids for spawn requests
//!
//! The engine never draws randomness itself. It emits `Command::RequestPiece`
//! and the main loop answers it from here with a later `Event::PieceReady`.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform source of catalog ids in 1..=7
#[derive(Debug, Clone)]
pub struct PieceSource {
    rng: ChaCha8Rng,
}

impl Default for PieceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceSource {
    /// Seed from OS entropy
    pub fn new() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Reproducible sequence for a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Use the configured seed when there is one
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }

    pub fn next_id(&mut self) -> u8 {
        self.rng.gen_range(1..=7)
    }
}
