//! Per-worker seed derivation.
//!
//! Every worker owns an independent RNG stream. With a user seed the streams
//! are domain-separated with HMAC-SHA256 so runs are reproducible; without
//! one they are drawn from the OS-seeded thread RNG.

use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use sha2::Sha256;

/// How worker RNG streams are seeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SeedPlan {
    /// Fresh entropy for every run.
    #[default]
    Entropy,
    /// Reproducible streams derived from a user seed.
    Fixed(u64),
}

impl SeedPlan {
    #[must_use]
    pub fn from_option(seed: Option<u64>) -> Self {
        seed.map_or(Self::Entropy, Self::Fixed)
    }

    /// Seeds for `workers` streams, in worker order.
    #[must_use]
    pub fn worker_seeds(self, workers: usize) -> Vec<u64> {
        match self {
            Self::Fixed(seed) => (0..workers).map(|i| derive_worker_seed(seed, i)).collect(),
            Self::Entropy => {
                let mut entropy = rand::thread_rng();
                (0..workers).map(|_| entropy.next_u64()).collect()
            }
        }
    }
}

/// Derive the seed of worker `index` from `user_seed`.
///
/// # Panics
///
/// Never in practice: HMAC-SHA256 accepts keys of any length.
#[must_use]
pub fn derive_worker_seed(user_seed: u64, index: usize) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(b"worker-");
    mac.update(index.to_string().as_bytes());
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}

/// Fast non-cryptographic stream for a single worker.
#[must_use]
pub fn worker_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}
