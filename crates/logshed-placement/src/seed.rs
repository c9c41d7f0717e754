//! Deterministic seed derivation.
//!
//! Selections for different logs must not share a draw even when the caller
//! fixes a single seed, so the rng is seeded with a fixed-key SipHash of
//! `(seed, log_id)`. The fixed key keeps the derivation identical across
//! processes and hosts.

use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::SeedableRng;
use siphasher::sip::SipHasher13;

use logshed_core::LogId;

use crate::options::SelectorOptions;

const SEED_HASH_KEY: (u64, u64) = (0x6c6f_6773_6865_6401, 0x706c_6163_656d_6e74);

/// Mix a caller seed and a log id into a single rng seed.
#[inline]
#[must_use]
pub fn derive_seed(seed: u64, log_id: LogId) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(SEED_HASH_KEY.0, SEED_HASH_KEY.1);
    seed.hash(&mut hasher);
    log_id.0.hash(&mut hasher);
    hasher.finish()
}

/// The rng for one selection: seeded from the options when a seed is given,
/// from process entropy otherwise.
pub(crate) fn rng_for(options: &SelectorOptions, log_id: LogId) -> StdRng {
    match options.rng_seed {
        Some(seed) => StdRng::seed_from_u64(derive_seed(seed, log_id)),
        None => StdRng::from_entropy(),
    }
}
