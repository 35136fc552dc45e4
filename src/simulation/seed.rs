//! Seed sources for the initial grid pattern
//!
//! [`GridState::new`](super::GridState::new) accepts any boolean-per-cell
//! generator; these are the ones the app and tests use.

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Uniform random pattern with the given alive probability.
///
/// Deterministic for a given seed, so runs can be reproduced.
pub fn random(seed: u64, density: f32) -> impl FnMut(u32, u32) -> bool {
    let mut rng = StdRng::seed_from_u64(seed);
    move |_x, _y| rng.random_bool(density as f64)
}

/// Pattern from a row-major cell array (non-zero = alive)
pub fn from_pattern(cells: &[u8], width: u32) -> impl FnMut(u32, u32) -> bool + '_ {
    move |x, y| cells[(y * width + x) as usize] != 0
}
