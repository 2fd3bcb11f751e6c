//! Random selection primitives driven by an injected random source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Pick one element uniformly at random. `None` for an empty slice.
pub fn pick_random<'a, T, R>(items: &'a [T], rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    if items.is_empty() {
        return None;
    }
    Some(&items[rng.gen_range(0..items.len())])
}

/// In-place Fisher–Yates shuffle.
pub fn shuffle<T, R>(items: &mut [T], rng: &mut R)
where
    R: Rng + ?Sized,
{
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Seeded generator when `seed` is set, entropy-seeded otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
