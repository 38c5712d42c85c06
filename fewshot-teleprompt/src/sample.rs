use fewshot_types::example::Example;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Seed used for every labeled-demo draw.
pub const DEMO_SAMPLE_SEED: u64 = 0;

/// Draw `min(k, pool.len())` distinct examples from `pool` with a
/// generator seeded with `seed`. Same inputs, same draw.
pub fn sample_demos(pool: &[Example], k: usize, seed: u64) -> Vec<Example> {
    let mut rng = StdRng::seed_from_u64(seed);
    pool.choose_multiple(&mut rng, k.min(pool.len()))
        .cloned()
        .collect()
}
