//! Uniform random selection for question sets and daily picks.
//!
//! All randomness goes through `QuizRng` so a seed reproduces a session exactly.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random source used for question selection.
pub type QuizRng = ChaCha8Rng;

/// Deterministic generator for tests and replayable sessions.
#[must_use]
pub fn seeded_rng(seed: u64) -> QuizRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Generator seeded from the thread-local entropy source.
#[must_use]
pub fn entropy_rng() -> QuizRng {
    ChaCha8Rng::from_rng(&mut rand::rng())
}

/// A shuffled copy of `items` (Fisher-Yates); the input is left untouched.
#[must_use]
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

/// Up to `limit` distinct items drawn uniformly without replacement.
#[must_use]
pub fn sample<T: Clone, R: Rng + ?Sized>(items: &[T], limit: usize, rng: &mut R) -> Vec<T> {
    let mut out = shuffled(items, rng);
    out.truncate(limit);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn same_seed_same_order() {
        let items: Vec<u32> = (0..30).collect();
        let a = shuffled(&items, &mut seeded_rng(7));
        let b = shuffled(&items, &mut seeded_rng(7));
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let items: Vec<u32> = (0..30).collect();
        let mut out = shuffled(&items, &mut seeded_rng(1));
        out.sort_unstable();
        assert_eq!(out, items);
    }

    #[test]
    fn sample_has_no_duplicates_and_respects_limit() {
        let items: Vec<u32> = (0..40).collect();
        let picked = sample(&items, 12, &mut seeded_rng(3));
        assert_eq!(picked.len(), 12);
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 12);
    }

    #[test]
    fn sample_of_small_pool_takes_everything() {
        let items = vec!["a", "b", "c"];
        let picked = sample(&items, 12, &mut entropy_rng());
        assert_eq!(picked.len(), 3);
    }
}
