//! Array utilities for post-processing question lists.
//!
//! Each function has an `_with` variant taking an explicit RNG so callers
//! (and tests) can seed it; the plain versions use `thread_rng`.

use std::collections::HashSet;
use std::hash::Hash;

use rand::seq::SliceRandom;
use rand::Rng;

/// Uniform in-place permutation (Fisher-Yates via `SliceRandom`).
pub fn shuffle<T>(items: &mut [T]) {
    shuffle_with(items, &mut rand::thread_rng());
}

pub fn shuffle_with<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Returns `count` items drawn without replacement, by shuffling a copy and
/// keeping the first `count`. Asking for more than there are returns all of
/// them in shuffled order.
pub fn select_random<T: Clone>(items: &[T], count: usize) -> Vec<T> {
    select_random_with(items, count, &mut rand::thread_rng())
}

pub fn select_random_with<T: Clone, R: Rng + ?Sized>(
    items: &[T],
    count: usize,
    rng: &mut R,
) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffle_with(&mut shuffled, rng);
    shuffled.truncate(count);
    shuffled
}

/// Collapses exact duplicates. The first occurrence of each value is kept,
/// in its original position relative to the other survivors.
pub fn remove_duplicates<T: Eq + Hash + Clone>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
