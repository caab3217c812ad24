use crate::key::Key;
use fastrand::Rng;

/// Two distinct positions in `0..n`, uniformly over unordered pairs.
/// `n` must be at least 2.
#[inline(always)]
pub fn pick_swap(rng: &mut Rng, n: usize) -> (usize, usize) {
    let a = rng.usize(0..n);
    let mut b = rng.usize(0..n - 1);
    if b >= a {
        b += 1;
    }
    (a, b)
}

/// Symmetric proposal: a copy of `key` with one random swap applied.
pub fn propose(key: &Key, rng: &mut Rng) -> Key {
    let (a, b) = pick_swap(rng, key.len());
    key.swapped(a, b)
}
