//! Random helpers over any injected `Rng`, so tests can drive tie-breaks directly.

use rand_chacha::rand_core::Rng;

/// Uniform index into a collection of `len` elements. `len` must be non-zero.
pub fn pick_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> usize {
    debug_assert!(len > 0);
    (rng.next_u64() % len as u64) as usize
}

/// Unweighted coin flip.
pub fn coin_flip<R: Rng + ?Sized>(rng: &mut R) -> bool {
    rng.next_u64() & 1 == 0
}
