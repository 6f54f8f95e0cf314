//! 7-bag randomizer for piece generation
//!
//! Tetris uses a "7-bag" system: every kind is dealt exactly once before
//! the bag is refilled. This prevents long droughts and floods.

use crate::tetromino::TetrominoKind;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// The 7-bag piece randomizer
#[derive(Debug, Clone)]
pub struct BagRandomizer {
    /// Kinds not yet dealt from the current bag
    remaining: Vec<TetrominoKind>,
    rng: ChaCha8Rng,
}

impl Default for BagRandomizer {
    fn default() -> Self {
        Self::new()
    }
}

impl BagRandomizer {
    /// Create a bag seeded from the thread RNG
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a bag with a fixed seed, for reproducible sequences
    pub fn with_seed(seed: u64) -> Self {
        Self {
            remaining: TetrominoKind::all().to_vec(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Deal the next kind, refilling the bag first if it is exhausted
    pub fn next(&mut self) -> TetrominoKind {
        if self.remaining.is_empty() {
            self.refill();
        }
        let idx = self.rng.gen_range(0..self.remaining.len());
        self.remaining.remove(idx)
    }

    /// Kinds still in the current bag
    pub fn remaining(&self) -> &[TetrominoKind] {
        &self.remaining
    }

    /// Put all 7 kinds back
    pub fn refill(&mut self) {
        self.remaining.clear();
        self.remaining.extend(TetrominoKind::all());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bag_contains_all_pieces() {
        let mut bag = BagRandomizer::with_seed(7);
        let pieces: HashSet<_> = (0..7).map(|_| bag.next()).collect();
        assert_eq!(pieces.len(), 7);
        assert!(bag.remaining().is_empty());
    }

    #[test]
    fn test_every_cycle_is_a_permutation() {
        let mut bag = BagRandomizer::with_seed(42);
        for _ in 0..50 {
            let cycle: HashSet<_> = (0..7).map(|_| bag.next()).collect();
            assert_eq!(cycle.len(), 7);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = BagRandomizer::with_seed(1234);
        let mut b = BagRandomizer::with_seed(1234);
        for _ in 0..28 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn test_refill_mid_bag() {
        let mut bag = BagRandomizer::with_seed(3);
        bag.next();
        bag.next();
        assert_eq!(bag.remaining().len(), 5);
        bag.refill();
        assert_eq!(bag.remaining().len(), 7);
    }

    #[test]
    fn test_many_pieces() {
        let mut bag = BagRandomizer::new();
        // Should be able to get many pieces without panicking
        for _ in 0..100 {
            let _ = bag.next();
        }
    }
}
