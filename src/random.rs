//! Randomness used for origin mutation and User-Agent rotation
//!
//! Every random choice in the scanner goes through [`RandomSource`] so callers
//! can swap in a deterministic sequence.

use rand::Rng;

/// Length of the random labels injected into mutated origins
pub const LABEL_LEN: usize = 12;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Source of uniformly distributed indices
pub trait RandomSource: Send + Sync {
    /// Returns a value in `0..bound`. Callers never pass a zero bound.
    fn next_index(&self, bound: usize) -> usize;
}

/// Thread-local RNG backed source, used for real scans
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_index(&self, bound: usize) -> usize {
        rand::rng().random_range(0..bound)
    }
}

/// Builds a lowercase ASCII label of `len` characters
pub fn random_label(random: &dyn RandomSource, len: usize) -> String {
    (0..len)
        .map(|_| LOWERCASE[random.next_index(LOWERCASE.len()) % LOWERCASE.len()] as char)
        .collect()
}


#[cfg(test)]
mod tests {
    use super::testing::SequenceRandom;
    use super::*;

    #[test]
    fn test_random_label_length_and_charset() {
        let label = random_label(&ThreadRandom, LABEL_LEN);
        assert_eq!(label.len(), LABEL_LEN);
        assert!(label.chars().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn test_random_label_is_deterministic_with_sequence() {
        let random = SequenceRandom::new(vec![16, 23, 9, 1, 10, 16]);
        assert_eq!(random_label(&random, 6), "qxjbkq");
    }

    #[test]
    fn test_thread_random_stays_in_bounds() {
        for _ in 0..1000 {
            assert!(ThreadRandom.next_index(6) < 6);
        }
    }
}
