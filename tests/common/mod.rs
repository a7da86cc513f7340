//! Common test utilities

#![allow(dead_code)]

use corscan::models::ScanConfig;
use corscan::random::RandomSource;

/// Creates a test ScanConfig with a fixed User-Agent and short timeout
pub fn test_config() -> ScanConfig {
    ScanConfig {
        threads: 2,
        timeout_secs: 5,
        user_agent: Some("Corscan-Test/0.1.0".to_string()),
        ..ScanConfig::default()
    }
}

/// Always returns the same index, so every random label is identical
pub struct FixedRandom(pub usize);

impl RandomSource for FixedRandom {
    fn next_index(&self, bound: usize) -> usize {
        self.0 % bound
    }
}

/// Label produced by `FixedRandom(0)`
pub const FIXED_LABEL: &str = "aaaaaaaaaaaa";
