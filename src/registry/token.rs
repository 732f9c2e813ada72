//! Access key token generation.
//!
//! Tokens look like `BASIC-Q3ZK8P1M0XTAB`: the tier label, a dash, and a
//! random suffix drawn from uppercase letters and digits.

use rand::Rng;

const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default number of random suffix characters (36^13 ≈ 1.7e20 tokens per tier).
pub const DEFAULT_SUFFIX_LEN: usize = 13;

/// Generator for tier-prefixed access key tokens.
#[derive(Debug, Clone)]
pub struct TokenGenerator {
    suffix_len: usize,
}

impl TokenGenerator {
    /// Create a generator with the default suffix length.
    pub fn new() -> Self {
        Self {
            suffix_len: DEFAULT_SUFFIX_LEN,
        }
    }

    /// Set the number of random suffix characters.
    pub fn with_suffix_len(mut self, len: usize) -> Self {
        self.suffix_len = len;
        self
    }

    /// Generate a token for `tier`.
    pub fn generate(&self, tier: &str) -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..self.suffix_len)
            .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
            .collect();
        format!("{}-{}", tier, suffix)
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}
