//! @ai:module:intent Generate short prefixes namespacing DOM ids of one code/annotation pairing
//! @ai:module:layer infrastructure
//! @ai:module:public_api PrefixGenerator, resolve_prefix, DEFAULT_PREFIX_LENGTH
//! @ai:module:thread_safe true

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use sha2::{Digest, Sha256};

pub const DEFAULT_PREFIX_LENGTH: usize = 10;

/// Hex digits of a SHA-256 digest.
const MAX_PREFIX_LENGTH: usize = 64;

/// @ai:intent Prefix source over an injectable entropy source
///
/// Every generator owns its random source, so generators used from different
/// threads never share state.
#[derive(Debug, Clone)]
pub struct PrefixGenerator<R = StdRng> {
    rng: R,
}

impl PrefixGenerator<StdRng> {
    /// @ai:intent Create a generator seeded from operating system entropy
    /// @ai:effects random
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl Default for PrefixGenerator<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: RngCore> PrefixGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// @ai:intent Produce a fresh lowercase hex prefix
    /// @ai:post result.len() == min(length, 64)
    /// @ai:effects random
    pub fn generate(&mut self, length: usize) -> String {
        let mut seed = [0u8; 32];
        self.rng.fill_bytes(&mut seed);

        let mut prefix = hex::encode(Sha256::digest(seed));
        prefix.truncate(length.min(MAX_PREFIX_LENGTH));
        prefix
    }
}

/// @ai:intent Use the explicit prefix when given, otherwise generate one
/// @ai:post an explicit prefix is returned unchanged, even when empty
/// @ai:effects random
pub fn resolve_prefix(explicit: Option<&str>, length: usize) -> String {
    match explicit {
        Some(prefix) => prefix.to_string(),
        None => PrefixGenerator::from_entropy().generate(length),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_length_and_alphabet() {
        let prefix = PrefixGenerator::from_entropy().generate(DEFAULT_PREFIX_LENGTH);
        assert_eq!(prefix.len(), 10);
        assert!(prefix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_length_is_capped() {
        assert_eq!(PrefixGenerator::from_entropy().generate(500).len(), 64);
        assert_eq!(PrefixGenerator::from_entropy().generate(0), "");
    }

    #[test]
    fn test_no_collisions_in_a_few_hundred() {
        let mut generator = PrefixGenerator::default();
        let prefixes: HashSet<String> = (0..300).map(|_| generator.generate(10)).collect();
        assert_eq!(prefixes.len(), 300);
    }

    #[test]
    fn test_seeded_source_is_deterministic() {
        let mut a = PrefixGenerator::new(StdRng::seed_from_u64(7));
        let mut b = PrefixGenerator::new(StdRng::seed_from_u64(7));
        assert_eq!(a.generate(10), b.generate(10));
        assert_ne!(a.generate(10), PrefixGenerator::new(StdRng::seed_from_u64(8)).generate(10));
    }

    #[test]
    fn test_explicit_prefix_passes_through() {
        assert_eq!(resolve_prefix(Some("fixed"), 10), "fixed");
        assert_eq!(resolve_prefix(Some(""), 10), "");
        assert_eq!(resolve_prefix(None, 6).len(), 6);
    }
}
