//! Random key pair generation for uploaded files.

use common::KeyPair;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Default length of the retrieval (public) key.
pub const DEFAULT_PUBLIC_KEY_LENGTH: usize = 16;
/// Default length of the deletion (private) key.
pub const DEFAULT_PRIVATE_KEY_LENGTH: usize = 32;

/// Generates unguessable public/private key strings of fixed lengths.
///
/// Keys are drawn independently from the 62-symbol alphanumeric charset,
/// so a 16-char public key already has ~95 bits of entropy. Uniqueness
/// against already-issued keys is the caller's responsibility.
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    public_length: usize,
    private_length: usize,
}

impl KeyGenerator {
    pub fn new(public_length: usize, private_length: usize) -> Self {
        Self {
            public_length,
            private_length,
        }
    }

    /// Generate a fresh key pair. No side effects beyond randomness
    /// consumption.
    pub fn generate_pair(&self) -> KeyPair {
        KeyPair {
            public_key: random_key(self.public_length),
            private_key: random_key(self.private_length),
        }
    }

    pub fn public_length(&self) -> usize {
        self.public_length
    }

    pub fn private_length(&self) -> usize {
        self.private_length
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_PUBLIC_KEY_LENGTH, DEFAULT_PRIVATE_KEY_LENGTH)
    }
}

fn random_key(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_lengths() {
        let pair = KeyGenerator::default().generate_pair();
        assert_eq!(pair.public_key.len(), DEFAULT_PUBLIC_KEY_LENGTH);
        assert_eq!(pair.private_key.len(), DEFAULT_PRIVATE_KEY_LENGTH);

        let pair = KeyGenerator::new(8, 20).generate_pair();
        assert_eq!(pair.public_key.len(), 8);
        assert_eq!(pair.private_key.len(), 20);
    }

    #[test]
    fn test_keys_are_alphanumeric() {
        let pair = KeyGenerator::default().generate_pair();
        assert!(pair.public_key.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(pair.private_key.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_pairs_are_unique_across_many_generations() {
        let generator = KeyGenerator::default();
        let mut public_keys = HashSet::new();
        let mut private_keys = HashSet::new();

        for _ in 0..10_000 {
            let pair = generator.generate_pair();
            assert!(public_keys.insert(pair.public_key));
            assert!(private_keys.insert(pair.private_key));
        }
    }

    #[test]
    fn test_public_and_private_keys_are_independent() {
        let pair = KeyGenerator::default().generate_pair();
        assert_ne!(pair.public_key, pair.private_key);
        assert!(!pair.private_key.starts_with(&pair.public_key));
    }
}
