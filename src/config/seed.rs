//! # Seed Handling Module
//!
//! This module turns a user-facing seed string into the numbers terrain
//! generation actually consumes: a stable 64-bit hash, and the 2D noise
//! domain offset derived from its low 32 bits.

use std::hash::Hasher;

/// Length of a randomly drawn seed string.
const SEED_LENGTH: usize = 16;

/// Characters a randomly drawn seed string is composed of.
const SEED_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Scale applied to each 16-bit offset field, keeping the noise domain
/// perturbation small in magnitude.
const OFFSET_SCALE: f32 = 0.001;

/// Generates a random alphanumeric seed string.
///
/// Used when no seed is configured; the drawn string is kept for the process
/// lifetime so the world stays self-consistent.
///
/// # Returns
/// A randomly generated string of `SEED_LENGTH` characters.
pub fn random_seed_string() -> String {
    (0..SEED_LENGTH)
        .map(|_| SEED_CHARSET[fastrand::usize(..SEED_CHARSET.len())] as char)
        .collect()
}

/// Computes a deterministic 64-bit hash of a seed string.
///
/// The hash is computed over the raw UTF-8 bytes with a hasher constructed
/// from fixed keys, so the same string always maps to the same value within a
/// process and across runs of the same build. An empty string hashes to 0.
///
/// # Arguments
/// * `seed` - The seed string to hash
///
/// # Returns
/// A 64-bit hash of the seed string.
pub fn seed_hash(seed: &str) -> u64 {
    if seed.is_empty() {
        return 0;
    }

    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    hasher.write(seed.as_bytes());
    hasher.finish()
}

/// Derives the 2D noise domain offset from a seed hash.
///
/// The low 32 bits of the hash are split into two 16-bit fields, each scaled
/// down by `OFFSET_SCALE`, perturbing the noise domain per seed without
/// pushing the sample coordinates to large magnitudes.
///
/// # Arguments
/// * `seed_hash` - The 64-bit seed hash
///
/// # Returns
/// The `(offset_x, offset_z)` pair added to every noise sample position.
pub fn noise_offsets(seed_hash: u64) -> (f32, f32) {
    let lower32 = seed_hash as u32;
    let offset_x = (lower32 & 0xFFFF) as f32 * OFFSET_SCALE;
    let offset_z = ((lower32 >> 16) & 0xFFFF) as f32 * OFFSET_SCALE;
    (offset_x, offset_z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_hash_is_stable() {
        assert_eq!(seed_hash("test"), seed_hash("test"));
        assert_ne!(seed_hash("test"), seed_hash("test2"));
    }

    #[test]
    fn test_empty_seed_hashes_to_zero() {
        assert_eq!(seed_hash(""), 0);
    }

    #[test]
    fn test_random_seed_string_shape() {
        let drawn = random_seed_string();
        assert_eq!(drawn.len(), SEED_LENGTH);
        assert!(drawn.bytes().all(|byte| SEED_CHARSET.contains(&byte)));
    }

    #[test]
    fn test_noise_offsets_stay_small() {
        // 16-bit fields scaled by 0.001 can never exceed 65.535.
        let (offset_x, offset_z) = noise_offsets(u64::MAX);
        assert!(offset_x <= 65.535 && offset_x >= 0.0);
        assert!(offset_z <= 65.535 && offset_z >= 0.0);

        assert_eq!(noise_offsets(0), (0.0, 0.0));
    }

    #[test]
    fn test_noise_offsets_use_only_low_bits() {
        let low = 0x1234_5678_u64;
        assert_eq!(noise_offsets(low), noise_offsets(low | 0xFFFF_0000_0000_0000));
    }
}
