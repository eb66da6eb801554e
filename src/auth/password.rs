//! Password hashing.
//!
//! bcrypt embeds the salt in the hash string and runs at a configurable
//! work factor, so comparison cost is bounded and brute force stays
//! expensive.

use crate::error::{UserHubError, UserHubResult};

/// Hash a plaintext password with the given bcrypt cost.
pub fn hash_password(plain: &str, cost: u32) -> UserHubResult<String> {
    bcrypt::hash(plain, cost)
        .map_err(|e| UserHubError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a plaintext password against a stored bcrypt hash.
///
/// A malformed stored hash counts as a mismatch rather than an error;
/// the caller only ever learns pass/fail.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Cost 4 keeps the tests fast
    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("pw123", TEST_COST).unwrap();
        assert_ne!(hash, "pw123");
        assert!(verify_password("pw123", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("pw123", TEST_COST).unwrap();
        let b = hash_password("pw123", TEST_COST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_mismatch() {
        assert!(!verify_password("pw123", "not-a-bcrypt-hash"));
    }
}
