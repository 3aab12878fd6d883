//! Password hashing with bcrypt.
//!
//! Hashes are salted per call, so hashing the same password twice yields
//! different strings. `bcrypt::verify` compares digests in constant time.

use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_password_with_cost(password, DEFAULT_COST)
}

/// Hashes with an explicit bcrypt cost (4..=31).
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password_with_cost("correctpassword", TEST_COST).unwrap();
        assert_ne!(hash, "correctpassword");
        assert!(verify_password("correctpassword", &hash).unwrap());
        assert!(!verify_password("wrongpassword", &hash).unwrap());
    }

    #[test]
    fn test_hash_generates_unique_hashes() {
        let hash1 = hash_password_with_cost("samepassword", TEST_COST).unwrap();
        let hash2 = hash_password_with_cost("samepassword", TEST_COST).unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_invalid_hash() {
        assert!(verify_password("password", "not_a_valid_bcrypt_hash").is_err());
    }

    #[test]
    fn test_verify_case_sensitive() {
        let hash = hash_password_with_cost("Password123", TEST_COST).unwrap();
        assert!(!verify_password("password123", &hash).unwrap());
    }

    #[test]
    fn test_invalid_cost_is_an_error() {
        assert!(hash_password_with_cost("password", 2).is_err());
    }
}
