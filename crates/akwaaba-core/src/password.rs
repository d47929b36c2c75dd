//! Password hashing with argon2id.

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

use crate::error::{CoreError, Result};

/// Hashes and verifies passwords as PHC strings (`$argon2id$...`).
///
/// Verification reads the cost parameters from the stored hash, so hashes
/// made with different costs stay verifiable.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// argon2id with the crate's recommended cost.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// argon2id with minimal cost, for test suites.
    pub fn fast() -> Self {
        let params = Params::new(8, 1, 1, None).unwrap_or_default();
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hashes `password` with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| CoreError::PasswordHash(e.to_string()))
    }

    /// Returns true if `password` matches `phc`. A malformed hash never matches.
    pub fn verify(&self, password: &str, phc: &str) -> bool {
        match PasswordHash::new(phc) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is malformed");
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::fast();
        let hash = hasher.hash("akwaaba123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("akwaaba123", &hash));
        assert!(!hasher.verify("akwaaba124", &hash));
    }

    #[test]
    fn test_salts_differ() {
        let hasher = PasswordHasher::fast();
        let a = hasher.hash("same-pass1").unwrap();
        let b = hasher.hash("same-pass1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_across_costs() {
        let hash = PasswordHasher::fast().hash("crosscost9").unwrap();
        assert!(PasswordHasher::new().verify("crosscost9", &hash));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!PasswordHasher::fast().verify("anything1", "not-a-phc-string"));
    }
}
