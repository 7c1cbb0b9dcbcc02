//! Password hashing.
//!
//! Hashing is CPU-bound by design; callers on the async runtime should run
//! [`PasswordHasher::hash`] inside `tokio::task::spawn_blocking`.

use std::str::FromStr;
use std::sync::Arc;

use argon2::Argon2;
use argon2::password_hash::{self, PasswordHash, PasswordVerifier, SaltString, rand_core::OsRng};
use thiserror::Error;

/// Default bcrypt work factor.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Errors from a password hasher.
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// bcrypt rejected the input or the cost.
    #[error("bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    /// Argon2 hashing failed.
    #[error("argon2 error: {0}")]
    Argon2(String),

    /// The blocking worker running the hash did not complete.
    #[error("hashing worker failed: {0}")]
    Worker(String),
}

/// One-way salted password digest.
///
/// `hash` is non-deterministic: the same password hashed twice yields two
/// different digests, both of which `verify` accepts.
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted digest of `password`.
    ///
    /// # Errors
    ///
    /// Returns `PasswordHashError` if the underlying algorithm fails.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check `password` against a digest produced by [`hash`](Self::hash).
    ///
    /// # Errors
    ///
    /// Returns `PasswordHashError` if the digest is malformed.
    fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordHashError>;
}

/// bcrypt with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Create a hasher with the given work factor (4..=31).
    #[must_use]
    pub const fn new(cost: u32) -> Self {
        Self { cost }
    }

    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordHashError> {
        Ok(bcrypt::verify(password, digest)?)
    }
}

/// Argon2id with default parameters, PHC string output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);

        password_hash::PasswordHasher::hash_password(&Argon2::default(), password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordHashError::Argon2(e.to_string()))
    }

    fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordHashError> {
        let parsed =
            PasswordHash::new(digest).map_err(|e| PasswordHashError::Argon2(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordHashError::Argon2(e.to_string())),
        }
    }
}

/// Selectable hashing algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HasherKind {
    /// bcrypt with a configurable cost (`bcrypt`).
    #[default]
    Bcrypt,
    /// Argon2id with the crate defaults (`argon2`).
    Argon2,
}

impl HasherKind {
    /// Build the hasher for this algorithm. `bcrypt_cost` is ignored for Argon2.
    #[must_use]
    pub fn build(self, bcrypt_cost: u32) -> Arc<dyn PasswordHasher> {
        match self {
            Self::Bcrypt => Arc::new(BcryptHasher::new(bcrypt_cost)),
            Self::Argon2 => Arc::new(Argon2Hasher),
        }
    }
}

impl FromStr for HasherKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bcrypt" => Ok(Self::Bcrypt),
            "argon2" => Ok(Self::Argon2),
            other => Err(format!(
                "unknown password hasher '{other}' (expected bcrypt or argon2)"
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bcrypt_roundtrip() {
        let hasher = BcryptHasher::new(4);
        let digest = hasher.hash("secret1").unwrap();

        assert_ne!(digest, "secret1");
        assert!(hasher.verify("secret1", &digest).unwrap());
        assert!(!hasher.verify("secret2", &digest).unwrap());
    }

    #[test]
    fn test_bcrypt_is_salted() {
        let hasher = BcryptHasher::new(4);
        let a = hasher.hash("secret1").unwrap();
        let b = hasher.hash("secret1").unwrap();

        assert_ne!(a, b);
        assert!(hasher.verify("secret1", &a).unwrap());
        assert!(hasher.verify("secret1", &b).unwrap());
    }

    #[test]
    fn test_bcrypt_default_cost_is_encoded() {
        let digest = BcryptHasher::default().hash("secret1").unwrap();
        assert!(digest.starts_with("$2b$10$"), "got {digest}");
    }

    #[test]
    fn test_bcrypt_rejects_bad_cost() {
        assert!(BcryptHasher::new(3).hash("secret1").is_err());
    }

    #[test]
    fn test_bcrypt_verify_malformed_digest() {
        assert!(BcryptHasher::new(4).verify("secret1", "not-a-hash").is_err());
    }

    #[test]
    fn test_argon2_roundtrip() {
        let hasher = Argon2Hasher;
        let digest = hasher.hash("secret1").unwrap();

        assert!(digest.starts_with("$argon2"));
        assert!(hasher.verify("secret1", &digest).unwrap());
        assert!(!hasher.verify("wrong", &digest).unwrap());
    }

    #[test]
    fn test_argon2_verify_malformed_digest() {
        assert!(Argon2Hasher.verify("secret1", "garbage").is_err());
    }

    #[test]
    fn test_hasher_kind_parse() {
        assert_eq!("bcrypt".parse::<HasherKind>(), Ok(HasherKind::Bcrypt));
        assert_eq!("Argon2".parse::<HasherKind>(), Ok(HasherKind::Argon2));
        assert!("md5".parse::<HasherKind>().is_err());
    }
}
