//! bcrypt credential hashing.

use crate::AuthnError;

/// Hash a plaintext password for storage.
pub fn hash_password(password: &str) -> Result<String, AuthnError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| AuthnError::Hashing(e.to_string()))
}

/// Verify a plaintext password against a stored hash.
///
/// A malformed stored hash counts as a failed verification rather than an
/// error; login must not reveal which part of the credential pair was wrong.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hash = hash_password("hunter2-but-longer").expect("hash should succeed");
        assert!(verify_password("hunter2-but-longer", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn garbage_hash_fails_verification() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }
}
