use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

use crate::errors::ServiceError;

pub const PASSWORD_ALGORITHM: &str = "argon2id";

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordParams {
    fn default() -> Self {
        Self { memory_kib: Params::DEFAULT_M_COST, iterations: Params::DEFAULT_T_COST, parallelism: Params::DEFAULT_P_COST }
    }
}

impl From<&configs::AuthConfig> for PasswordParams {
    fn from(cfg: &configs::AuthConfig) -> Self {
        Self { memory_kib: cfg.argon2_memory_kib, iterations: cfg.argon2_iterations, parallelism: cfg.argon2_parallelism }
    }
}

/// Hashes and verifies passwords with a fixed Argon2id configuration.
///
/// Holds a precomputed hash of a throwaway password so that logins for
/// unknown identifiers spend the same verification work as real ones.
#[derive(Clone)]
pub struct CredentialHasher {
    argon: Argon2<'static>,
    dummy_hash: String,
}

impl CredentialHasher {
    pub fn new(params: PasswordParams) -> Result<Self, ServiceError> {
        let p = Params::new(params.memory_kib, params.iterations, params.parallelism, None)
            .map_err(|e| ServiceError::Internal(format!("invalid argon2 params: {e}")))?;
        let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, p);
        let salt = SaltString::generate(&mut OsRng);
        let dummy_hash = argon
            .hash_password(b"not-a-real-password", &salt)
            .map_err(|e| ServiceError::Internal(e.to_string()))?
            .to_string();
        Ok(Self { argon, dummy_hash })
    }

    /// PHC-encoded hash with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ServiceError::Internal(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// Constant-time verification. An unparsable stored hash never verifies.
    /// Parameters embedded in the stored hash take precedence over ours.
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        match PasswordHash::new(stored) {
            Ok(parsed) => self.argon.verify_password(password.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        }
    }

    /// Burn one verification against the dummy hash; always false.
    pub fn verify_dummy(&self, password: &str) -> bool {
        let _ = self.verify(password, &self.dummy_hash);
        false
    }
}

impl std::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fast_password_params;

    #[test]
    fn hash_then_verify() {
        let h = CredentialHasher::new(fast_password_params()).unwrap();
        let stored = h.hash("p1").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(h.verify("p1", &stored));
        assert!(!h.verify("p2", &stored));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let h = CredentialHasher::new(fast_password_params()).unwrap();
        assert_ne!(h.hash("same").unwrap(), h.hash("same").unwrap());
    }

    #[test]
    fn garbage_hash_never_verifies() {
        let h = CredentialHasher::new(fast_password_params()).unwrap();
        assert!(!h.verify("p1", "not-a-phc-string"));
        assert!(!h.verify_dummy("not-a-real-password"));
    }

    #[test]
    fn rejects_impossible_params() {
        let bad = PasswordParams { memory_kib: 1, iterations: 1, parallelism: 1 };
        assert!(CredentialHasher::new(bad).is_err());
    }
}
