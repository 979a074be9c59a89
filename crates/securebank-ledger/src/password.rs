//! Credential hashing
//!
//! Argon2id with configurable parameters. Passwords are never stored or
//! compared in plaintext; verification goes through the password-hash
//! verifier, which compares in constant time. Unknown accounts burn a
//! verification against a fixed dummy hash so callers cannot distinguish
//! "no such account" from "wrong password" by timing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params, Version,
};
use securebank_types::{LedgerError, Result};
use zeroize::Zeroizing;

use crate::config::PasswordConfig;

/// Fixed input for the dummy hash used to equalize unknown-account timing
const DUMMY_CREDENTIAL: &str = "securebank-dummy-credential";

/// Password hashing and verification service
#[derive(Clone)]
pub struct PasswordService {
    config: PasswordConfig,
    dummy_hash: String,
}

impl PasswordService {
    /// Create a new password service
    ///
    /// Fails only if the configured Argon2 parameters are invalid.
    pub fn new(config: PasswordConfig) -> Result<Self> {
        let mut service = Self {
            config,
            dummy_hash: String::new(),
        };
        service.dummy_hash = service.hash_raw(DUMMY_CREDENTIAL)?;
        Ok(service)
    }

    fn argon2(&self) -> Result<Argon2<'_>> {
        let params = Params::new(
            self.config.memory_cost,
            self.config.time_cost,
            self.config.parallelism,
            Some(self.config.hash_length as usize),
        )
        .map_err(|e| LedgerError::internal(format!("invalid Argon2 params: {e}")))?;
        Ok(Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params))
    }

    fn with_pepper(&self, password: &str) -> Zeroizing<String> {
        match &self.config.pepper {
            Some(pepper) => Zeroizing::new(format!("{password}{pepper}")),
            None => Zeroizing::new(password.to_string()),
        }
    }

    fn hash_raw(&self, password: &str) -> Result<String> {
        let peppered = self.with_pepper(password);
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()?
            .hash_password(peppered.as_bytes(), &salt)
            .map_err(|e| LedgerError::internal(format!("password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    /// Hash a password, enforcing the strength policy first
    pub fn hash_password(&self, password: &str) -> Result<String> {
        self.validate_policy(password)?;
        self.hash_raw(password)
    }

    /// Verify a password against a stored PHC-format hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        let peppered = self.with_pepper(password);
        let parsed = PasswordHash::new(hash)
            .map_err(|e| LedgerError::internal(format!("stored hash is malformed: {e}")))?;
        match self.argon2()?.verify_password(peppered.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(LedgerError::internal(format!(
                "password verification failed: {e}"
            ))),
        }
    }

    /// Verify against a stored hash, or burn equivalent work when there is none
    ///
    /// Always returns `false` when `hash` is `None`; the dummy verification
    /// keeps the timing profile of the two cases aligned.
    pub fn verify_or_burn(&self, password: &str, hash: Option<&str>) -> bool {
        match hash {
            Some(hash) => self.verify_password(password, hash).unwrap_or(false),
            None => {
                let _ = self.verify_password(password, &self.dummy_hash);
                false
            }
        }
    }

    /// Enforce the configured strength policy
    pub fn validate_policy(&self, password: &str) -> Result<()> {
        if password.is_empty() {
            return Err(LedgerError::invalid_input("password", "must not be empty"));
        }
        if password.len() < self.config.min_password_length {
            return Err(LedgerError::invalid_input(
                "password",
                format!(
                    "must be at least {} characters",
                    self.config.min_password_length
                ),
            ));
        }
        if password.len() > self.config.max_password_length {
            return Err(LedgerError::invalid_input(
                "password",
                format!(
                    "must be at most {} characters",
                    self.config.max_password_length
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> PasswordService {
        PasswordService::new(PasswordConfig::fast_insecure()).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let service = service();
        let hash = service.hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2id$"));

        assert!(service.verify_password("correct horse battery", &hash).unwrap());
        assert!(!service.verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_hashes() {
        let service = service();
        let h1 = service.hash_password("correct horse battery").unwrap();
        let h2 = service.hash_password("correct horse battery").unwrap();
        // Different salts
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_pepper_changes_verification() {
        let mut config = PasswordConfig::fast_insecure();
        config.pepper = Some("shared-secret".to_string());
        let peppered = PasswordService::new(config).unwrap();

        let hash = peppered.hash_password("correct horse battery").unwrap();
        assert!(peppered.verify_password("correct horse battery", &hash).unwrap());

        let unpeppered = service();
        assert!(!unpeppered
            .verify_password("correct horse battery", &hash)
            .unwrap());
    }

    #[test]
    fn test_policy_rejects_short_and_empty() {
        let service = service();
        assert!(service.validate_policy("").is_err());
        assert!(service.validate_policy("short").is_err());
        assert!(service.validate_policy("long enough").is_ok());
    }

    #[test]
    fn test_verify_or_burn_unknown_account() {
        let service = service();
        assert!(!service.verify_or_burn("anything at all", None));
    }
}
