//! # Password hashing and verification: Argon2id
//!
//! [`PasswordHasher::hash_password`] salts with [`OsRng`] and returns a
//! PHC-format string (`$argon2id$v=19$m=19456,t=2,p=1$...`), which is what
//! ends up in `users.password_hash`. [`PasswordHasher::verify_password`]
//! parses a stored PHC string and checks a plaintext against it; the cost
//! parameters are read back from the string, so hashes created under older
//! settings keep verifying.
//!
//! Each hasher also keeps a dummy hash made with its own parameters at
//! construction. Login verifies against it when the email is unknown, so both
//! failure paths cost one argon2 run.
//!
//! Both calls are CPU-bound. The auth service runs them on the blocking pool.

use std::sync::Arc;

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::error::ApiError;

/// Argon2 cost parameters.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HasherConfig {
    pub m_cost: u32,
    pub t_cost: u32,
    pub p_cost: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            m_cost: Params::DEFAULT_M_COST,
            t_cost: Params::DEFAULT_T_COST,
            p_cost: Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PasswordHasher {
    params: Params,
    dummy_hash: Arc<str>,
}

impl PasswordHasher {
    pub fn new(config: &HasherConfig) -> Result<Self, ApiError> {
        let params = Params::new(config.m_cost, config.t_cost, config.p_cost, None)
            .map_err(|e| ApiError::internal(format!("Invalid argon2 parameters: {}", e)))?;
        let mut hasher = Self {
            params,
            dummy_hash: Arc::from(""),
        };
        hasher.dummy_hash = Arc::from(hasher.hash_password("notely-dummy-password")?);
        Ok(hasher)
    }

    /// A valid PHC hash with this hasher's cost that no stored user owns.
    pub fn dummy_hash(&self) -> &str {
        &self.dummy_hash
    }

    fn argon2(&self) -> Argon2<'_> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password using Argon2id. Returns a PHC-format string.
    pub fn hash_password(&self, password: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a PHC-format hash string.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, ApiError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| ApiError::internal(format!("Invalid password hash: {}", e)))?;
        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
