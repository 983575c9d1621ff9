//! Password hashing using Argon2.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use shaku::Component;
use std::sync::Arc;
use tracing::debug;
use usergate_core::{Interface, UsergateError, UsergateResult};

/// Interface for password hashing operations.
pub trait PasswordHasherInterface: Interface + Send + Sync {
    /// Hashes a password into a self-describing PHC string with a fresh salt.
    fn hash(&self, password: &str) -> UsergateResult<String>;

    /// Verifies a password against a stored hash.
    ///
    /// Returns [`UsergateError::InvalidCredentials`] when the password does
    /// not match, and [`UsergateError::Internal`] when the hash is malformed.
    fn verify(&self, password: &str, hash: &str) -> UsergateResult<()>;
}

/// Argon2id password hasher.
#[derive(Component, Clone)]
#[shaku(interface = PasswordHasherInterface)]
pub struct PasswordHasher {
    argon2: Arc<Argon2<'static>>,
}

impl PasswordHasher {
    /// Creates a hasher with the library's default cost parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_params(Params::DEFAULT)
    }

    /// Creates a hasher with custom cost parameters.
    #[must_use]
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Arc::new(Argon2::new(Algorithm::Argon2id, Version::V0x13, params)),
        }
    }

    /// Shared Argon2 context, used to fill the DI component parameters.
    #[must_use]
    pub fn argon2_arc(&self) -> Arc<Argon2<'static>> {
        Arc::clone(&self.argon2)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherInterface for PasswordHasher {
    fn hash(&self, password: &str) -> UsergateResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| UsergateError::Internal(format!("Failed to hash password: {e}")))?;

        debug!("Password hashed");
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> UsergateResult<()> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| UsergateError::Internal(format!("Invalid password hash format: {e}")))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(()),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password verification failed: mismatch");
                Err(UsergateError::InvalidCredentials)
            }
            Err(e) => Err(UsergateError::Internal(format!(
                "Password verification error: {e}"
            ))),
        }
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}
