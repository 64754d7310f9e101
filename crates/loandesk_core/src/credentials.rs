//! Password hashing for user credentials.
//!
//! # Invariants
//! - Only salted bcrypt hashes are persisted.
//! - Verification never panics; malformed hashes verify as `false`.

use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lowest cost bcrypt accepts. Used by tests and demo seeding.
pub const MIN_HASH_COST: u32 = 4;

#[derive(Debug)]
pub enum CredentialError {
    EmptyPassword,
    Hash(bcrypt::BcryptError),
}

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::Hash(err) => write!(f, "password hashing failed: {err}"),
        }
    }
}

impl Error for CredentialError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyPassword => None,
            Self::Hash(err) => Some(err),
        }
    }
}

impl From<bcrypt::BcryptError> for CredentialError {
    fn from(value: bcrypt::BcryptError) -> Self {
        Self::Hash(value)
    }
}

/// Hashes a clear password with a random salt.
pub fn hash_password(password: &str, cost: u32) -> Result<String, CredentialError> {
    if password.is_empty() {
        return Err(CredentialError::EmptyPassword);
    }
    Ok(bcrypt::hash(password, cost)?)
}

/// Checks a clear password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matches) => matches,
        Err(err) => {
            warn!("event=password_verify module=credentials status=error error={err}");
            false
        }
    }
}
