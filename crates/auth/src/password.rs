//! Password hashing (bcrypt, compatible with the stored `users.password` column).

use std::ops::RangeInclusive;

use thiserror::Error;

/// Work factor of the hashes already stored in the users table.
pub const DEFAULT_PASSWORD_COST: u32 = 10;

/// Work factors bcrypt accepts.
pub const PASSWORD_COST_RANGE: RangeInclusive<u32> = 4..=31;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hash error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Compare a plaintext password with a stored bcrypt hash.
///
/// `Ok(false)` means a mismatch; `Err` means the stored hash is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    Ok(bcrypt::verify(password, hash)?)
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(password, cost)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("hunter2", 4).unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("hunter2", "plaintext").is_err());
    }
}
