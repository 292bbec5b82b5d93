//! # Password Hashing
//!
//! Argon2 hashing and verification for user credentials.
//!
//! The original system compared passwords in clear text; credentials here
//! are stored only as salted one-way PHC hash strings and compared with
//! constant-time verification.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

use crate::error::{DbError, DbResult};

/// Hashes a password for storage.
///
/// Produces a PHC-format string ("$argon2id$v=19$...") embedding the salt
/// and parameters, so verification needs no side data.
pub fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| DbError::Internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verifies a password against its stored hash.
///
/// Returns false on any failure, including an unparseable hash; callers
/// only ever learn "matched" or "didn't".
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
