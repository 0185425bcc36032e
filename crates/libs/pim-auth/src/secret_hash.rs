//! Salted password hashing and verification using Argon2.
//!
//! Hashes are produced in PHC string format, so the salt and the Argon2
//! parameters travel with the digest and nothing else needs to be stored.
//!
//! # Examples
//!
//! ```rust
//! use pim_auth::secret_hash::{generate_secret_hash, is_secret_valid};
//!
//! let hash = generate_secret_hash("correct horse").unwrap();
//! assert!(is_secret_valid("correct horse", &hash));
//! assert!(!is_secret_valid("battery staple", &hash));
//! ```

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{self, SaltString},
};
use rand::rngs::OsRng;

use crate::prelude::*;

/// Hashes `pw` with a freshly generated salt.
///
/// Two calls with the same password return different strings; both verify.
pub fn generate_secret_hash(pw: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    Ok(argon2.hash_password(pw.as_bytes(), &salt)?.to_string())
}

/// Checks `pw` against a stored hash.
///
/// The salt and parameters are read back from `hash` and the comparison of
/// the recomputed output is constant-time. A hash that does not parse is
/// reported as a mismatch.
pub fn is_secret_valid(pw: &str, hash: &str) -> bool {
    let Ok(hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(pw.as_bytes(), &hash)
        .is_ok()
}

impl From<password_hash::Error> for Error {
    fn from(value: password_hash::Error) -> Self {
        Self::PasswordHash(value)
    }
}
