//! Session token issuance.
//!
//! Clients hold the raw token; the store only ever sees its unsalted SHA-256
//! digest, recomputed from the raw token on every lookup.

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// Random bytes per token before hex encoding (256 bits).
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Generates a new raw session token as lowercase hex.
///
/// # Examples
///
/// ```rust
/// use pim_auth::session_token::generate_session_token;
///
/// let token = generate_session_token();
/// assert_eq!(token.len(), 64);
/// ```
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Returns the storage digest of a raw token.
///
/// # Examples
///
/// ```rust
/// use pim_auth::session_token::session_token_digest;
///
/// let digest = session_token_digest("some-token");
/// assert_eq!(digest.len(), 64);
/// assert_eq!(digest, session_token_digest("some-token"));
/// ```
pub fn session_token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
