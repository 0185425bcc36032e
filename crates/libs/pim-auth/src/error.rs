#[derive(Debug, thiserror::Error, Clone)]
pub enum Error {
    #[error("Error hashing password {0}")]
    PasswordHash(argon2::password_hash::Error),
}
