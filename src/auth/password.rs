use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),
    #[error("stored password hash is malformed: {0}")]
    Malformed(String),
    #[error("password does not match")]
    Mismatch,
}

pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

pub fn verify_password(password: &str, hashed: &str) -> Result<(), PasswordError> {
    let argon2 = Argon2::default();
    let parsed = PasswordHash::new(hashed).map_err(|e| PasswordError::Malformed(e.to_string()))?;

    argon2
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| PasswordError::Mismatch)
}

/// Initial password handed to the admin once when an employee is created.
pub fn generate_initial_password() -> String {
    Uuid::new_v4().to_string().replace('-', "")[..12].to_string()
}
