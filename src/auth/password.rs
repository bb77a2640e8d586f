use crate::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};

/// One-way salted hash of a plaintext password.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Checks a plaintext password against a stored digest. Only fails on a
/// malformed digest; a wrong password is `Ok(false)`.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))
}
