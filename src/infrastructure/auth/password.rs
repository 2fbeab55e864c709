use argon2::{
    password_hash::{PasswordHash, PasswordVerifier, Error as Argon2Error},
    Argon2,
};

use crate::errors::PasswordError;

const ARGON2_PREFIX: &str = "$argon2";

pub fn verify_password(
    password: &str,
    hashed: &str,
) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hashed)
        .map_err(|e| PasswordError::InvalidHashFormat(e.to_string()))?;

    match Argon2::default().verify_password(
        password.as_bytes(),
        &parsed_hash,
    ) {
        Ok(()) => Ok(true),
        Err(Argon2Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerificationError(e.to_string())),
    }
}

pub fn is_password_hash(stored: &str) -> bool {
    stored.starts_with(ARGON2_PREFIX)
}

/// Compares a submitted password against a stored project password.
///
/// Stored values are plaintext unless they carry an argon2 PHC prefix, in which
/// case the hash is verified instead. An unparsable hash never matches.
pub fn stored_password_matches(submitted: &str, stored: &str) -> bool {
    if is_password_hash(stored) {
        return verify_password(submitted, stored).unwrap_or_else(|e| {
            tracing::error!("Stored password hash could not be verified: {}", e);
            false
        });
    }

    tracing::debug!("Comparing against a plaintext stored password (deprecated)");
    submitted == stored
}
