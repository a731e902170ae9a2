//! # Credential Helpers
//!
//! Password hashing and bearer-token generation.
//!
//! ```text
//! register ──► hash_password(pw) ──► "$argon2id$v=19$..." stored in *.password_hash
//! login    ──► verify_password(pw, stored) ──► true / false
//! token    ──► generate_token() ──► 256 OS-random bytes, hex (512 chars)
//! ```

use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tally_core::TOKEN_BYTES;
use tracing::warn;

use crate::error::{DbError, DbResult};

/// Hashes a password with Argon2id and a random salt.
pub fn hash_password(password: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbError::Hashing(e.to_string()))
}

/// Verifies a password against a stored PHC hash string.
///
/// An unparsable stored hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(e) => {
            warn!(error = %e, "Stored password hash is not a valid PHC string");
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Generates an opaque bearer token from the OS random source.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
