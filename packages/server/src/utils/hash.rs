use std::sync::LazyLock;

use argon2::Argon2;
use argon2::password_hash::{
    self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};
use sha2::{Digest, Sha256};
use tracing::warn;

/// Argon2 hash checked against when there is no usable argon2 hash to check,
/// so every login attempt costs one argon2 verification.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("prompthub-dummy-password").ok());

#[cfg(test)]
thread_local! {
    static ARGON2_VERIFICATIONS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check a password against a stored hash.
///
/// Accepts argon2 PHC strings and the hex SHA-256 digests carried by
/// accounts migrated from the previous store. A stored value that parses as
/// neither is a mismatch.
pub fn verify_password(password: &str, stored: &str) -> bool {
    if is_legacy_digest(stored) {
        verify_dummy(password);
        return verify_legacy_digest(password, stored);
    }

    match PasswordHash::new(stored) {
        Ok(parsed) => verify_argon2(password, &parsed),
        Err(e) => {
            warn!("Stored password hash is unreadable: {}", e);
            verify_dummy(password);
            false
        }
    }
}

/// Run a full argon2 verification against a fixed hash and discard the
/// result.
pub fn verify_dummy(password: &str) {
    if let Some(Ok(parsed)) = DUMMY_HASH.as_deref().map(PasswordHash::new) {
        verify_argon2(password, &parsed);
    }
}

fn verify_argon2(password: &str, parsed: &PasswordHash<'_>) -> bool {
    #[cfg(test)]
    ARGON2_VERIFICATIONS.with(|n| n.set(n.get() + 1));

    Argon2::default()
        .verify_password(password.as_bytes(), parsed)
        .is_ok()
}

/// Number of argon2 verifications run on this thread.
#[cfg(test)]
pub(crate) fn argon2_verifications() -> usize {
    ARGON2_VERIFICATIONS.with(|n| n.get())
}

fn is_legacy_digest(stored: &str) -> bool {
    stored.len() == 64 && stored.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Hex SHA-256 digest of a password, the legacy storage format.
pub fn legacy_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn verify_legacy_digest(password: &str, stored: &str) -> bool {
    let computed = legacy_digest(password);
    let stored = stored.to_ascii_lowercase();
    // Constant-time comparison; both sides are 64 bytes.
    computed
        .bytes()
        .zip(stored.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
