use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

/// Key-stretching iteration count; fixed per deployment, so the stored
/// record carries no algorithm identifier
const ITERATIONS: u32 = 100_000;
const SALT_BYTES: usize = 16;
const KEY_BYTES: usize = 32;

/// Hash a password with PBKDF2-HMAC-SHA256 over a fresh random salt.
/// Returns a self-describing `salt:digest` record, both hex-encoded.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt_hex = hex::encode(salt);

    let mut key = [0u8; KEY_BYTES];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt_hex.as_bytes(), ITERATIONS, &mut key);

    format!("{}:{}", salt_hex, hex::encode(key))
}

/// Verify a password against a stored `salt:digest` record.
/// Malformed records verify as false rather than erroring.
pub fn verify_password(password: &str, record: &str) -> bool {
    let mut parts = record.split(':');
    let (Some(salt_hex), Some(digest_hex), None) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    let Ok(expected) = hex::decode(digest_hex) else {
        return false;
    };
    if expected.is_empty() {
        return false;
    }

    let mut key = vec![0u8; expected.len()];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt_hex.as_bytes(), ITERATIONS, &mut key);

    key == expected
}
