//! Session key fingerprinting.
//!
//! A truncated SHA-256 digest of the signing key lets operators confirm
//! which key a process loaded without logging the key material itself.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

/// Digest bytes kept before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Truncated SHA-256 fingerprint of the key's signing material.
///
/// Returns the first 8 bytes of the digest as a 16-character hex string,
/// enough to tell keys apart in startup logs and rotation runbooks.
///
/// # Examples
///
/// ```rust
/// use actix_web::cookie::Key;
/// use wicket_backend::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let print = key_fingerprint(&Key::generate());
///
/// assert_eq!(print.len(), 16);
/// assert!(print.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.signing());
    let digest = hasher.finalize();
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
