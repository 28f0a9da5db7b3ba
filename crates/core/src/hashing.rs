//! SHA-256 fingerprints for bearer tokens.

use sha2::{Digest, Sha256};

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Fingerprint stored in `user_sessions.token_fingerprint` for a bearer token.
///
/// Only the digest is persisted, so a leaked sessions table cannot be replayed
/// as bearer credentials.
pub fn token_fingerprint(token: &str) -> String {
    sha256_hex(token.as_bytes())
}
