//! Content hashing for cache keys.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 of a value's JSON encoding, as 64 lowercase hex chars.
///
/// Equal values always hash equal; struct fields serialize in declaration
/// order, so the digest is stable across runs.
pub fn compute_hash<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    Ok(format!("{:x}", Sha256::digest(json.as_bytes())))
}
