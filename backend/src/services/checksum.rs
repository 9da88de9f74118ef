//! Content checksum for snapshot responses.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 of raw bytes as lowercase hex.
pub fn calculate_checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Checksum of the JSON encoding of `value`.
///
/// Every map in the snapshot model is ordered, so equal values always hash to
/// the same string.
pub fn checksum_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    Ok(calculate_checksum(&serde_json::to_vec(value)?))
}
