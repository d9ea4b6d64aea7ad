use serde::Serialize;
use sha2::{Digest, Sha256};

/// Calculate the fingerprint of a resolved tree.
///
/// The fingerprint is a SHA256 hash of the canonical JSON encoding. Identical
/// trees always produce identical fingerprints, so a caller can compare a
/// freshly resolved tree against a stored one without a deep comparison.
///
/// # Panics
///
/// Panics if JSON serialization fails (which should never happen for the
/// tree types in this crate, none of which contain maps with non-string
/// keys).
#[must_use]
pub fn fingerprint<T: Serialize + ?Sized>(value: &T) -> String {
    let encoded = serde_json::to_vec(value).expect("this should never fail");

    let hash = Sha256::digest(encoded);

    format!("{hash:x}")
}
