//! Short, stable identifiers for listed files.
//!
//! An id is the lower-cased base32 form of the SHA-224 digest of the file
//! path, cut down to the shortest prefix that is still unique within one
//! listing. Every id in a listing has the same length.

use std::collections::HashSet;
use std::path::Path;

use sha2::{Digest, Sha224};

/// Longest prefix tried before giving up on uniqueness.
const MAX_PREFIX_LEN: usize = 40;

/// Full-length id for a path.
#[must_use]
pub fn file_id(path: &Path) -> String {
    let digest = Sha224::digest(path.to_string_lossy().as_bytes());
    data_encoding::BASE32.encode(&digest).to_ascii_lowercase()
}

/// Length of the shortest prefix that tells all `ids` apart.
#[must_use]
pub fn min_unique_prefix<S: AsRef<str>>(ids: &[S]) -> usize {
    (1..=MAX_PREFIX_LEN)
        .find(|&n| {
            let mut seen = HashSet::with_capacity(ids.len());
            ids.iter().all(|id| {
                let id = id.as_ref();
                seen.insert(&id[..n.min(id.len())])
            })
        })
        .unwrap_or(MAX_PREFIX_LEN + 1)
}

/// Truncate every id in place to the common minimal unique length.
pub fn shorten_ids(ids: &mut [String]) {
    let n = min_unique_prefix(ids);
    for id in ids.iter_mut() {
        id.truncate(n);
    }
}

/// Whether `id` only uses characters an id can contain.
#[must_use]
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
}
