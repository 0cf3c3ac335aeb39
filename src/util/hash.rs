//! Hash utilities
//!
//! SHA1 helpers shared by the name table and the manifest report.

use sha1::{Digest, Sha1};

/// SHA1 of empty input
pub const EMPTY_SHA1: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

/// Content hash stored in manifests for zero-length files
pub const ZERO_SHA1: &str = "0000000000000000000000000000000000000000";

/// Calculate SHA1 hash of a byte slice
pub fn sha1_hex(bytes: &[u8]) -> String {
    let hash = Sha1::digest(bytes);
    format!("{:x}", hash)
}

/// Hash used by manifests to obscure a file name
///
/// The path must already be normalized; it is lowercased here.
pub fn name_hash(path: &str) -> String {
    sha1_hex(path.to_lowercase().as_bytes())
}

/// Replace the all-zero sentinel with the SHA1 of empty input
pub fn content_sha1(stored: &str) -> &str {
    if stored == ZERO_SHA1 { EMPTY_SHA1 } else { stored }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sha1() {
        assert_eq!(sha1_hex(b""), EMPTY_SHA1);
    }

    #[test]
    fn test_name_hash_ignores_case() {
        assert_eq!(name_hash("Data\\Readme.TXT"), name_hash("data\\readme.txt"));
        assert_eq!(name_hash("data\\readme.txt"), sha1_hex(b"data\\readme.txt"));
    }

    #[test]
    fn test_content_sha1() {
        assert_eq!(content_sha1(ZERO_SHA1), EMPTY_SHA1);
        let stored = "2fd4e1c67a2d28fced849ee1bb76e7391b93eb12";
        assert_eq!(content_sha1(stored), stored);
    }
}
