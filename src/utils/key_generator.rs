//! Short key generation.
//!
//! Keys are derived from the submitted URL salted with a nanosecond timestamp,
//! so re-submitting the same URL yields a fresh key. Uniqueness against the
//! store is checked by the caller (see
//! [`crate::application::services::LinkService`]).

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Length of every generated key.
pub const KEY_LENGTH: usize = 10;

/// Output alphabet. Index order matters: `byte % 62` selects from it.
pub const BASE62_ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generates a 10-character base62 key for `url` using the current time as salt.
///
/// # Examples
///
/// ```ignore
/// let key = generate_key("https://example.com");
/// assert_eq!(key.len(), 10);
/// assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_key(url: &str) -> String {
    generate_key_at(url, timestamp_salt(Utc::now()))
}

/// Nanoseconds since the epoch. A clock set before 1970 salts with 0.
fn timestamp_salt(now: DateTime<Utc>) -> u64 {
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000));

    u64::try_from(nanos).unwrap_or_default()
}

/// Generates a key for `url` with an explicit nanosecond timestamp.
///
/// The digest input is the URL bytes followed by the timestamp as 8
/// little-endian bytes. Each of the first ten SHA-256 output bytes is mapped
/// through `byte % 62`. Since 256 is not a multiple of 62 the first eight
/// symbols are slightly more likely; the skew is accepted.
pub fn generate_key_at(url: &str, timestamp_nanos: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hasher.update(timestamp_nanos.to_le_bytes());
    let digest = hasher.finalize();

    digest
        .iter()
        .take(KEY_LENGTH)
        .map(|b| BASE62_ALPHABET[(*b % 62) as usize] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    #[test]
    fn test_timestamp_salt() {
        let after = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(timestamp_salt(after), 1_735_689_600_000_000_000);

        let before_epoch = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(timestamp_salt(before_epoch), 0);
    }

    fn is_base62(key: &str) -> bool {
        key.bytes().all(|b| BASE62_ALPHABET.contains(&b))
    }

    #[test]
    fn test_generate_key_has_correct_length() {
        for url in [
            "https://example.com",
            "https://example.com/a/very/long/path?with=query&and=more",
            "http://localhost:3000",
        ] {
            let key = generate_key(url);
            assert_eq!(key.len(), KEY_LENGTH);
        }
    }

    #[test]
    fn test_generate_key_uses_base62_alphabet() {
        for i in 0..500u64 {
            let key = generate_key_at("https://example.com", i);
            assert!(is_base62(&key), "unexpected character in {key}");
        }
    }

    #[test]
    fn test_generate_key_is_deterministic_for_same_instant() {
        let a = generate_key_at("https://example.com", 1_700_000_000_000_000_000);
        let b = generate_key_at("https://example.com", 1_700_000_000_000_000_000);
        assert_eq!(a, b);
    }

    #[test]
    fn test_same_url_different_instants_differ() {
        let a = generate_key_at("https://example.com", 1_700_000_000_000_000_000);
        let b = generate_key_at("https://example.com", 1_700_000_000_000_000_001);
        assert_ne!(a, b);
    }

    #[test]
    fn test_different_urls_same_instant_differ() {
        let a = generate_key_at("https://example.com", 42);
        let b = generate_key_at("https://example.org", 42);
        assert_ne!(a, b);
    }

    #[test]
    fn test_generate_key_produces_unique_keys() {
        let keys: HashSet<String> = (0..1000u64)
            .map(|i| generate_key_at("https://example.com", i))
            .collect();

        assert_eq!(keys.len(), 1000);
    }

    #[test]
    fn test_digest_bytes_map_through_modulo() {
        let url = "https://example.com";
        let nanos = 7u64;

        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        hasher.update(nanos.to_le_bytes());
        let digest = hasher.finalize();

        let expected: String = digest[..KEY_LENGTH]
            .iter()
            .map(|b| BASE62_ALPHABET[(*b % 62) as usize] as char)
            .collect();

        assert_eq!(generate_key_at(url, nanos), expected);
    }
}
