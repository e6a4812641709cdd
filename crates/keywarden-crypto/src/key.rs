//! License key generation, digesting, and masked display.

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

/// Bytes of entropy behind each generated key.
const KEY_ENTROPY_BYTES: usize = 16;

/// Generate a fresh plaintext license key: `KEY-` followed by 32
/// uppercase hex characters from 16 random bytes.
pub fn generate_key() -> String {
    let mut bytes = [0u8; KEY_ENTROPY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    format!("KEY-{}", hex::encode_upper(bytes))
}

/// Derive the storage form of a key: lowercase hex SHA-256 of the
/// plaintext. Irreversible; this is the only form ever persisted.
pub fn digest_key(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

/// Mask a stored digest for display: first 6 and last 4 characters with
/// `****` between. Inputs too short to mask render as an invalid marker.
pub fn mask_digest(digest: &str) -> String {
    if digest.len() < 10 {
        return "invalid digest".to_string();
    }
    format!("{}****{}", &digest[..6], &digest[digest.len() - 4..])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_have_expected_shape() {
        let key = generate_key();
        assert!(key.starts_with("KEY-"));
        assert_eq!(key.len(), 4 + KEY_ENTROPY_BYTES * 2);
        assert!(key[4..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key[4..].to_uppercase(), key[4..]);
    }

    #[test]
    fn generated_keys_are_unique() {
        let a = generate_key();
        let b = generate_key();
        assert_ne!(a, b);
    }

    #[test]
    fn digest_is_stable_and_irreversible_shape() {
        let d1 = digest_key("KEY-ABC");
        let d2 = digest_key("KEY-ABC");
        assert_eq!(d1, d2);
        assert_eq!(d1.len(), 64);
        // digest never contains the plaintext
        assert!(!d1.contains("KEY"));
    }

    #[test]
    fn digest_differs_from_plaintext() {
        let key = generate_key();
        assert_ne!(digest_key(&key), key);
    }

    #[test]
    fn known_digest_vector() {
        // sha256("abc")
        assert_eq!(
            digest_key("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn masking_keeps_only_edges() {
        let masked = mask_digest("abcdef0123456789wxyz");
        assert_eq!(masked, "abcdef****wxyz");
        assert_eq!(mask_digest("short"), "invalid digest");
        assert_eq!(mask_digest(""), "invalid digest");
    }
}
