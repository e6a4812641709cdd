//! Keywarden Credential Codec
//!
//! License keys are opaque high-entropy secrets. The plaintext exists
//! only in the creation reply shown to the operator; the store holds a
//! one-way SHA-256 digest, and every later lookup digests the operator's
//! input and matches on the stored form.

pub mod key;

pub use key::{digest_key, generate_key, mask_digest};
