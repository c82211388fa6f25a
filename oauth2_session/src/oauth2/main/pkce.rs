use sha2::{Digest, Sha256};

use crate::utils::{UtilError, base64url_encode, gen_random_string};

/// 24 random bytes encode to the 32-character anti-CSRF `state` value.
const STATE_BYTES: usize = 24;

/// 32 random bytes encode to a 43-character verifier, the RFC 7636 minimum.
const VERIFIER_BYTES: usize = 32;

pub(crate) fn generate_state() -> Result<String, UtilError> {
    gen_random_string(STATE_BYTES)
}

pub(crate) fn generate_verifier() -> Result<String, UtilError> {
    gen_random_string(VERIFIER_BYTES)
}

/// `BASE64URL(SHA256(verifier))`, the S256 code challenge.
pub(crate) fn s256_challenge(verifier: &str) -> String {
    base64url_encode(&Sha256::digest(verifier.as_bytes()))
}
