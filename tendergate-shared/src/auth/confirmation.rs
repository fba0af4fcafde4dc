/// Email confirmation tokens
///
/// Confirmation tokens are 32 random bytes, hex-encoded. Only the SHA-256
/// digest is stored on the account row; the raw token travels once in the
/// confirmation mail and is matched by digest when the link is followed.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// A freshly generated confirmation token pair
#[derive(Debug, Clone)]
pub struct ConfirmationToken {
    /// The raw token to embed in the confirmation link (never stored)
    pub raw: String,

    /// SHA-256 hex digest stored on the account row
    pub hash: String,
}

/// Generates a new confirmation token
pub fn generate_confirmation_token() -> ConfirmationToken {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);

    let raw = hex::encode(bytes);
    let hash = hash_confirmation_token(&raw);

    ConfirmationToken { raw, hash }
}

/// Computes the stored digest for a raw token
pub fn hash_confirmation_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_confirmation_token();
        assert_eq!(token.raw.len(), 64); // 32 bytes hex
        assert_eq!(token.hash.len(), 64); // sha-256 hex
        assert_ne!(token.raw, token.hash);
    }

    #[test]
    fn test_digest_is_deterministic() {
        let token = generate_confirmation_token();
        assert_eq!(hash_confirmation_token(&token.raw), token.hash);
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_confirmation_token();
        let b = generate_confirmation_token();
        assert_ne!(a.raw, b.raw);
    }
}
