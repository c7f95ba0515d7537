//! ID and token generation utilities.

use rand::{Rng, distributions::Alphanumeric};
use ulid::Ulid;
use uuid::Uuid;

/// Alphabet used for invitation codes.
const INVITATION_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of an invitation code.
pub const INVITATION_CODE_LEN: usize = 8;

/// Length of a share link token.
pub const SHARE_TOKEN_LEN: usize = 32;

/// Length of the random part of a storage key.
const STORAGE_SUFFIX_LEN: usize = 21;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are lexicographically sortable, so ordering by ID roughly
    /// follows creation order.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Generate an opaque bearer token.
    #[must_use]
    pub fn generate_token(&self) -> String {
        // UUID v4 has no time component
        Uuid::new_v4().simple().to_string()
    }

    /// Generate an 8-character invitation code from `[A-Z0-9]`.
    #[must_use]
    pub fn generate_invitation_code(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..INVITATION_CODE_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..INVITATION_CODE_CHARSET.len());
                char::from(INVITATION_CODE_CHARSET[idx])
            })
            .collect()
    }

    /// Generate an unguessable token for a share link.
    #[must_use]
    pub fn generate_share_token(&self) -> String {
        random_alphanumeric(SHARE_TOKEN_LEN)
    }

    /// Generate the random component of an object storage key.
    #[must_use]
    pub fn generate_storage_suffix(&self) -> String {
        random_alphanumeric(STORAGE_SUFFIX_LEN)
    }
}

fn random_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_ne!(id1, id2);
        assert_eq!(id1, id1.to_lowercase());
    }

    #[test]
    fn test_generate_token() {
        let token = IdGenerator::new().generate_token();
        assert_eq!(token.len(), 32);
    }

    #[test]
    fn test_invitation_code_alphabet() {
        let id_gen = IdGenerator::new();
        for _ in 0..100 {
            let code = id_gen.generate_invitation_code();
            assert_eq!(code.len(), INVITATION_CODE_LEN);
            assert!(
                code.chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            );
        }
    }

    #[test]
    fn test_share_token() {
        let id_gen = IdGenerator::new();
        let token = id_gen.generate_share_token();
        assert_eq!(token.len(), SHARE_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, id_gen.generate_share_token());
    }
}
