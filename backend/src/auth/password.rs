//! Salted password hashing for the single admin identity. The plaintext
//! from `ADMIN_PASSWORD` is hashed once at startup and only the
//! `sha256$<salt>$<digest>` string is kept in the config.

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = salted_digest(&salt, password);
    format!(
        "{}${}${}",
        SCHEME,
        hex::encode(salt),
        hex::encode(digest)
    )
}

/// Constant-time check of `candidate` against a stored hash. Malformed
/// stored values verify as false rather than erroring.
pub fn verify_password(stored: &str, candidate: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(salt_hex), Some(digest_hex), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let Ok(expected) = hex::decode(digest_hex) else {
        return false;
    };
    let digest = salted_digest(&salt, candidate);
    expected.ct_eq(&digest).into()
}

fn salted_digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_its_own_password() {
        let stored = hash_password("pass");
        assert!(verify_password(&stored, "pass"));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let stored = hash_password("pass");
        assert!(!verify_password(&stored, "Pass"));
        assert!(!verify_password(&stored, ""));
    }

    #[test]
    fn two_hashes_of_the_same_password_differ_by_salt() {
        assert_ne!(hash_password("pass"), hash_password("pass"));
    }

    #[test]
    fn malformed_stored_values_never_verify() {
        assert!(!verify_password("", "pass"));
        assert!(!verify_password("sha256$deadbeef", "pass"));
        assert!(!verify_password("md5$00$11", "pass"));
        assert!(!verify_password("sha256$nothex$nothex", "pass"));
    }
}
