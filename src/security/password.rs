use argon2::{Algorithm, Argon2, Params, Version};
use password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};

use crate::error::{AppError, AppResult};

/// Argon2id with a fixed cost; the PHC output records algorithm, params and salt.
fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::DEFAULT)
}

pub fn hash_password(plaintext: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Returns `Ok(false)` on mismatch. An unparseable stored hash is an internal fault.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("stored password hash is invalid: {e}")))?;

    // Verification uses the params embedded in the stored hash.
    match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(anyhow::anyhow!(
            "password verification failed: {e}"
        ))),
    }
}

/// [`hash_password`] on the blocking pool.
pub async fn hash_password_blocking(plaintext: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&plaintext))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
}

/// [`verify_password`] on the blocking pool.
pub async fn verify_password_blocking(plaintext: String, stored_hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || verify_password(&plaintext, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_matching_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn embeds_salt_and_cost() {
        let first = hash_password("hunter22").unwrap();
        let second = hash_password("hunter22").unwrap();

        assert!(first.starts_with("$argon2id$v=19$m=19456,t=2,p=1$"));
        assert_ne!(first, second, "each hash gets a fresh salt");
        assert!(!first.contains("hunter22"));
    }

    #[test]
    fn rejects_garbage_hash_as_internal() {
        let err = verify_password("anything", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn blocking_variants_agree_with_inline_ones() {
        let hash = hash_password_blocking("correct horse".to_string())
            .await
            .unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).unwrap());

        let inline = hash_password("correct horse").unwrap();
        assert!(
            verify_password_blocking("correct horse".to_string(), inline.clone())
                .await
                .unwrap()
        );
        assert!(
            !verify_password_blocking("wrong".to_string(), inline)
                .await
                .unwrap()
        );
    }
}
