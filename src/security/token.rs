use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    entity::users::UserRole,
    error::{AppError, AppResult},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

/// The caller identity carried by a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub role: UserRole,
}

/// Issues and verifies HS256 bearer tokens with a fixed lifetime.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, user_id: i64, role: UserRole) -> AppResult<String> {
        self.issue_at(user_id, role, Utc::now())
    }

    pub fn issue_at(
        &self,
        user_id: i64,
        role: UserRole,
        issued_at: DateTime<Utc>,
    ) -> AppResult<String> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
    }

    /// Every failure (encoding, signature, algorithm, expiry, claims) maps to the same error.
    pub fn verify(&self, token: &str) -> AppResult<Identity> {
        let decoded = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| AppError::Unauthorized)?;
        let user_id = decoded
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::Unauthorized)?;

        Ok(Identity {
            user_id,
            role: decoded.claims.role,
        })
    }
}
